use std::{error::Error, io::Write};

use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Actor, Engine, Naira, Rates, Role, users};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection, EntityTrait, Set};

/// Audit identity of changes made from the command line.
const ADMIN_ACTOR: &str = "daybook_admin";

#[derive(Parser, Debug)]
#[command(name = "daybook_admin")]
#[command(about = "Admin utilities for Daybook (bootstrap users, drivers and rates)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./daybook.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Driver(Driver),
    Rates(RatesCmd),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RoleArg {
    Owner,
    Manager,
    Staff,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Owner => Role::Owner,
            RoleArg::Manager => Role::Manager,
            RoleArg::Staff => Role::Staff,
        }
    }
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long, value_enum, default_value = "staff")]
    role: RoleArg,
}

#[derive(Args, Debug)]
struct Driver {
    #[command(subcommand)]
    command: DriverCommand,
}

#[derive(Subcommand, Debug)]
enum DriverCommand {
    Create(DriverCreateArgs),
    List,
}

#[derive(Args, Debug)]
struct DriverCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    motor_boy: Option<String>,
}

#[derive(Args, Debug)]
struct RatesCmd {
    #[command(subcommand)]
    command: RatesCommand,
}

#[derive(Subcommand, Debug)]
enum RatesCommand {
    Show,
    Set(RatesSetArgs),
}

/// Whole Naira per bag.
#[derive(Args, Debug)]
struct RatesSetArgs {
    #[arg(long)]
    retail: i64,
    #[arg(long)]
    driver_commission: i64,
    #[arg(long)]
    motor_boy_commission: i64,
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let p1 = prompt_password("Password: ")?;
        if p1.is_empty() {
            execute!(
                out,
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine),
                Print("Password must not be empty.\r\n")
            )?;
            continue;
        }

        let p2 = prompt_password("Confirm password: ")?;
        if p1 == p2 {
            return Ok(p1);
        }

        execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print("Passwords do not match. Try again.\r\n")
        )?;
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn print_rates(rates: &Rates) {
    println!("retail price per bag:         {}", Naira::new(rates.retail_price_per_bag));
    println!("driver commission per bag:    {}", Naira::new(rates.driver_commission_per_bag));
    println!("motor boy commission per bag: {}", Naira::new(rates.motor_boy_commission_per_bag));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let admin = Actor::new(ADMIN_ACTOR, Role::Owner);

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            if users::Entity::find_by_id(args.username.clone())
                .one(&db)
                .await?
                .is_some()
            {
                eprintln!("user already exists: {}", args.username);
                std::process::exit(1);
            }

            let password = prompt_password_twice()?;
            let role = Role::from(args.role);
            let user = users::ActiveModel {
                username: Set(args.username.clone()),
                password: Set(password),
                role: Set(role.as_str().to_string()),
            };
            users::Entity::insert(user).exec(&db).await?;

            println!("created user: {} ({})", args.username, role.as_str());
        }
        Command::Driver(Driver { command }) => {
            let engine = Engine::builder().database(db.clone()).build().await?;
            match command {
                DriverCommand::Create(args) => {
                    let driver = engine
                        .new_driver(&args.name, args.motor_boy.as_deref(), &admin, Utc::now())
                        .await?;
                    println!("created driver: {} ({})", driver.name, driver.id);
                }
                DriverCommand::List => {
                    for driver in engine.drivers(false).await? {
                        let status = if driver.active { "active" } else { "inactive" };
                        println!(
                            "{}  {:<24} {:<24} {status}",
                            driver.id,
                            driver.name,
                            driver.motor_boy_name.as_deref().unwrap_or("-")
                        );
                    }
                }
            }
        }
        Command::Rates(RatesCmd { command }) => {
            let engine = Engine::builder().database(db.clone()).build().await?;
            match command {
                RatesCommand::Show => print_rates(&engine.rates().await?),
                RatesCommand::Set(args) => {
                    let rates = engine
                        .update_rates(
                            Rates {
                                retail_price_per_bag: args.retail,
                                driver_commission_per_bag: args.driver_commission,
                                motor_boy_commission_per_bag: args.motor_boy_commission,
                            },
                            &admin,
                            Utc::now(),
                        )
                        .await?;
                    print_rates(&rates);
                }
            }
        }
    }

    Ok(())
}
