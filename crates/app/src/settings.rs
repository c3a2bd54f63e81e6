//! Runtime settings.
//!
//! Read from an optional `settings.toml` in the working directory, then
//! overridden by `DAYBOOK__<SECTION>__<KEY>` environment variables, e.g.
//! `DAYBOOK__SERVER__PORT=8080`.

use chrono_tz::Tz;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
    /// IANA name of the business timezone, e.g. `Africa/Lagos`.
    pub timezone: Option<String>,
}

impl App {
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        match self.timezone.as_deref() {
            Some(name) => name
                .parse()
                .map_err(|err| ConfigError::Message(format!("invalid timezone {name}: {err}"))),
            None => Ok(engine::DEFAULT_TIMEZONE),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.port", 3000)?
            .set_default("server.database", "memory")?
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix("DAYBOOK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timezone_defaults_to_lagos() {
        let app = App {
            level: "info".to_string(),
            timezone: None,
        };
        assert_eq!(app.timezone().unwrap(), chrono_tz::Africa::Lagos);
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let app = App {
            level: "info".to_string(),
            timezone: Some("Mars/Olympus".to_string()),
        };
        assert!(app.timezone().is_err());
    }
}
