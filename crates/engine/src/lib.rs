//! Daily operational ledger for a bagged-water factory.
//!
//! Each calendar day is opened, filled with driver trips, supplier
//! deliveries, office sales, dispenser deliveries, transfers and expenses,
//! then closed. The engine owns the day lifecycle and keeps every derived
//! figure (driver totals, cash and stock positions) consistent with the raw
//! entries it is given.

pub use audit_logs::{Actor, AuditEntry};
pub use cash_ledgers::CashLedger;
pub use commands::{
    DispenserDeliveryCmd, ExpenseCmd, InventoryUpdate, OfficeSaleCmd, SupplierDeliveryCmd,
    TransferCmd, TripCmd,
};
pub use company_settings::Rates;
pub use days::{DayRecord, DayStatus, is_business_day};
pub use dispenser_deliveries::DispenserDelivery;
pub use dispenser_payments::DispenserPayment;
pub use driver_days::DriverDay;
pub use drivers::Driver;
pub use error::EngineError;
pub use expenses::{Expense, ReviewStatus};
pub use inventory_days::InventoryDay;
pub use naira::Naira;
pub use notifications::{Notification, NotificationKind, Severity};
pub use office_sales::{OfficeSale, PaymentType};
pub use ops::{AuditFilter, DEFAULT_TIMEZONE, DaySummary, DriverDayDetail, Engine, EngineBuilder};
pub use recompute::{CashFigures, DriverDayTotals, InventoryFigures};
pub use supplier_deliveries::SupplierDelivery;
pub use transfer_logs::{TransferLog, TransferStatus, TransferTarget};
pub use trips::Trip;
pub use users::Role;

mod audit_logs;
mod cash_ledgers;
mod commands;
mod company_settings;
mod days;
mod dispenser_deliveries;
mod dispenser_payments;
mod driver_days;
mod drivers;
mod error;
mod expenses;
mod inventory_days;
mod naira;
mod notifications;
mod office_sales;
mod ops;
pub mod recompute;
mod supplier_deliveries;
mod transfer_logs;
mod trips;
pub mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
