//! Command structs for engine operations.
//!
//! These types group parameters for write operations (trips, deliveries,
//! sales, expenses, stock counts), keeping call sites readable and avoiding
//! long argument lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{PaymentType, TransferTarget};

/// Add a trip to a driver day.
#[derive(Clone, Debug)]
pub struct TripCmd {
    pub driver_day_id: Uuid,
    pub gate_pass_number: String,
    pub loaded_bags: i64,
    pub depart_time: Option<DateTime<Utc>>,
}

impl TripCmd {
    #[must_use]
    pub fn new(driver_day_id: Uuid, gate_pass_number: impl Into<String>, loaded_bags: i64) -> Self {
        Self {
            driver_day_id,
            gate_pass_number: gate_pass_number.into(),
            loaded_bags,
            depart_time: None,
        }
    }

    #[must_use]
    pub fn depart_time(mut self, depart_time: DateTime<Utc>) -> Self {
        self.depart_time = Some(depart_time);
        self
    }
}

/// Divert bags of a driver day to a supplier.
#[derive(Clone, Debug)]
pub struct SupplierDeliveryCmd {
    pub driver_day_id: Uuid,
    pub supplier_name: String,
    pub bags: i64,
    pub price_per_bag: i64,
}

/// Log a claimed bank transfer.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub day_id: Uuid,
    pub target: TransferTarget,
    pub amount_naira: i64,
    pub sender_name: Option<String>,
    pub reference: Option<String>,
}

impl TransferCmd {
    #[must_use]
    pub fn new(day_id: Uuid, target: TransferTarget, amount_naira: i64) -> Self {
        Self {
            day_id,
            target,
            amount_naira,
            sender_name: None,
            reference: None,
        }
    }

    #[must_use]
    pub fn sender_name(mut self, sender_name: impl Into<String>) -> Self {
        self.sender_name = Some(sender_name.into());
        self
    }

    #[must_use]
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// Record an over-the-counter sale.
///
/// Without an explicit `price_per_bag` the current retail price is used.
#[derive(Clone, Debug)]
pub struct OfficeSaleCmd {
    pub day_id: Uuid,
    pub customer_name: Option<String>,
    pub bags: i64,
    pub price_per_bag: Option<i64>,
    pub payment_type: PaymentType,
}

/// Record a dispenser delivery (payment comes separately).
#[derive(Clone, Debug)]
pub struct DispenserDeliveryCmd {
    pub day_id: Uuid,
    pub customer_name: String,
    pub bottles: i64,
    pub amount_naira: i64,
}

/// Record an expense paid from the drawer.
#[derive(Clone, Debug)]
pub struct ExpenseCmd {
    pub day_id: Uuid,
    pub category: String,
    pub description: Option<String>,
    pub amount_naira: i64,
}

/// Direct inputs of an inventory day; every other figure is rederived.
#[derive(Clone, Debug, Default)]
pub struct InventoryUpdate {
    pub produced_bags: Option<i64>,
    pub spoilage_bags: Option<i64>,
    pub closing_bags_confirmed: Option<i64>,
    /// Drop a physical count entered by mistake.
    pub clear_closing_bags_confirmed: bool,
    pub notes: Option<String>,
}
