use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a sale or a dispenser payment was settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentType {
    Cash,
    Transfer,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
    pub id: Uuid,
}

pub mod day {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UnlockRequest {
        pub reason: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UnlockApproval {
        /// Length of the edit window, starting when the request is served.
        pub minutes: i64,
    }
}

pub mod driver {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DriverNew {
        pub name: String,
        pub motor_boy_name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DriverActive {
        pub active: bool,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DriverList {
        pub active_only: Option<bool>,
    }
}

pub mod driver_day {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DriverDayOpen {
        pub driver_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripNew {
        pub gate_pass_number: String,
        pub loaded_bags: i64,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub depart_time: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripReturn {
        pub return_time: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReturnUpdate {
        pub final_return_bags: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CashUpdate {
        pub cash_received_naira: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpensesUpdate {
        pub expenses_naira: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SupplierDeliveryNew {
        pub supplier_name: String,
        pub bags: i64,
        pub price_per_bag: i64,
    }
}

pub mod transfer {
    use super::*;

    /// What the claimed transfer pays for.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(tag = "kind", content = "id", rename_all = "snake_case")]
    pub enum TransferTarget {
        DriverDay(Uuid),
        OfficeSale(Uuid),
        DispenserDelivery(Uuid),
        Unlinked,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum TransferStatus {
        Pending,
        MatchedAuto,
        MatchedManual,
        NotFound,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferNew {
        pub amount_naira: i64,
        pub sender_name: Option<String>,
        pub reference: Option<String>,
        pub target: TransferTarget,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferStatusUpdate {
        pub status: TransferStatus,
    }
}

pub mod sale {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OfficeSaleNew {
        pub customer_name: Option<String>,
        pub bags: i64,
        /// Defaults to the current retail price.
        pub price_per_bag: Option<i64>,
        pub payment_type: PaymentType,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DispenserDeliveryNew {
        pub customer_name: String,
        pub bottles: i64,
        pub amount_naira: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DispenserPayment {
        pub amount_naira: i64,
        pub method: PaymentType,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub category: String,
        pub description: Option<String>,
        pub amount_naira: i64,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum ReviewOutcome {
        Approved,
        Queried,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseReview {
        pub status: ReviewOutcome,
        pub note: Option<String>,
    }
}

pub mod cash {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClosingCash {
        pub closing_cash_naira: i64,
    }
}

pub mod inventory {
    use super::*;

    /// Only the provided fields are changed.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct InventoryEdit {
        pub produced_bags: Option<i64>,
        pub spoilage_bags: Option<i64>,
        pub closing_bags_confirmed: Option<i64>,
        /// Remove the physical count.
        #[serde(default)]
        pub clear_closing_bags_confirmed: bool,
        pub notes: Option<String>,
    }
}

pub mod settings {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RatesUpdate {
        pub retail_price_per_bag: i64,
        pub driver_commission_per_bag: i64,
        pub motor_boy_commission_per_bag: i64,
    }
}

pub mod notification {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct NotificationList {
        pub unread_only: Option<bool>,
    }
}

pub mod audit {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AuditQuery {
        pub entity_type: Option<String>,
        pub entity_id: Option<String>,
        pub limit: Option<u64>,
    }
}
