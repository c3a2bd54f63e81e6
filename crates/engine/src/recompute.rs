//! Pure derivations behind the driver-day, cash and inventory figures.
//!
//! Nothing here touches the database. The engine loads the full child set,
//! calls these functions and writes the result back in the same transaction,
//! so a recompute is always a full re-derivation and never an incremental
//! delta.

use serde::{Deserialize, Serialize};

use crate::{
    DriverDay, EngineError, Rates, ResultEngine, SupplierDelivery, TransferLog, Trip,
};

/// Above this many bags of absolute variance the owner is notified.
pub const INVENTORY_VARIANCE_ALERT_BAGS: i64 = 50;
/// Above this absolute cash variance the owner is notified.
pub const CASH_VARIANCE_ALERT_NAIRA: i64 = 5_000;

/// Everything the driver-day recompute derives, written back in one update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverDayTotals {
    pub total_trips: i64,
    pub total_loaded_bags: i64,
    pub total_sold_bags: i64,
    pub supplier_bags: i64,
    pub normal_bags: i64,
    pub expected_naira: i64,
    pub received_logged_naira: i64,
    pub driver_commission_rate: i64,
    pub motor_boy_commission_rate: i64,
    pub driver_commission_naira: i64,
    pub motor_boy_commission_naira: i64,
    pub outstanding_end_naira: i64,
}

pub fn total_loaded_bags(trips: &[Trip]) -> ResultEngine<i64> {
    checked_sum(trips.iter().map(|t| t.loaded_bags), "loaded bags")
}

fn checked_sum(values: impl IntoIterator<Item = i64>, what: &str) -> ResultEngine<i64> {
    values
        .into_iter()
        .try_fold(0_i64, |acc, value| acc.checked_add(value))
        .ok_or_else(|| overflow(what))
}

fn overflow(what: &str) -> EngineError {
    EngineError::InvalidAmount(format!("{what} overflow"))
}

/// The final return can never exceed what was actually loaded.
pub fn ensure_return_within_loaded(final_return_bags: i64, total_loaded_bags: i64) -> ResultEngine<()> {
    if final_return_bags < 0 {
        return Err(EngineError::InvalidAmount(
            "final_return_bags must be >= 0".to_string(),
        ));
    }
    if final_return_bags > total_loaded_bags {
        return Err(EngineError::Validation(format!(
            "final return of {final_return_bags} bags exceeds {total_loaded_bags} bags loaded"
        )));
    }
    Ok(())
}

/// Derive a driver day's totals from its raw inputs and children.
///
/// Rate snapshots already stored on the driver day win over `rates`; the
/// settings are only used to seed a snapshot that was never set. Figures
/// that do not fit an `i64` are rejected with `InvalidAmount`.
pub fn driver_day_totals(
    driver_day: &DriverDay,
    trips: &[Trip],
    supplier_deliveries: &[SupplierDelivery],
    transfers: &[TransferLog],
    rates: &Rates,
) -> ResultEngine<DriverDayTotals> {
    let total_loaded = total_loaded_bags(trips)?;
    let supplier_bags = checked_sum(supplier_deliveries.iter().map(|d| d.bags), "supplier bags")?;
    let supplier_amount = checked_sum(
        supplier_deliveries.iter().map(|d| d.amount_naira),
        "supplier amount",
    )?;

    let normal_bags = total_loaded
        .checked_sub(driver_day.final_return_bags)
        .and_then(|bags| bags.checked_sub(supplier_bags))
        .ok_or_else(|| overflow("normal bags"))?
        .max(0);
    let total_sold = supplier_bags
        .checked_add(normal_bags)
        .ok_or_else(|| overflow("sold bags"))?;
    let expected = normal_bags
        .checked_mul(rates.retail_price_per_bag)
        .and_then(|amount| amount.checked_add(supplier_amount))
        .ok_or_else(|| overflow("expected amount"))?;

    let driver_rate = driver_day
        .driver_commission_rate
        .unwrap_or(rates.driver_commission_per_bag);
    let motor_boy_rate = driver_day
        .motor_boy_commission_rate
        .unwrap_or(rates.motor_boy_commission_per_bag);
    let driver_commission = normal_bags
        .checked_mul(driver_rate)
        .ok_or_else(|| overflow("driver commission"))?;
    let motor_boy_commission = normal_bags
        .checked_mul(motor_boy_rate)
        .ok_or_else(|| overflow("motor boy commission"))?;

    // Every claimed transfer counts, whatever its match status.
    let transferred = checked_sum(transfers.iter().map(|t| t.amount_naira), "transfers")?;
    let received = driver_day
        .cash_received_naira
        .checked_add(transferred)
        .ok_or_else(|| overflow("received amount"))?;

    let outstanding_end = driver_day
        .outstanding_start_naira
        .checked_add(expected)
        .and_then(|amount| amount.checked_sub(received))
        .and_then(|amount| amount.checked_sub(driver_day.expenses_naira))
        .and_then(|amount| amount.checked_sub(driver_commission))
        .and_then(|amount| amount.checked_sub(motor_boy_commission))
        .ok_or_else(|| overflow("outstanding amount"))?;

    Ok(DriverDayTotals {
        total_trips: trips.len() as i64,
        total_loaded_bags: total_loaded,
        total_sold_bags: total_sold,
        supplier_bags,
        normal_bags,
        expected_naira: expected,
        received_logged_naira: received,
        driver_commission_rate: driver_rate,
        motor_boy_commission_rate: motor_boy_rate,
        driver_commission_naira: driver_commission,
        motor_boy_commission_naira: motor_boy_commission,
        outstanding_end_naira: outstanding_end,
    })
}

impl DriverDay {
    pub fn apply(&mut self, totals: &DriverDayTotals) {
        self.driver_commission_rate = Some(totals.driver_commission_rate);
        self.motor_boy_commission_rate = Some(totals.motor_boy_commission_rate);
        self.total_trips = totals.total_trips;
        self.total_loaded_bags = totals.total_loaded_bags;
        self.total_sold_bags = totals.total_sold_bags;
        self.supplier_bags = totals.supplier_bags;
        self.normal_bags = totals.normal_bags;
        self.expected_naira = totals.expected_naira;
        self.received_logged_naira = totals.received_logged_naira;
        self.driver_commission_naira = totals.driver_commission_naira;
        self.motor_boy_commission_naira = totals.motor_boy_commission_naira;
        self.outstanding_end_naira = totals.outstanding_end_naira;
    }
}

/// Live cash position of a day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFigures {
    pub opening_cash_naira: i64,
    pub cash_in_naira: i64,
    pub spent_naira: i64,
    pub expected_cash_naira: i64,
    /// Physical count, when one has been submitted.
    pub closing_cash_naira: Option<i64>,
    pub variance_naira: Option<i64>,
}

impl CashFigures {
    pub fn new(opening_cash_naira: i64, cash_in_naira: i64, spent_naira: i64) -> Self {
        Self {
            opening_cash_naira,
            cash_in_naira,
            spent_naira,
            expected_cash_naira: opening_cash_naira + cash_in_naira - spent_naira,
            closing_cash_naira: None,
            variance_naira: None,
        }
    }

    #[must_use]
    pub fn with_closing(mut self, closing_cash_naira: i64) -> Self {
        self.closing_cash_naira = Some(closing_cash_naira);
        self.variance_naira = Some(closing_cash_naira - self.expected_cash_naira);
        self
    }
}

/// Live stock position of a day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryFigures {
    pub outgoing_driver_loads_bags: i64,
    pub outgoing_office_sales_bags: i64,
    pub closing_bags_computed: i64,
    pub variance_bags: i64,
}

impl InventoryFigures {
    /// Driver loads are gross: loaded stock has left the warehouse even if
    /// some of it comes back later.
    pub fn compute(
        opening_bags: i64,
        produced_bags: i64,
        spoilage_bags: i64,
        outgoing_driver_loads_bags: i64,
        outgoing_office_sales_bags: i64,
        closing_bags_confirmed: Option<i64>,
    ) -> Self {
        let closing_bags_computed = opening_bags + produced_bags
            - spoilage_bags
            - outgoing_driver_loads_bags
            - outgoing_office_sales_bags;
        let variance_bags = closing_bags_confirmed
            .map(|confirmed| confirmed - closing_bags_computed)
            .unwrap_or(0);
        Self {
            outgoing_driver_loads_bags,
            outgoing_office_sales_bags,
            closing_bags_computed,
            variance_bags,
        }
    }

    pub fn needs_alert(&self) -> bool {
        self.variance_bags.abs() > INVENTORY_VARIANCE_ALERT_BAGS
    }
}
