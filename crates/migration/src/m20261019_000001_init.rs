//! Initial schema migration - creates all tables from scratch.
//!
//! - `users`: authentication and roles
//! - `company_settings`: single row of prices and commission rates
//! - `drivers`: driver profiles
//! - `day_records`: one row per business date
//! - `driver_days`, `trips`, `supplier_deliveries`: per-driver ledger
//! - `office_sales`, `dispenser_deliveries`, `transfer_logs`, `expenses`
//! - `inventory_days`, `cash_ledgers`: daily reconciliation
//! - `notifications`, `audit_logs`

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
    Role,
}

#[derive(Iden)]
enum CompanySettings {
    Table,
    Id,
    RetailPricePerBag,
    DriverCommissionPerBag,
    MotorBoyCommissionPerBag,
    UpdatedAt,
    UpdatedBy,
}

#[derive(Iden)]
enum Drivers {
    Table,
    Id,
    Name,
    MotorBoyName,
    Active,
    CreatedAt,
}

#[derive(Iden)]
enum DayRecords {
    Table,
    Id,
    Date,
    Status,
    OpenedBy,
    OpenedAt,
    ClosedBy,
    ClosedAt,
    UnlockRequestReason,
    UnlockRequestedBy,
    UnlockRequestedAt,
    UnlockApprovedBy,
    UnlockWindowUntil,
}

#[derive(Iden)]
enum DriverDays {
    Table,
    Id,
    DayId,
    DriverId,
    OutstandingStartNaira,
    FinalReturnBags,
    CashReceivedNaira,
    ExpensesNaira,
    DriverCommissionRate,
    MotorBoyCommissionRate,
    TotalTrips,
    TotalLoadedBags,
    TotalSoldBags,
    SupplierBags,
    NormalBags,
    ExpectedNaira,
    ReceivedLoggedNaira,
    DriverCommissionNaira,
    MotorBoyCommissionNaira,
    OutstandingEndNaira,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Trips {
    Table,
    Id,
    DayId,
    DriverDayId,
    GatePassNumber,
    LoadedBags,
    DepartTime,
    ReturnTime,
    CreatedAt,
}

#[derive(Iden)]
enum SupplierDeliveries {
    Table,
    Id,
    DriverDayId,
    SupplierName,
    Bags,
    PricePerBag,
    AmountNaira,
    CreatedAt,
}

#[derive(Iden)]
enum OfficeSales {
    Table,
    Id,
    DayId,
    CustomerName,
    Bags,
    PricePerBag,
    AmountNaira,
    PaymentType,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum DispenserDeliveries {
    Table,
    Id,
    DayId,
    CustomerName,
    Bottles,
    AmountNaira,
    PaidNaira,
    PaymentMethod,
    PaidAt,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum TransferLogs {
    Table,
    Id,
    DayId,
    DriverDayId,
    OfficeSaleId,
    DispenserDeliveryId,
    AmountNaira,
    SenderName,
    Reference,
    Status,
    ClaimedBy,
    CreatedAt,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    DayId,
    Category,
    Description,
    AmountNaira,
    OwnerReviewedStatus,
    ReviewNote,
    ReviewedBy,
    ReviewedAt,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum InventoryDays {
    Table,
    Id,
    DayId,
    OpeningBags,
    ProducedBags,
    SpoilageBags,
    OutgoingDriverLoadsBags,
    OutgoingOfficeSalesBags,
    ClosingBagsComputed,
    ClosingBagsConfirmed,
    VarianceBags,
    Notes,
    UpdatedAt,
}

#[derive(Iden)]
enum CashLedgers {
    Table,
    Id,
    DayId,
    OpeningCashNaira,
    CashReceivedNaira,
    CashSpentNaira,
    ClosingCashNaira,
    VarianceNaira,
    SubmittedBy,
    SubmittedAt,
}

#[derive(Iden)]
enum Notifications {
    Table,
    Id,
    Kind,
    Severity,
    Message,
    DayId,
    LicenseId,
    CreatedAt,
    ReadAt,
}

#[derive(Iden)]
enum AuditLogs {
    Table,
    Id,
    ActorId,
    Role,
    EntityType,
    EntityId,
    Action,
    OldSnapshot,
    NewSnapshot,
    Reason,
    CreatedAt,
}

fn big_int_zero(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col).big_integer().not_null().default(0).to_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("staff"),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Company settings (seeded)
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CompanySettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompanySettings::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(big_int_zero(CompanySettings::RetailPricePerBag))
                    .col(big_int_zero(CompanySettings::DriverCommissionPerBag))
                    .col(big_int_zero(CompanySettings::MotorBoyCommissionPerBag))
                    .col(ColumnDef::new(CompanySettings::UpdatedAt).timestamp())
                    .col(ColumnDef::new(CompanySettings::UpdatedBy).string())
                    .to_owned(),
            )
            .await?;

        let seed = Query::insert()
            .into_table(CompanySettings::Table)
            .columns([
                CompanySettings::Id,
                CompanySettings::RetailPricePerBag,
                CompanySettings::DriverCommissionPerBag,
                CompanySettings::MotorBoyCommissionPerBag,
            ])
            .values_panic([1.into(), 350.into(), 5.into(), 3.into()])
            .to_owned();
        manager.exec_stmt(seed).await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Drivers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Drivers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Drivers::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Drivers::Name).string().not_null())
                    .col(ColumnDef::new(Drivers::MotorBoyName).string())
                    .col(
                        ColumnDef::new(Drivers::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Drivers::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Day records
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(DayRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DayRecords::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DayRecords::Date).date().not_null())
                    .col(ColumnDef::new(DayRecords::Status).string().not_null())
                    .col(ColumnDef::new(DayRecords::OpenedBy).string().not_null())
                    .col(ColumnDef::new(DayRecords::OpenedAt).timestamp().not_null())
                    .col(ColumnDef::new(DayRecords::ClosedBy).string())
                    .col(ColumnDef::new(DayRecords::ClosedAt).timestamp())
                    .col(ColumnDef::new(DayRecords::UnlockRequestReason).string())
                    .col(ColumnDef::new(DayRecords::UnlockRequestedBy).string())
                    .col(ColumnDef::new(DayRecords::UnlockRequestedAt).timestamp())
                    .col(ColumnDef::new(DayRecords::UnlockApprovedBy).string())
                    .col(ColumnDef::new(DayRecords::UnlockWindowUntil).timestamp())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-day_records-date-unique")
                    .table(DayRecords::Table)
                    .col(DayRecords::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Driver days
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(DriverDays::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DriverDays::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DriverDays::DayId).string().not_null())
                    .col(ColumnDef::new(DriverDays::DriverId).string().not_null())
                    .col(big_int_zero(DriverDays::OutstandingStartNaira))
                    .col(big_int_zero(DriverDays::FinalReturnBags))
                    .col(big_int_zero(DriverDays::CashReceivedNaira))
                    .col(big_int_zero(DriverDays::ExpensesNaira))
                    .col(ColumnDef::new(DriverDays::DriverCommissionRate).big_integer())
                    .col(ColumnDef::new(DriverDays::MotorBoyCommissionRate).big_integer())
                    .col(big_int_zero(DriverDays::TotalTrips))
                    .col(big_int_zero(DriverDays::TotalLoadedBags))
                    .col(big_int_zero(DriverDays::TotalSoldBags))
                    .col(big_int_zero(DriverDays::SupplierBags))
                    .col(big_int_zero(DriverDays::NormalBags))
                    .col(big_int_zero(DriverDays::ExpectedNaira))
                    .col(big_int_zero(DriverDays::ReceivedLoggedNaira))
                    .col(big_int_zero(DriverDays::DriverCommissionNaira))
                    .col(big_int_zero(DriverDays::MotorBoyCommissionNaira))
                    .col(big_int_zero(DriverDays::OutstandingEndNaira))
                    .col(ColumnDef::new(DriverDays::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(DriverDays::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-driver_days-day_id")
                            .from(DriverDays::Table, DriverDays::DayId)
                            .to(DayRecords::Table, DayRecords::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-driver_days-driver_id")
                            .from(DriverDays::Table, DriverDays::DriverId)
                            .to(Drivers::Table, Drivers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-driver_days-day_id-driver_id-unique")
                    .table(DriverDays::Table)
                    .col(DriverDays::DayId)
                    .col(DriverDays::DriverId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Trips
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trips::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Trips::DayId).string().not_null())
                    .col(ColumnDef::new(Trips::DriverDayId).string().not_null())
                    .col(ColumnDef::new(Trips::GatePassNumber).string().not_null())
                    .col(ColumnDef::new(Trips::LoadedBags).big_integer().not_null())
                    .col(ColumnDef::new(Trips::DepartTime).timestamp())
                    .col(ColumnDef::new(Trips::ReturnTime).timestamp())
                    .col(ColumnDef::new(Trips::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trips-driver_day_id")
                            .from(Trips::Table, Trips::DriverDayId)
                            .to(DriverDays::Table, DriverDays::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-trips-day_id-gate_pass_number-unique")
                    .table(Trips::Table)
                    .col(Trips::DayId)
                    .col(Trips::GatePassNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-trips-driver_day_id")
                    .table(Trips::Table)
                    .col(Trips::DriverDayId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Supplier deliveries
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(SupplierDeliveries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SupplierDeliveries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SupplierDeliveries::DriverDayId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupplierDeliveries::SupplierName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupplierDeliveries::Bags)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupplierDeliveries::PricePerBag)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupplierDeliveries::AmountNaira)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupplierDeliveries::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-supplier_deliveries-driver_day_id")
                            .from(SupplierDeliveries::Table, SupplierDeliveries::DriverDayId)
                            .to(DriverDays::Table, DriverDays::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Office sales
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(OfficeSales::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OfficeSales::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OfficeSales::DayId).string().not_null())
                    .col(ColumnDef::new(OfficeSales::CustomerName).string())
                    .col(ColumnDef::new(OfficeSales::Bags).big_integer().not_null())
                    .col(
                        ColumnDef::new(OfficeSales::PricePerBag)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OfficeSales::AmountNaira)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OfficeSales::PaymentType).string().not_null())
                    .col(ColumnDef::new(OfficeSales::CreatedBy).string().not_null())
                    .col(ColumnDef::new(OfficeSales::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-office_sales-day_id")
                            .from(OfficeSales::Table, OfficeSales::DayId)
                            .to(DayRecords::Table, DayRecords::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 9. Dispenser deliveries
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(DispenserDeliveries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DispenserDeliveries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DispenserDeliveries::DayId).string().not_null())
                    .col(
                        ColumnDef::new(DispenserDeliveries::CustomerName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DispenserDeliveries::Bottles)
                            .big_integer()
                            .not_null(),
                    )
                    .col(big_int_zero(DispenserDeliveries::AmountNaira))
                    .col(big_int_zero(DispenserDeliveries::PaidNaira))
                    .col(ColumnDef::new(DispenserDeliveries::PaymentMethod).string())
                    .col(ColumnDef::new(DispenserDeliveries::PaidAt).timestamp())
                    .col(
                        ColumnDef::new(DispenserDeliveries::CreatedBy)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DispenserDeliveries::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-dispenser_deliveries-day_id")
                            .from(DispenserDeliveries::Table, DispenserDeliveries::DayId)
                            .to(DayRecords::Table, DayRecords::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-dispenser_deliveries-paid_at")
                    .table(DispenserDeliveries::Table)
                    .col(DispenserDeliveries::PaidAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 10. Transfer logs
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(TransferLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TransferLogs::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TransferLogs::DayId).string().not_null())
                    .col(ColumnDef::new(TransferLogs::DriverDayId).string())
                    .col(ColumnDef::new(TransferLogs::OfficeSaleId).string())
                    .col(ColumnDef::new(TransferLogs::DispenserDeliveryId).string())
                    .col(
                        ColumnDef::new(TransferLogs::AmountNaira)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TransferLogs::SenderName).string())
                    .col(ColumnDef::new(TransferLogs::Reference).string())
                    .col(
                        ColumnDef::new(TransferLogs::Status)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(TransferLogs::ClaimedBy).string().not_null())
                    .col(ColumnDef::new(TransferLogs::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transfer_logs-day_id")
                            .from(TransferLogs::Table, TransferLogs::DayId)
                            .to(DayRecords::Table, DayRecords::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transfer_logs-driver_day_id")
                            .from(TransferLogs::Table, TransferLogs::DriverDayId)
                            .to(DriverDays::Table, DriverDays::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transfer_logs-driver_day_id")
                    .table(TransferLogs::Table)
                    .col(TransferLogs::DriverDayId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 11. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Expenses::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Expenses::DayId).string().not_null())
                    .col(ColumnDef::new(Expenses::Category).string().not_null())
                    .col(ColumnDef::new(Expenses::Description).string())
                    .col(
                        ColumnDef::new(Expenses::AmountNaira)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Expenses::OwnerReviewedStatus)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Expenses::ReviewNote).string())
                    .col(ColumnDef::new(Expenses::ReviewedBy).string())
                    .col(ColumnDef::new(Expenses::ReviewedAt).timestamp())
                    .col(ColumnDef::new(Expenses::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Expenses::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-day_id")
                            .from(Expenses::Table, Expenses::DayId)
                            .to(DayRecords::Table, DayRecords::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 12. Inventory days
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(InventoryDays::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryDays::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InventoryDays::DayId).string().not_null())
                    .col(big_int_zero(InventoryDays::OpeningBags))
                    .col(big_int_zero(InventoryDays::ProducedBags))
                    .col(big_int_zero(InventoryDays::SpoilageBags))
                    .col(big_int_zero(InventoryDays::OutgoingDriverLoadsBags))
                    .col(big_int_zero(InventoryDays::OutgoingOfficeSalesBags))
                    .col(big_int_zero(InventoryDays::ClosingBagsComputed))
                    .col(ColumnDef::new(InventoryDays::ClosingBagsConfirmed).big_integer())
                    .col(big_int_zero(InventoryDays::VarianceBags))
                    .col(ColumnDef::new(InventoryDays::Notes).string())
                    .col(
                        ColumnDef::new(InventoryDays::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-inventory_days-day_id")
                            .from(InventoryDays::Table, InventoryDays::DayId)
                            .to(DayRecords::Table, DayRecords::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-inventory_days-day_id-unique")
                    .table(InventoryDays::Table)
                    .col(InventoryDays::DayId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 13. Cash ledgers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CashLedgers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CashLedgers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CashLedgers::DayId).string().not_null())
                    .col(big_int_zero(CashLedgers::OpeningCashNaira))
                    .col(big_int_zero(CashLedgers::CashReceivedNaira))
                    .col(big_int_zero(CashLedgers::CashSpentNaira))
                    .col(big_int_zero(CashLedgers::ClosingCashNaira))
                    .col(big_int_zero(CashLedgers::VarianceNaira))
                    .col(ColumnDef::new(CashLedgers::SubmittedBy).string().not_null())
                    .col(
                        ColumnDef::new(CashLedgers::SubmittedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cash_ledgers-day_id")
                            .from(CashLedgers::Table, CashLedgers::DayId)
                            .to(DayRecords::Table, DayRecords::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cash_ledgers-day_id-unique")
                    .table(CashLedgers::Table)
                    .col(CashLedgers::DayId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 14. Notifications
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::Kind).string().not_null())
                    .col(ColumnDef::new(Notifications::Severity).string().not_null())
                    .col(ColumnDef::new(Notifications::Message).string().not_null())
                    .col(ColumnDef::new(Notifications::DayId).string())
                    .col(ColumnDef::new(Notifications::LicenseId).string())
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::ReadAt).timestamp())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-notifications-kind-day_id")
                    .table(Notifications::Table)
                    .col(Notifications::Kind)
                    .col(Notifications::DayId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 15. Audit logs
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuditLogs::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuditLogs::ActorId).string().not_null())
                    .col(ColumnDef::new(AuditLogs::Role).string().not_null())
                    .col(ColumnDef::new(AuditLogs::EntityType).string().not_null())
                    .col(ColumnDef::new(AuditLogs::EntityId).string().not_null())
                    .col(ColumnDef::new(AuditLogs::Action).string().not_null())
                    .col(ColumnDef::new(AuditLogs::OldSnapshot).text())
                    .col(ColumnDef::new(AuditLogs::NewSnapshot).text())
                    .col(ColumnDef::new(AuditLogs::Reason).string())
                    .col(ColumnDef::new(AuditLogs::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-audit_logs-entity_type-entity_id")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::EntityType)
                    .col(AuditLogs::EntityId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(AuditLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CashLedgers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InventoryDays::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TransferLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DispenserDeliveries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OfficeSales::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SupplierDeliveries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Trips::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DriverDays::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DayRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Drivers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CompanySettings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
