//! One row per dispenser payment, so cash is counted on the day and in the
//! method it was actually received.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum DispenserPayments {
    Table,
    Id,
    DeliveryId,
    AmountNaira,
    Method,
    PaidAt,
    CreatedBy,
}

#[derive(Iden)]
enum DispenserDeliveries {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DispenserPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DispenserPayments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DispenserPayments::DeliveryId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DispenserPayments::AmountNaira)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DispenserPayments::Method).string().not_null())
                    .col(
                        ColumnDef::new(DispenserPayments::PaidAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DispenserPayments::CreatedBy)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-dispenser_payments-delivery_id")
                            .from(DispenserPayments::Table, DispenserPayments::DeliveryId)
                            .to(DispenserDeliveries::Table, DispenserDeliveries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-dispenser_payments-paid_at")
                    .table(DispenserPayments::Table)
                    .col(DispenserPayments::PaidAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-dispenser_payments-delivery_id")
                    .table(DispenserPayments::Table)
                    .col(DispenserPayments::DeliveryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DispenserPayments::Table).to_owned())
            .await
    }
}
