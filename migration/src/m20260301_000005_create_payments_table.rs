use sea_orm_migration::prelude::*;

use crate::m20260301_000002_create_producers_table::Producers;
use crate::m20260301_000003_create_events_table::Events;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// At most one payment per event.
#[derive(DeriveIden)]
pub(crate) enum Payments {
    Table,
    Id,
    EventId,
    ProducerId,
    Amount,
    Status,
    DueDate,
    PaidAt,
    PaymentMethod,
    PaymentProofUrl,
    CommissionRate,
    CommissionAmount,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Payments::EventId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Payments::ProducerId).uuid().null())
                    .col(
                        ColumnDef::new(Payments::Amount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Payments::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Payments::DueDate).date().null())
                    .col(
                        ColumnDef::new(Payments::PaidAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Payments::PaymentMethod).string().null())
                    .col(ColumnDef::new(Payments::PaymentProofUrl).string().null())
                    .col(ColumnDef::new(Payments::CommissionRate).double().null())
                    .col(ColumnDef::new(Payments::CommissionAmount).double().null())
                    .col(ColumnDef::new(Payments::Notes).text().null())
                    .col(
                        ColumnDef::new(Payments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Payments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_event_id")
                            .from(Payments::Table, Payments::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_producer_id")
                            .from(Payments::Table, Payments::ProducerId)
                            .to(Producers::Table, Producers::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await
    }
}
