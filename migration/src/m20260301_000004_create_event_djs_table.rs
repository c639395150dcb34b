use sea_orm_migration::prelude::*;

use crate::m20260301_000001_create_profiles_table::Profiles;
use crate::m20260301_000003_create_events_table::Events;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// DJ assignments per event, one row per (event, dj).
#[derive(DeriveIden)]
pub(crate) enum EventDjs {
    Table,
    Id,
    EventId,
    DjId,
    Fee,
    PaymentStatus,
    PaymentReceiptUrl,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventDjs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventDjs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EventDjs::EventId).uuid().not_null())
                    .col(ColumnDef::new(EventDjs::DjId).uuid().not_null())
                    .col(ColumnDef::new(EventDjs::Fee).double().null())
                    .col(
                        ColumnDef::new(EventDjs::PaymentStatus)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(EventDjs::PaymentReceiptUrl).string().null())
                    .col(
                        ColumnDef::new(EventDjs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(EventDjs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_djs_event_id")
                            .from(EventDjs::Table, EventDjs::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_djs_dj_id")
                            .from(EventDjs::Table, EventDjs::DjId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_event_djs_event_dj")
                    .table(EventDjs::Table)
                    .col(EventDjs::EventId)
                    .col(EventDjs::DjId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventDjs::Table).to_owned())
            .await
    }
}
