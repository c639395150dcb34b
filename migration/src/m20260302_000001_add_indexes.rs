use sea_orm_migration::prelude::*;

use crate::m20260301_000001_create_profiles_table::Profiles;
use crate::m20260301_000003_create_events_table::Events;
use crate::m20260301_000004_create_event_djs_table::EventDjs;
use crate::m20260301_000006_create_contracts_tables::Contracts;
use crate::m20260301_000007_create_media_and_receipts_tables::{MediaFiles, PaymentReceipts};

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEXES: [&str; 8] = [
    "idx_profiles_role",
    "idx_events_producer_id",
    "idx_events_created_by",
    "idx_events_event_date",
    "idx_event_djs_dj_id",
    "idx_contracts_dj_id",
    "idx_media_files_dj_id",
    "idx_payment_receipts_event_id",
];

async fn create_index<T, C>(
    manager: &SchemaManager<'_>,
    name: &str,
    table: T,
    column: C,
) -> Result<(), DbErr>
where
    T: Iden + 'static,
    C: Iden + 'static,
{
    manager
        .create_index(
            Index::create()
                .name(name)
                .table(table)
                .col(column)
                .if_not_exists()
                .to_owned(),
        )
        .await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // DJ roster and dashboard counts filter on role
        create_index(manager, INDEXES[0], Profiles::Table, Profiles::Role).await?;
        create_index(manager, INDEXES[1], Events::Table, Events::ProducerId).await?;
        create_index(manager, INDEXES[2], Events::Table, Events::CreatedBy).await?;
        create_index(manager, INDEXES[3], Events::Table, Events::EventDate).await?;
        create_index(manager, INDEXES[4], EventDjs::Table, EventDjs::DjId).await?;
        create_index(manager, INDEXES[5], Contracts::Table, Contracts::DjId).await?;
        create_index(manager, INDEXES[6], MediaFiles::Table, MediaFiles::DjId).await?;
        create_index(
            manager,
            INDEXES[7],
            PaymentReceipts::Table,
            PaymentReceipts::EventId,
        )
        .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in INDEXES {
            manager
                .drop_index(Index::drop().name(name).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}
