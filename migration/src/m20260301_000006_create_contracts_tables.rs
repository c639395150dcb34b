use sea_orm_migration::prelude::*;

use crate::m20260301_000001_create_profiles_table::Profiles;
use crate::m20260301_000002_create_producers_table::Producers;
use crate::m20260301_000003_create_events_table::Events;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// One contract per (event, dj).
#[derive(DeriveIden)]
pub(crate) enum Contracts {
    Table,
    Id,
    EventId,
    DjId,
    ProducerId,
    CacheValue,
    ContractContent,
    Signed,
    SignedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ContractTemplates {
    Table,
    Id,
    Name,
    TemplateType,
    Content,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contracts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contracts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contracts::EventId).uuid().not_null())
                    .col(ColumnDef::new(Contracts::DjId).uuid().not_null())
                    .col(ColumnDef::new(Contracts::ProducerId).uuid().null())
                    .col(
                        ColumnDef::new(Contracts::CacheValue)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Contracts::ContractContent).text().not_null())
                    .col(
                        ColumnDef::new(Contracts::Signed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Contracts::SignedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Contracts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Contracts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contracts_event_id")
                            .from(Contracts::Table, Contracts::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contracts_dj_id")
                            .from(Contracts::Table, Contracts::DjId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contracts_producer_id")
                            .from(Contracts::Table, Contracts::ProducerId)
                            .to(Producers::Table, Producers::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_contracts_event_dj")
                    .table(Contracts::Table)
                    .col(Contracts::EventId)
                    .col(Contracts::DjId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ContractTemplates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContractTemplates::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContractTemplates::Name).string().not_null())
                    .col(
                        ColumnDef::new(ContractTemplates::TemplateType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ContractTemplates::Content).text().not_null())
                    .col(
                        ColumnDef::new(ContractTemplates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ContractTemplates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContractTemplates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contracts::Table).to_owned())
            .await
    }
}
