use sea_orm_migration::prelude::*;

use crate::m20260301_000001_create_profiles_table::Profiles;
use crate::m20260301_000002_create_producers_table::Producers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
pub(crate) enum DjProducerRelations {
    Table,
    Id,
    DjId,
    ProducerId,
    TotalEvents,
    TotalRevenue,
    LastEventDate,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DjProducerRelations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DjProducerRelations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DjProducerRelations::DjId).uuid().not_null())
                    .col(
                        ColumnDef::new(DjProducerRelations::ProducerId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DjProducerRelations::TotalEvents)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DjProducerRelations::TotalRevenue)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(DjProducerRelations::LastEventDate).date().null())
                    .col(
                        ColumnDef::new(DjProducerRelations::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(DjProducerRelations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DjProducerRelations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dj_producer_relations_dj_id")
                            .from(DjProducerRelations::Table, DjProducerRelations::DjId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dj_producer_relations_producer_id")
                            .from(DjProducerRelations::Table, DjProducerRelations::ProducerId)
                            .to(Producers::Table, Producers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_dj_producer_relations_pair")
                    .table(DjProducerRelations::Table)
                    .col(DjProducerRelations::DjId)
                    .col(DjProducerRelations::ProducerId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DjProducerRelations::Table).to_owned())
            .await
    }
}
