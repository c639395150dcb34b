use sea_orm_migration::prelude::*;

use crate::m20260301_000001_create_profiles_table::Profiles;
use crate::m20260301_000002_create_producers_table::Producers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
pub(crate) enum Events {
    Table,
    Id,
    EventName,
    EventDate,
    EventTime,
    Location,
    City,
    Venue,
    Description,
    CacheValue,
    CommissionRate,
    CommissionAmount,
    PaymentStatus,
    Status,
    ProducerId,
    CreatedBy,
    CreatedByRole,
    SharedWithAdmin,
    VisibleToDj,
    PaymentProofUrl,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(events_table()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await
    }
}

fn events_table() -> TableCreateStatement {
    Table::create()
        .table(Events::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Events::Id)
                .uuid()
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(Events::EventName).string().not_null())
        .col(ColumnDef::new(Events::EventDate).date().not_null())
        .col(ColumnDef::new(Events::EventTime).string().null())
        .col(ColumnDef::new(Events::Location).string().null())
        .col(ColumnDef::new(Events::City).string().null())
        .col(ColumnDef::new(Events::Venue).string().null())
        .col(ColumnDef::new(Events::Description).text().null())
        .col(
            ColumnDef::new(Events::CacheValue)
                .double()
                .not_null()
                .default(0.0),
        )
        .col(ColumnDef::new(Events::CommissionRate).double().null())
        .col(ColumnDef::new(Events::CommissionAmount).double().null())
        .col(
            ColumnDef::new(Events::PaymentStatus)
                .string()
                .not_null()
                .default("pending"),
        )
        .col(
            ColumnDef::new(Events::Status)
                .string()
                .not_null()
                .default("pending"),
        )
        .col(ColumnDef::new(Events::ProducerId).uuid().null())
        .col(ColumnDef::new(Events::CreatedBy).uuid().null())
        .col(ColumnDef::new(Events::CreatedByRole).string().not_null())
        .col(
            ColumnDef::new(Events::SharedWithAdmin)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(Events::VisibleToDj)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(ColumnDef::new(Events::PaymentProofUrl).string().null())
        .col(
            ColumnDef::new(Events::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Events::UpdatedAt)
                .timestamp_with_time_zone()
                .null(),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_events_producer_id")
                .from(Events::Table, Events::ProducerId)
                .to(Producers::Table, Producers::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .on_update(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_events_created_by")
                .from(Events::Table, Events::CreatedBy)
                .to(Profiles::Table, Profiles::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .on_update(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::sea_orm::sea_query::PostgresQueryBuilder;

    #[test]
    fn deleting_the_creator_keeps_the_event() {
        let sql = events_table().to_string(PostgresQueryBuilder);

        assert!(sql.contains(r#""created_by" uuid NULL"#), "{sql}");
        assert!(
            sql.contains(
                r#"FOREIGN KEY ("created_by") REFERENCES "profiles" ("id") ON DELETE SET NULL"#
            ),
            "{sql}"
        );
    }
}
