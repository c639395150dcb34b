use sea_orm_migration::prelude::*;

use crate::m20260301_000001_create_profiles_table::Profiles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
pub(crate) enum Producers {
    Table,
    Id,
    ProfileId,
    CompanyName,
    FantasyName,
    ContactPerson,
    ContactPhone,
    CommercialPhone,
    Cnpj,
    Address,
    City,
    State,
    Cep,
    Email,
    AvatarUrl,
    Rating,
    AdminNotes,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Producers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Producers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Producers::ProfileId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Producers::CompanyName).string().null())
                    .col(ColumnDef::new(Producers::FantasyName).string().null())
                    .col(ColumnDef::new(Producers::ContactPerson).string().null())
                    .col(ColumnDef::new(Producers::ContactPhone).string().null())
                    .col(ColumnDef::new(Producers::CommercialPhone).string().null())
                    .col(ColumnDef::new(Producers::Cnpj).string().null())
                    .col(ColumnDef::new(Producers::Address).string().null())
                    .col(ColumnDef::new(Producers::City).string().null())
                    .col(ColumnDef::new(Producers::State).string().null())
                    .col(ColumnDef::new(Producers::Cep).string().null())
                    .col(ColumnDef::new(Producers::Email).string().null())
                    .col(ColumnDef::new(Producers::AvatarUrl).string().null())
                    .col(ColumnDef::new(Producers::Rating).double().null())
                    .col(ColumnDef::new(Producers::AdminNotes).text().null())
                    .col(
                        ColumnDef::new(Producers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Producers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_producers_profile_id")
                            .from(Producers::Table, Producers::ProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Producers::Table).to_owned())
            .await
    }
}
