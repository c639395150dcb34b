use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `profiles` table. Ids match the auth user ids.
#[derive(DeriveIden)]
pub(crate) enum Profiles {
    Table,
    Id,
    Email,
    FullName,
    Role,
    Phone,
    AvatarUrl,
    Status,
    ArtistName,
    RealName,
    Genre,
    Bio,
    BasePrice,
    InstagramUrl,
    SoundcloudUrl,
    YoutubeUrl,
    TiktokUrl,
    Location,
    PixKey,
    Cpf,
    BirthDate,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Profiles::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Profiles::FullName).string().null())
                    .col(
                        ColumnDef::new(Profiles::Role)
                            .string()
                            .not_null()
                            .default("producer"),
                    )
                    .col(ColumnDef::new(Profiles::Phone).string().null())
                    .col(ColumnDef::new(Profiles::AvatarUrl).string().null())
                    .col(ColumnDef::new(Profiles::Status).string().null())
                    .col(ColumnDef::new(Profiles::ArtistName).string().null())
                    .col(ColumnDef::new(Profiles::RealName).string().null())
                    .col(ColumnDef::new(Profiles::Genre).string().null())
                    .col(ColumnDef::new(Profiles::Bio).text().null())
                    .col(ColumnDef::new(Profiles::BasePrice).double().null())
                    .col(ColumnDef::new(Profiles::InstagramUrl).string().null())
                    .col(ColumnDef::new(Profiles::SoundcloudUrl).string().null())
                    .col(ColumnDef::new(Profiles::YoutubeUrl).string().null())
                    .col(ColumnDef::new(Profiles::TiktokUrl).string().null())
                    .col(ColumnDef::new(Profiles::Location).string().null())
                    .col(ColumnDef::new(Profiles::PixKey).string().null())
                    .col(ColumnDef::new(Profiles::Cpf).string().null())
                    .col(ColumnDef::new(Profiles::BirthDate).date().null())
                    .col(
                        ColumnDef::new(Profiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Profiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await
    }
}
