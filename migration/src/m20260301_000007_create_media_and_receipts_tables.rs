use sea_orm_migration::prelude::*;

use crate::m20260301_000001_create_profiles_table::Profiles;
use crate::m20260301_000002_create_producers_table::Producers;
use crate::m20260301_000003_create_events_table::Events;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
pub(crate) enum MediaFiles {
    Table,
    Id,
    DjId,
    FileName,
    FileUrl,
    FileType,
    FileSize,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum PaymentReceipts {
    Table,
    Id,
    EventId,
    DjId,
    ProducerId,
    ReceiptUrl,
    Amount,
    Notes,
    UploadedBy,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MediaFiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MediaFiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MediaFiles::DjId).uuid().not_null())
                    .col(ColumnDef::new(MediaFiles::FileName).string().not_null())
                    .col(ColumnDef::new(MediaFiles::FileUrl).string().not_null())
                    .col(
                        ColumnDef::new(MediaFiles::FileType)
                            .string()
                            .not_null()
                            .default("other"),
                    )
                    .col(ColumnDef::new(MediaFiles::FileSize).big_integer().null())
                    .col(
                        ColumnDef::new(MediaFiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_files_dj_id")
                            .from(MediaFiles::Table, MediaFiles::DjId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentReceipts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentReceipts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PaymentReceipts::EventId).uuid().not_null())
                    .col(ColumnDef::new(PaymentReceipts::DjId).uuid().not_null())
                    .col(ColumnDef::new(PaymentReceipts::ProducerId).uuid().null())
                    .col(ColumnDef::new(PaymentReceipts::ReceiptUrl).string().not_null())
                    .col(ColumnDef::new(PaymentReceipts::Amount).double().null())
                    .col(ColumnDef::new(PaymentReceipts::Notes).text().null())
                    .col(ColumnDef::new(PaymentReceipts::UploadedBy).uuid().null())
                    .col(
                        ColumnDef::new(PaymentReceipts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_receipts_event_id")
                            .from(PaymentReceipts::Table, PaymentReceipts::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_receipts_dj_id")
                            .from(PaymentReceipts::Table, PaymentReceipts::DjId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_receipts_producer_id")
                            .from(PaymentReceipts::Table, PaymentReceipts::ProducerId)
                            .to(Producers::Table, Producers::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_receipts_uploaded_by")
                            .from(PaymentReceipts::Table, PaymentReceipts::UploadedBy)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PaymentReceipts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MediaFiles::Table).to_owned())
            .await
    }
}
