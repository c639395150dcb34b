pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_profiles_table;
mod m20260301_000002_create_producers_table;
mod m20260301_000003_create_events_table;
mod m20260301_000004_create_event_djs_table;
mod m20260301_000005_create_payments_table;
mod m20260301_000006_create_contracts_tables;
mod m20260301_000007_create_media_and_receipts_tables;
mod m20260301_000008_create_dj_producer_relations_table;
mod m20260302_000001_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_profiles_table::Migration),
            Box::new(m20260301_000002_create_producers_table::Migration),
            Box::new(m20260301_000003_create_events_table::Migration),
            Box::new(m20260301_000004_create_event_djs_table::Migration),
            Box::new(m20260301_000005_create_payments_table::Migration),
            Box::new(m20260301_000006_create_contracts_tables::Migration),
            Box::new(m20260301_000007_create_media_and_receipts_tables::Migration),
            Box::new(m20260301_000008_create_dj_producer_relations_table::Migration),
            Box::new(m20260302_000001_add_indexes::Migration),
        ]
    }
}
