pub mod analytics;
pub mod contract_templates;
pub mod contracts;
pub mod event_djs;
pub mod events;
pub mod media;
pub mod payment_receipts;
pub mod payments;
pub mod producers;
pub mod profiles;
pub mod relations;
pub mod retry;

use sea_orm::{Database, DatabaseConnection, DbErr};
use uuid::Uuid;

/// Create a SeaORM database connection pool.
pub async fn create_pool(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Which rows a caller may list, derived from their profile role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    All,
    /// A producer sees events booked for their company and events they created.
    Producer {
        profile_id: Uuid,
        producer_id: Option<Uuid>,
    },
    /// A DJ sees the events they are assigned to.
    Dj(Uuid),
}
