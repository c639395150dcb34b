use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::payments::PaymentStatus;

/// SeaORM entity for the `event_djs` join table. Unique per (event, dj).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event_djs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub event_id: Uuid,
    pub dj_id: Uuid,
    /// `None` when no explicit fee was given; the cache is then split evenly.
    #[sea_orm(column_type = "Double", nullable)]
    pub fee: Option<f64>,
    pub payment_status: PaymentStatus,
    pub payment_receipt_url: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id"
    )]
    Event,
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::DjId",
        to = "super::profiles::Column::Id"
    )]
    Dj,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dj.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
