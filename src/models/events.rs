use std::collections::HashMap;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::payments::PaymentStatus;
use super::profiles::Roles;
use crate::finance::NumberLike;

/// Lifecycle of the booking itself, independent of its payment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// SeaORM entity for the `events` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub event_name: String,
    pub event_date: Date,
    pub event_time: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub venue: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub cache_value: f64,
    #[sea_orm(column_type = "Double", nullable)]
    pub commission_rate: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub commission_amount: Option<f64>,
    pub payment_status: PaymentStatus,
    pub status: EventStatus,
    pub producer_id: Option<Uuid>,
    /// Cleared when the creator's profile is deleted; the event stays.
    pub created_by: Option<Uuid>,
    pub created_by_role: Roles,
    pub shared_with_admin: bool,
    pub visible_to_dj: bool,
    pub payment_proof_url: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::producers::Entity",
        from = "Column::ProducerId",
        to = "super::producers::Column::Id"
    )]
    Producer,
    #[sea_orm(has_many = "super::event_djs::Entity")]
    EventDjs,
    #[sea_orm(has_many = "super::contracts::Entity")]
    Contracts,
    #[sea_orm(has_one = "super::payments::Entity")]
    Payment,
}

impl Related<super::producers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Producer.def()
    }
}

impl Related<super::event_djs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventDjs.def()
    }
}

impl Related<super::contracts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contracts.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Body of `POST /api/events` and `PUT /api/events/{id}`.
///
/// Field aliases accept the shapes older forms send (`title`, `date`, `cache`).
/// Numbers arrive as JSON numbers or Brazilian-formatted strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventInput {
    #[serde(default, alias = "title", alias = "name")]
    pub event_name: Option<String>,
    #[serde(default, alias = "date")]
    pub event_date: Option<String>,
    #[serde(default, alias = "start_time")]
    pub event_time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "cache")]
    pub cache_value: Option<NumberLike>,
    #[serde(default, alias = "commission_percentage")]
    pub commission_rate: Option<NumberLike>,
    #[serde(default)]
    pub commission_amount: Option<NumberLike>,
    #[serde(default)]
    pub status: Option<EventStatus>,
    #[serde(default, alias = "producerId")]
    pub producer_id: Option<Uuid>,
    #[serde(default)]
    pub dj_id: Option<Uuid>,
    #[serde(default, alias = "djIds")]
    pub dj_ids: Option<Vec<Uuid>>,
    #[serde(default)]
    pub dj_fee_map: HashMap<Uuid, NumberLike>,
    #[serde(default)]
    pub shared_with_admin: Option<bool>,
    #[serde(default)]
    pub visible_to_dj: Option<bool>,
}

impl EventInput {
    /// Whether the body says anything about DJ assignments.
    pub fn touches_djs(&self) -> bool {
        self.dj_id.is_some() || self.dj_ids.is_some()
    }
}

/// Event detail with everything the booking screen needs.
#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    #[serde(flatten)]
    pub event: Model,
    pub producer: Option<super::producers::ProducerView>,
    pub djs: Vec<EventDjView>,
    pub payment: Option<super::payments::Model>,
}

/// One DJ assignment with the DJ's public summary.
#[derive(Debug, Clone, Serialize)]
pub struct EventDjView {
    #[serde(flatten)]
    pub assignment: super::event_djs::Model,
    pub dj: Option<super::profiles::DjSummary>,
}

/// A validated event row, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct EventFields {
    pub event_name: String,
    pub event_date: Date,
    pub event_time: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub venue: Option<String>,
    pub description: Option<String>,
    pub cache_value: f64,
    pub commission_rate: Option<f64>,
    pub commission_amount: Option<f64>,
    pub status: Option<EventStatus>,
    pub producer_id: Option<Uuid>,
    pub shared_with_admin: Option<bool>,
    pub visible_to_dj: Option<bool>,
}
