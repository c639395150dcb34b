use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `media_files` table (DJ press kits, photos, sets).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "media_files")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub dj_id: Uuid,
    pub file_name: String,
    pub file_url: String,
    /// Category chosen at upload time (`photo`, `video`, `presskit`, ...).
    pub file_type: String,
    pub file_size: Option<i64>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::DjId",
        to = "super::profiles::Column::Id"
    )]
    Dj,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dj.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct MediaUploadQuery {
    pub file_name: String,
    pub category: Option<String>,
}

impl MediaUploadQuery {
    pub fn category(&self) -> String {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or("other")
            .to_lowercase()
    }
}
