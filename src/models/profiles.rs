use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The `Roles` enum maps to a Postgres TEXT column stored as lowercase strings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Roles {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "producer")]
    Producer,
    #[sea_orm(string_value = "dj")]
    Dj,
}

impl Roles {
    /// Lenient parse of a role claim; unknown values are `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Roles::Admin),
            "producer" | "produtor" => Some(Roles::Producer),
            "dj" => Some(Roles::Dj),
            _ => None,
        }
    }
}

/// SeaORM entity for the `profiles` table.
///
/// One row per auth user. DJs keep their artist data on the profile itself.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub full_name: Option<String>,
    pub role: Roles,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub status: Option<String>,
    pub artist_name: Option<String>,
    pub real_name: Option<String>,
    pub genre: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub base_price: Option<f64>,
    pub instagram_url: Option<String>,
    pub soundcloud_url: Option<String>,
    pub youtube_url: Option<String>,
    pub tiktok_url: Option<String>,
    pub location: Option<String>,
    pub pix_key: Option<String>,
    pub cpf: Option<String>,
    pub birth_date: Option<Date>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::producers::Entity")]
    Producer,
    #[sea_orm(has_many = "super::event_djs::Entity")]
    EventDjs,
    #[sea_orm(has_many = "super::media_files::Entity")]
    MediaFiles,
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

impl Related<super::media_files::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MediaFiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Name shown for a DJ: artist name, then real name, then full name, then email.
    pub fn dj_display_name(&self) -> String {
        [&self.artist_name, &self.real_name, &self.full_name]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or(self.email.as_str())
            .to_string()
    }
}

// ── DTOs (not stored in DB, used for request bodies) ──

/// Used internally by the auth middleware to create a profile from JWT claims.
#[derive(Debug, Clone)]
pub struct CreateProfileFromAuth {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Roles,
}

/// Artist fields shared by DJ create and update bodies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DjFields {
    pub full_name: Option<String>,
    pub artist_name: Option<String>,
    pub real_name: Option<String>,
    pub phone: Option<String>,
    pub genre: Option<String>,
    pub bio: Option<String>,
    pub base_price: Option<f64>,
    pub instagram_url: Option<String>,
    pub soundcloud_url: Option<String>,
    pub youtube_url: Option<String>,
    pub tiktok_url: Option<String>,
    pub location: Option<String>,
    pub pix_key: Option<String>,
    pub cpf: Option<String>,
    pub birth_date: Option<Date>,
    pub status: Option<String>,
}

/// Body of `POST /api/djs`. The id is the auth user the DJ signs in as.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDj {
    pub id: Option<Uuid>,
    pub email: String,
    #[serde(flatten)]
    pub fields: DjFields,
}

/// Safe profile representation for the `/auth/me` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Roles,
    pub avatar_url: Option<String>,
    pub artist_name: Option<String>,
    pub created_at: DateTimeUtc,
}

impl From<Model> for ProfileResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            full_name: m.full_name,
            role: m.role,
            avatar_url: m.avatar_url,
            artist_name: m.artist_name,
            created_at: m.created_at,
        }
    }
}

/// DJ summary embedded in event and contract views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DjSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

impl From<&Model> for DjSummary {
    fn from(m: &Model) -> Self {
        Self {
            id: m.id,
            name: m.dj_display_name(),
            email: m.email.clone(),
            avatar_url: m.avatar_url.clone(),
        }
    }
}
