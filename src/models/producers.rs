use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::profiles;

/// SeaORM entity for the `producers` table (company data for producer profiles).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "producers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub profile_id: Uuid,
    pub company_name: Option<String>,
    pub fantasy_name: Option<String>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    pub commercial_phone: Option<String>,
    pub cnpj: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub cep: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub rating: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub admin_notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::ProfileId",
        to = "super::profiles::Column::Id"
    )]
    Profile,
    #[sea_orm(has_many = "super::events::Entity")]
    Events,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProducerFields {
    pub company_name: Option<String>,
    pub fantasy_name: Option<String>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    pub commercial_phone: Option<String>,
    pub cnpj: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub cep: Option<String>,
    pub rating: Option<f64>,
    pub admin_notes: Option<String>,
}

/// Body of `POST /api/producers`: the profile and the company record together.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProducer {
    pub id: Option<Uuid>,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    #[serde(flatten)]
    pub fields: ProducerFields,
}

/// Body of `PUT /api/producers/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProducer {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    #[serde(flatten)]
    pub fields: ProducerFields,
}

/// A producer record joined with its profile, as returned by the list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProducerView {
    #[serde(flatten)]
    pub producer: Model,
    pub name: Option<String>,
    pub profile_email: Option<String>,
    pub phone: Option<String>,
}

impl ProducerView {
    pub fn new(producer: Model, profile: Option<&profiles::Model>) -> Self {
        Self {
            name: profile.and_then(|p| p.full_name.clone()),
            profile_email: profile.map(|p| p.email.clone()),
            phone: profile.and_then(|p| p.phone.clone()),
            producer,
        }
    }

    /// Label used for ordering and contract text: company, then profile name, then email.
    pub fn label(&self) -> String {
        [
            self.producer.company_name.as_deref(),
            self.producer.fantasy_name.as_deref(),
            self.name.as_deref(),
            self.producer.email.as_deref(),
            self.profile_email.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
    }
}

/// Sort producers case-insensitively by label; ties keep the id order stable.
pub fn sort_by_label(views: &mut [ProducerView]) {
    views.sort_by(|a, b| {
        a.label()
            .to_lowercase()
            .cmp(&b.label().to_lowercase())
            .then_with(|| a.producer.id.cmp(&b.producer.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn producer(company: Option<&str>, email: Option<&str>) -> Model {
        Model {
            id: Uuid::new_v4(),
            profile_id: Uuid::new_v4(),
            company_name: company.map(str::to_string),
            fantasy_name: None,
            contact_person: None,
            contact_phone: None,
            commercial_phone: None,
            cnpj: None,
            address: None,
            city: None,
            state: None,
            cep: None,
            email: email.map(str::to_string),
            avatar_url: None,
            rating: None,
            admin_notes: None,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn label_falls_back_to_email() {
        let view = ProducerView::new(producer(Some("  "), Some("ops@club.com")), None);
        assert_eq!(view.label(), "ops@club.com");
    }

    #[test]
    fn sorts_case_insensitively() {
        let mut views = vec![
            ProducerView::new(producer(Some("zeta"), None), None),
            ProducerView::new(producer(Some("Alpha"), None), None),
            ProducerView::new(producer(None, Some("beta@x.com")), None),
        ];
        sort_by_label(&mut views);
        let labels: Vec<_> = views.iter().map(ProducerView::label).collect();
        assert_eq!(labels, vec!["Alpha", "beta@x.com", "zeta"]);
    }
}
