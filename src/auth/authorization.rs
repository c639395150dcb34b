use sea_orm::{DatabaseConnection, DbErr};
use uuid::Uuid;

use crate::db::Visibility;
use crate::db::producers as producer_db;
use crate::error::ApiError;
use crate::models::profiles::{self, Roles};
use crate::models::{contracts, events};

/// Who is asking, with the producer record resolved once per request.
#[derive(Debug, Clone)]
pub struct Caller {
    pub profile: profiles::Model,
    pub producer_id: Option<Uuid>,
}

impl Caller {
    pub async fn resolve(db: &DatabaseConnection, profile: profiles::Model) -> Result<Self, DbErr> {
        let producer_id = match profile.role {
            Roles::Producer => producer_db::get_producer_by_profile(db, profile.id)
                .await?
                .map(|p| p.id),
            _ => None,
        };
        Ok(Self {
            profile,
            producer_id,
        })
    }

    pub fn id(&self) -> Uuid {
        self.profile.id
    }

    pub fn role(&self) -> Roles {
        self.profile.role
    }

    pub fn is_admin(&self) -> bool {
        self.profile.role == Roles::Admin
    }

    pub fn visibility(&self) -> Visibility {
        match self.profile.role {
            Roles::Admin => Visibility::All,
            Roles::Producer => Visibility::Producer {
                profile_id: self.profile.id,
                producer_id: self.producer_id,
            },
            Roles::Dj => Visibility::Dj(self.profile.id),
        }
    }

    /// Admins, the event's creator and the producer it is booked for.
    pub fn can_manage_event(&self, event: &events::Model) -> bool {
        self.is_admin()
            || event.created_by == Some(self.profile.id)
            || (self.producer_id.is_some() && event.producer_id == self.producer_id)
    }

    /// Admins and the producer the contract belongs to may edit its text.
    pub fn can_edit_contract(&self, contract: &contracts::Model) -> bool {
        self.is_admin() || (self.producer_id.is_some() && contract.producer_id == self.producer_id)
    }

    pub fn is_contract_party(&self, contract: &contracts::Model) -> bool {
        contract.dj_id == self.profile.id || self.can_edit_contract(contract)
    }

    /// Admins may act on anyone; everyone else only on themselves.
    pub fn can_act_on_profile(&self, profile_id: Uuid) -> bool {
        self.is_admin() || self.profile.id == profile_id
    }
}

pub fn require_admin(profile: &profiles::Model) -> Result<(), ApiError> {
    if profile.role == Roles::Admin {
        Ok(())
    } else {
        Err(ApiError::forbidden("Admin access required"))
    }
}

pub fn require(allowed: bool, message: &str) -> Result<(), ApiError> {
    if allowed {
        Ok(())
    } else {
        Err(ApiError::forbidden(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::events::EventStatus;
    use crate::models::payments::PaymentStatus;

    fn profile(role: Roles) -> profiles::Model {
        profiles::Model {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            full_name: None,
            role,
            phone: None,
            avatar_url: None,
            status: None,
            artist_name: None,
            real_name: None,
            genre: None,
            bio: None,
            base_price: None,
            instagram_url: None,
            soundcloud_url: None,
            youtube_url: None,
            tiktok_url: None,
            location: None,
            pix_key: None,
            cpf: None,
            birth_date: None,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    fn caller(role: Roles, producer_id: Option<Uuid>) -> Caller {
        Caller {
            profile: profile(role),
            producer_id,
        }
    }

    fn event(created_by: Uuid, producer_id: Option<Uuid>) -> events::Model {
        events::Model {
            id: Uuid::new_v4(),
            event_name: "Baile".to_string(),
            event_date: chrono::NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            event_time: None,
            location: None,
            city: None,
            venue: None,
            description: None,
            cache_value: 0.0,
            commission_rate: None,
            commission_amount: None,
            payment_status: PaymentStatus::Pending,
            status: EventStatus::Pending,
            producer_id,
            created_by: Some(created_by),
            created_by_role: Roles::Admin,
            shared_with_admin: true,
            visible_to_dj: true,
            payment_proof_url: None,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    fn contract(dj_id: Uuid, producer_id: Option<Uuid>) -> contracts::Model {
        contracts::Model {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            dj_id,
            producer_id,
            cache_value: 0.0,
            contract_content: String::new(),
            signed: false,
            signed_at: None,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn producers_manage_their_own_events_only() {
        let producer_id = Uuid::new_v4();
        let me = caller(Roles::Producer, Some(producer_id));

        assert!(me.can_manage_event(&event(Uuid::new_v4(), Some(producer_id))));
        assert!(me.can_manage_event(&event(me.id(), None)));
        assert!(!me.can_manage_event(&event(Uuid::new_v4(), Some(Uuid::new_v4()))));
        assert!(!me.can_manage_event(&event(Uuid::new_v4(), None)));
    }

    #[test]
    fn producer_without_record_does_not_match_unassigned_events() {
        let me = caller(Roles::Producer, None);
        assert!(!me.can_manage_event(&event(Uuid::new_v4(), None)));
        assert!(!me.can_edit_contract(&contract(Uuid::new_v4(), None)));
    }

    #[test]
    fn contract_parties() {
        let dj = caller(Roles::Dj, None);
        let own = contract(dj.id(), Some(Uuid::new_v4()));
        assert!(dj.is_contract_party(&own));
        assert!(!dj.can_edit_contract(&own));
        assert!(!dj.is_contract_party(&contract(Uuid::new_v4(), None)));

        let admin = caller(Roles::Admin, None);
        assert!(admin.can_edit_contract(&own));
    }

    #[test]
    fn visibility_follows_role() {
        let dj = caller(Roles::Dj, None);
        assert_eq!(dj.visibility(), Visibility::Dj(dj.id()));
        assert_eq!(caller(Roles::Admin, None).visibility(), Visibility::All);
    }

    #[test]
    fn require_admin_rejects_others() {
        assert!(require_admin(&profile(Roles::Admin)).is_ok());
        assert!(matches!(
            require_admin(&profile(Roles::Dj)),
            Err(ApiError::Forbidden(_))
        ));
    }
}
