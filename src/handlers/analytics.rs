use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::authorization::{Caller, require_admin};
use crate::auth::middleware::AuthenticatedUser;
use crate::config::AppConfig;
use crate::db::{analytics, relations as relation_db};
use crate::error::ApiError;
use crate::handlers::read;
use crate::models::dj_producer_relations::RelationQuery;
use crate::models::profiles::Roles;

/// GET /api/analytics/dashboard — admin counters.
pub async fn dashboard(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;

    let counts = read(&config, "dashboard counts", || {
        analytics::dashboard_counts(db.get_ref())
    })
    .await?;

    Ok(HttpResponse::Ok().json(counts))
}

/// Narrow a relation query to what the caller may see.
///
/// Admins keep their filters; a DJ only sees their own rows and a producer
/// only rows for their company. A producer without a record sees nothing.
pub fn scope_relations(caller: &Caller, mut query: RelationQuery) -> Option<RelationQuery> {
    match caller.role() {
        Roles::Admin => {}
        Roles::Dj => query.dj_id = Some(caller.id()),
        Roles::Producer => query.producer_id = Some(caller.producer_id?),
    }
    Some(query)
}

/// GET /api/relations?dj_id=...&producer_id=...
pub async fn list_relations(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    query: web::Query<RelationQuery>,
) -> Result<HttpResponse, ApiError> {
    let caller = Caller::resolve(db.get_ref(), user.0).await?;
    let Some(query) = scope_relations(&caller, query.into_inner()) else {
        return Ok(HttpResponse::Ok().json(Vec::<()>::new()));
    };

    let relations = read(&config, "list relations", || {
        relation_db::list_relations(db.get_ref(), &query)
    })
    .await?;

    Ok(HttpResponse::Ok().json(relations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profiles;
    use uuid::Uuid;

    fn caller(role: Roles, producer_id: Option<Uuid>) -> Caller {
        Caller {
            profile: profiles::Model {
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
            },
            producer_id,
        }
    }

    #[test]
    fn admins_keep_their_filters() {
        let query = RelationQuery {
            dj_id: Some(Uuid::new_v4()),
            producer_id: None,
        };
        let scoped = scope_relations(&caller(Roles::Admin, None), query.clone()).unwrap();
        assert_eq!(scoped.dj_id, query.dj_id);
        assert_eq!(scoped.producer_id, None);
    }

    #[test]
    fn djs_and_producers_are_pinned_to_themselves() {
        let other = Uuid::new_v4();
        let dj = caller(Roles::Dj, None);
        let scoped = scope_relations(
            &dj,
            RelationQuery {
                dj_id: Some(other),
                producer_id: None,
            },
        )
        .unwrap();
        assert_eq!(scoped.dj_id, Some(dj.id()));

        let company = Uuid::new_v4();
        let scoped = scope_relations(
            &caller(Roles::Producer, Some(company)),
            RelationQuery {
                dj_id: None,
                producer_id: Some(other),
            },
        )
        .unwrap();
        assert_eq!(scoped.producer_id, Some(company));
    }

    #[test]
    fn producer_without_record_sees_nothing() {
        let query = RelationQuery {
            dj_id: None,
            producer_id: None,
        };
        assert!(scope_relations(&caller(Roles::Producer, None), query).is_none());
    }
}
