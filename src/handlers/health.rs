use actix_web::{HttpResponse, web};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use serde::Serialize;
use tracing::warn;

use crate::cache::QueryCache;
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentStatus {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentStatus {
    fn up() -> Self {
        Self {
            status: "UP",
            message: None,
        }
    }

    fn down(message: impl Into<String>) -> Self {
        Self {
            status: "DOWN",
            message: Some(message.into()),
        }
    }

    fn disabled(message: impl Into<String>) -> Self {
        Self {
            status: "DISABLED",
            message: Some(message.into()),
        }
    }
}

/// Which optional backends this instance was started with.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Backends {
    /// Storage uploads and admin user deletion.
    pub service_role: bool,
    /// `hs256` with a shared secret, otherwise `jwks`.
    pub token_verification: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: ComponentStatus,
    pub cache: ComponentStatus,
    pub backends: Backends,
}

async fn check_database(db: &DatabaseConnection) -> ComponentStatus {
    match db.execute_unprepared("SELECT 1").await {
        Ok(_) => ComponentStatus::up(),
        Err(e) => {
            warn!("Health check: database unreachable: {e}");
            ComponentStatus::down(e.to_string())
        }
    }
}

async fn check_cache(cache: &QueryCache) -> ComponentStatus {
    match cache.healthy().await {
        None => ComponentStatus::disabled("REDIS_URL is not set"),
        Some(true) => ComponentStatus::up(),
        Some(false) => ComponentStatus::down("Redis did not answer PING"),
    }
}

/// GET /api/health — 200 while the database answers, 503 otherwise.
///
/// The cache and the optional Supabase backends are reported but never
/// make the service unhealthy.
pub async fn health(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    cache: web::Data<QueryCache>,
) -> HttpResponse {
    let database = check_database(db.get_ref()).await;
    let cache = check_cache(cache.get_ref()).await;
    let healthy = database.status == "UP";

    let body = HealthStatus {
        status: if healthy { "UP" } else { "DOWN" },
        database,
        cache,
        backends: Backends {
            service_role: config.privileged_backend_configured(),
            token_verification: if config.supabase.jwt_secret.is_some() {
                "hs256"
            } else {
                "jwks"
            },
        },
    };

    if healthy {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
