use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::{Uuid, Variant};

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{QueryCache, keys};
use crate::db::profiles as profile_db;
use crate::models::profiles::Roles;
use crate::supabase::SupabaseClient;

/// Hyphenated RFC 4122 UUID of version 1 to 5.
///
/// Anything else is rejected before it reaches the auth admin API.
pub fn parse_user_id(raw: &str) -> Option<Uuid> {
    if raw.len() != 36 {
        return None;
    }
    let id = Uuid::try_parse(raw).ok()?;
    let version_ok = (1..=5).contains(&id.get_version_num());
    (version_ok && id.get_variant() == Variant::RFC4122).then_some(id)
}

fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message.into() }))
}

/// POST /api/admin/delete-user — `{"userId": "<uuid>"}`.
///
/// Every failure, authorization included, answers 400 with `{"error": ...}`.
pub async fn delete_user(
    user: Option<AuthenticatedUser>,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<QueryCache>,
    supabase: web::Data<SupabaseClient>,
    body: web::Bytes,
) -> HttpResponse {
    let Some(AuthenticatedUser(admin)) = user else {
        return bad_request("User is not authenticated");
    };
    if admin.role != Roles::Admin {
        warn!("Non-admin {} tried to delete a user", admin.id);
        return bad_request("Only administrators can delete users");
    }

    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let Some(raw) = body.get("userId").and_then(Value::as_str).filter(|s| !s.is_empty()) else {
        return bad_request("userId is invalid");
    };
    let Some(user_id) = parse_user_id(raw) else {
        return bad_request("userId must be a UUID");
    };

    if let Err(e) = supabase.delete_auth_user(user_id).await {
        error!("Auth deletion of {user_id} failed: {e}");
        return bad_request(e.to_string());
    }
    if let Err(e) = profile_db::delete_profile(db.get_ref(), user_id).await {
        error!("Profile deletion of {user_id} failed: {e}");
        return bad_request(format!("Database error: {e}"));
    }
    cache.invalidate(&[keys::ALL_DJS, keys::ALL_FINANCE]).await;
    info!("User {user_id} deleted by admin {}", admin.id);

    HttpResponse::Ok().json(serde_json::json!({ "success": true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_versions_one_through_five() {
        assert!(parse_user_id("6ba7b810-9dad-11d1-80b4-00c04fd430c8").is_some());
        assert!(parse_user_id("f47ac10b-58cc-4372-a567-0e02b2c3d479").is_some());
        assert!(parse_user_id("F47AC10B-58CC-4372-A567-0E02B2C3D479").is_some());
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(parse_user_id("").is_none());
        assert!(parse_user_id("not-a-uuid").is_none());
        // simple form, no hyphens
        assert!(parse_user_id("f47ac10b58cc4372a5670e02b2c3d479").is_none());
        assert!(parse_user_id("{f47ac10b-58cc-4372-a567-0e02b2c3d479}").is_none());
        // version 7
        assert!(parse_user_id("017f22e2-79b0-7cc3-98c4-dc0c0c07398f").is_none());
        // nil has version 0
        assert!(parse_user_id("00000000-0000-0000-0000-000000000000").is_none());
        // variant bits outside 8..b
        assert!(parse_user_id("f47ac10b-58cc-4372-c567-0e02b2c3d479").is_none());
    }
}
