use actix_web::FromRequest;
use actix_web::{Error, HttpRequest, dev::Payload, web};
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;
use tracing::{error, warn};

use crate::auth::TokenVerifier;
use crate::db::profiles::find_or_create_from_auth;
use crate::models::profiles::{self, CreateProfileFromAuth};

/// The caller's profile, resolved from the bearer token.
///
/// First-time callers get a profile created from their token claims.
pub struct AuthenticatedUser(pub profiles::Model);

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let token = bearer_token(&req)?;

            let verifier = req.app_data::<web::Data<TokenVerifier>>().ok_or_else(|| {
                actix_web::error::ErrorInternalServerError("Token verifier not configured")
            })?;

            let claims = verifier.verify(token).await.map_err(|e| {
                warn!("Rejected bearer token: {e}");
                actix_web::error::ErrorUnauthorized(format!("Invalid token: {e}"))
            })?;

            let user_id = claims
                .user_id()
                .map_err(actix_web::error::ErrorUnauthorized)?;

            let email = claims
                .user_email()
                .ok_or_else(|| actix_web::error::ErrorUnauthorized("No email in token claims"))?;

            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| {
                    actix_web::error::ErrorInternalServerError("Database not configured")
                })?;

            let profile = find_or_create_from_auth(
                db.get_ref(),
                CreateProfileFromAuth {
                    id: user_id,
                    email,
                    full_name: claims.display_name(),
                    avatar_url: claims.avatar_url(),
                    role: claims.requested_role(),
                },
            )
            .await
            .map_err(|e| {
                error!("Failed to load profile {user_id}: {e}");
                actix_web::error::ErrorInternalServerError(format!("Database error: {e}"))
            })?;

            Ok(AuthenticatedUser(profile))
        })
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| actix_web::error::ErrorUnauthorized("Missing Authorization header"))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            actix_web::error::ErrorUnauthorized("Authorization header must be: Bearer <token>")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn extracts_bearer_token() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn rejects_missing_or_malformed_header() {
        let req = TestRequest::default().to_http_request();
        assert!(bearer_token(&req).is_err());

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_http_request();
        assert!(bearer_token(&req).is_err());

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer   "))
            .to_http_request();
        assert!(bearer_token(&req).is_err());
    }
}
