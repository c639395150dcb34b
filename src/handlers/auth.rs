use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::info;

use crate::auth::middleware::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::profiles::ProfileResponse;
use crate::supabase::SupabaseClient;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

fn required_email(raw: &str) -> Result<&str, ApiError> {
    let email = raw.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::validation("A valid email is required"));
    }
    Ok(email)
}

/// POST /api/auth/login — exchange email and password for a Supabase session.
pub async fn login(
    supabase: web::Data<SupabaseClient>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let email = required_email(&body.email)?;
    if body.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let session = supabase.sign_in_with_password(email, &body.password).await?;
    info!("Signed in {}", session.user.id);

    Ok(HttpResponse::Ok().json(session))
}

/// GET /api/auth/me — the caller's profile.
pub async fn me(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(ProfileResponse::from(user.0))
}

/// POST /api/auth/password-reset — send the recovery email.
pub async fn password_reset(
    supabase: web::Data<SupabaseClient>,
    body: web::Json<PasswordResetRequest>,
) -> Result<HttpResponse, ApiError> {
    let email = required_email(&body.email)?;
    supabase.send_password_reset(email).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Password reset email sent",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_must_look_like_one() {
        assert_eq!(required_email("  ana@example.com ").unwrap(), "ana@example.com");
        assert!(required_email("").is_err());
        assert!(required_email("not-an-email").is_err());
    }
}
