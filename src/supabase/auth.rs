use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::{SupabaseClient, SupabaseError, ensure_success};

/// Session returned by a password sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: String,
    pub user: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

impl SupabaseClient {
    /// POST /auth/v1/token?grant_type=password
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, SupabaseError> {
        debug!("Signing in {email} with password grant");

        let response = self
            .client
            .post(self.url("/auth/v1/token?grant_type=password"))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        Ok(ensure_success(response).await?.json::<Session>().await?)
    }

    /// POST /auth/v1/recover, which sends the password-reset email.
    pub async fn send_password_reset(&self, email: &str) -> Result<(), SupabaseError> {
        let response = self
            .client
            .post(self.url("/auth/v1/recover"))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    /// DELETE /auth/v1/admin/users/{id}. Needs the service-role key.
    pub async fn delete_auth_user(&self, user_id: Uuid) -> Result<(), SupabaseError> {
        let key = self.service_role_key("Supabase admin API")?;

        let response = self
            .client
            .delete(self.url(&format!("/auth/v1/admin/users/{user_id}")))
            .header("apikey", key)
            .bearer_auth(key)
            .send()
            .await?;

        ensure_success(response).await?;
        info!("Deleted auth user {user_id}");
        Ok(())
    }
}
