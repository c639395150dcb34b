//! Thin reqwest client for the parts of Supabase this service proxies:
//! GoTrue auth (sign-in, password recovery, admin user deletion) and Storage.

pub mod auth;
pub mod storage;

use actix_web::http::StatusCode;
use thiserror::Error;

use crate::config::SupabaseConfig;

#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("Supabase request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Supabase returned HTTP {status}: {message}")]
    Api { status: u16, message: String },
}

impl SupabaseError {
    /// HTTP status this error should surface as to our own callers.
    pub fn status_code(&self) -> StatusCode {
        match self {
            SupabaseError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            SupabaseError::Transport(_) => StatusCode::BAD_GATEWAY,
            SupabaseError::Api { status, .. } => match *status {
                400 | 422 => StatusCode::BAD_REQUEST,
                401 => StatusCode::UNAUTHORIZED,
                403 => StatusCode::FORBIDDEN,
                404 => StatusCode::NOT_FOUND,
                409 => StatusCode::CONFLICT,
                _ => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

#[derive(Clone)]
pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    service_role_key: Option<String>,
}

impl SupabaseClient {
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            service_role_key: config.service_role_key.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_service_role(&self) -> bool {
        self.service_role_key.is_some()
    }

    fn service_role_key(&self, feature: &'static str) -> Result<&str, SupabaseError> {
        self.service_role_key
            .as_deref()
            .ok_or(SupabaseError::NotConfigured(feature))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a non-2xx response into `SupabaseError::Api`, keeping the most useful message field.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, SupabaseError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            ["msg", "message", "error_description", "error"]
                .iter()
                .find_map(|key| v[*key].as_str().map(str::to_string))
        })
        .unwrap_or(body);

    Err(SupabaseError::Api {
        status: status.as_u16(),
        message,
    })
}
