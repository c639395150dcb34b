use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::{DbErr, RuntimeErr};
use thiserror::Error;

use crate::supabase::SupabaseError;

const PG_INSUFFICIENT_PRIVILEGE: &str = "42501";
const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";
const PG_NOT_NULL_VIOLATION: &str = "23502";
const PG_CHECK_VIOLATION: &str = "23514";

/// Closed classification of data-access failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    Conflict,
    Invalid,
    Unavailable,
    Internal,
}

impl ErrorKind {
    pub fn classify(err: &DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => return ErrorKind::NotFound,
            DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => return ErrorKind::Unavailable,
            _ => {}
        }

        match postgres_code(err).as_deref() {
            Some(PG_INSUFFICIENT_PRIVILEGE) => ErrorKind::Unauthorized,
            Some(PG_UNIQUE_VIOLATION) => ErrorKind::Conflict,
            Some(PG_FOREIGN_KEY_VIOLATION | PG_NOT_NULL_VIOLATION | PG_CHECK_VIOLATION) => {
                ErrorKind::Invalid
            }
            _ => ErrorKind::Internal,
        }
    }

    /// Whether a failed read is worth another attempt.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::Unavailable | ErrorKind::Internal)
    }

    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Invalid => StatusCode::BAD_REQUEST,
            ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn postgres_code(err: &DbErr) -> Option<String> {
    let sqlx_err = match err {
        DbErr::Query(RuntimeErr::SqlxError(e)) | DbErr::Exec(RuntimeErr::SqlxError(e)) => e,
        _ => return None,
    };

    sqlx_err
        .as_database_error()
        .and_then(|db_err| db_err.code())
        .map(|code| code.into_owned())
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error(transparent)]
    Upstream(#[from] SupabaseError),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        ApiError::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ApiError::Conflict(msg.into())
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ApiError::Database(e) => Some(ErrorKind::classify(e)),
            _ => None,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(e) => ErrorKind::classify(e).status_code(),
            ApiError::Upstream(e) => e.status_code(),
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(%status, "{self}");
        } else {
            tracing::debug!(%status, "{self}");
        }

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_variants_map_to_404() {
        let err = DbErr::RecordNotFound("Event not found".to_string());
        assert_eq!(ErrorKind::classify(&err), ErrorKind::NotFound);
        assert_eq!(ErrorKind::classify(&DbErr::RecordNotUpdated), ErrorKind::NotFound);
        assert_eq!(
            ApiError::from(err).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn custom_errors_are_internal_and_retryable() {
        let kind = ErrorKind::classify(&DbErr::Custom("boom".to_string()));
        assert_eq!(kind, ErrorKind::Internal);
        assert!(kind.is_retryable());
    }

    #[test]
    fn access_and_client_errors_are_not_retryable() {
        for kind in [
            ErrorKind::Unauthorized,
            ErrorKind::NotFound,
            ErrorKind::Conflict,
            ErrorKind::Invalid,
        ] {
            assert!(!kind.is_retryable(), "{kind:?} must not be retried");
        }
        assert!(ErrorKind::Unavailable.is_retryable());
    }

    #[test]
    fn error_body_carries_message() {
        let resp = ApiError::validation("Event name is required").error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_configured_is_service_unavailable() {
        let err = ApiError::NotConfigured("Storage");
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.to_string(), "Storage is not configured");
    }
}
