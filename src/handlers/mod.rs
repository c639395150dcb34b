pub mod admin;
pub mod analytics;
pub mod auth;
pub mod contract_templates;
pub mod contracts;
pub mod djs;
pub mod events;
pub mod finance;
pub mod health;
pub mod media;
pub mod payments;
pub mod producers;

use std::future::Future;

use actix_web::{HttpRequest, web};
use sea_orm::DbErr;
use tracing::error;

use crate::config::AppConfig;
use crate::db::retry::with_read_retry;
use crate::error::ApiError;

/// Largest upload accepted for avatars, media, proofs and receipts.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health));

    // ── Auth ──
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(auth::login))
            .route("/me", web::get().to(auth::me))
            .route("/password-reset", web::post().to(auth::password_reset)),
    );

    // ── Rosters ──
    cfg.service(
        web::scope("/djs")
            .route("", web::get().to(djs::list_djs))
            .route("", web::post().to(djs::create_dj))
            .route("/{id}", web::get().to(djs::get_dj))
            .route("/{id}", web::put().to(djs::update_dj))
            .route("/{id}", web::delete().to(djs::delete_dj))
            .route("/{id}/avatar", web::post().to(djs::upload_avatar))
            .route("/{id}/media", web::get().to(media::list_media))
            .route("/{id}/media", web::post().to(media::upload_media)),
    );
    cfg.route("/media/{id}", web::delete().to(media::delete_media));
    cfg.service(
        web::scope("/producers")
            .route("", web::get().to(producers::list_producers))
            .route("", web::post().to(producers::create_producer))
            .route("/{id}", web::get().to(producers::get_producer))
            .route("/{id}", web::put().to(producers::update_producer))
            .route("/{id}", web::delete().to(producers::delete_producer))
            .route("/{id}/avatar", web::post().to(producers::upload_avatar)),
    );
    cfg.route("/relations", web::get().to(analytics::list_relations));

    // ── Bookings ──
    cfg.service(
        web::scope("/events")
            .route("", web::get().to(events::list_events))
            .route("", web::post().to(events::create_event))
            .route("/{id}", web::get().to(events::get_event))
            .route("/{id}", web::put().to(events::update_event))
            .route("/{id}", web::delete().to(events::delete_event))
            .route("/{id}/receipts", web::get().to(events::list_receipts))
            .route(
                "/{event_id}/djs/{dj_id}/receipt",
                web::post().to(events::upload_dj_receipt),
            ),
    );
    cfg.service(
        web::scope("/contracts")
            .route("", web::get().to(contracts::list_contracts))
            .route("/{id}", web::get().to(contracts::get_contract))
            .route("/{id}", web::delete().to(contracts::delete_contract))
            .route("/{id}/content", web::put().to(contracts::update_content))
            .route("/{id}/sign", web::post().to(contracts::sign_contract)),
    );
    cfg.service(
        web::scope("/contract-templates")
            .route("", web::get().to(contract_templates::list_templates))
            .route("", web::post().to(contract_templates::create_template))
            .route("/{id}", web::put().to(contract_templates::update_template)),
    );

    // ── Money ──
    cfg.service(
        web::scope("/payments")
            .route("", web::get().to(payments::list_payments))
            .route("/{id}", web::delete().to(payments::delete_payment))
            .route("/{id}/status", web::put().to(payments::update_status))
            .route("/{id}/proof", web::post().to(payments::upload_proof))
            .route("/{id}/confirm", web::post().to(payments::confirm_payment)),
    );
    cfg.service(
        web::scope("/finance")
            .route("/summary", web::get().to(finance::summary))
            .route("/events-summary", web::get().to(finance::events_summary))
            .route("/aggregate", web::post().to(finance::aggregate)),
    );

    // ── Admin ──
    cfg.route("/admin/delete-user", web::post().to(admin::delete_user));
    cfg.route("/analytics/dashboard", web::get().to(analytics::dashboard));
}

/// Malformed JSON bodies answer with the usual `{"error": ...}` shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::validation(format!("Invalid request body: {err}")).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::validation(format!("Invalid query string: {err}")).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        ApiError::validation(format!("Invalid path: {err}")).into()
    })
}

/// Run a read query under the configured retry policy, logging the final failure.
pub(crate) async fn read<T, F, Fut>(config: &AppConfig, label: &str, op: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    with_read_retry(&config.read_retry, label, op)
        .await
        .map_err(|e| {
            error!("{label} failed: {e}");
            ApiError::from(e)
        })
}

/// Log a failed write and turn it into an API error.
pub(crate) fn write_failed(label: &str) -> impl FnOnce(DbErr) -> ApiError + '_ {
    move |e| {
        error!("{label} failed: {e}");
        ApiError::from(e)
    }
}

/// Content type of an uploaded body, defaulting to a generic binary type.
pub(crate) fn content_type(req: &HttpRequest) -> String {
    req.headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("application/octet-stream")
        .to_string()
}

pub(crate) fn require_body(body: &web::Bytes) -> Result<(), ApiError> {
    if body.is_empty() {
        return Err(ApiError::validation("Upload body is empty"));
    }
    Ok(())
}

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
