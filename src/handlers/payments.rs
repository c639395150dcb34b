use actix_web::{HttpRequest, HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::{Caller, require, require_admin};
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{QueryCache, keys};
use crate::config::AppConfig;
use crate::db::{events as event_db, payments as payment_db};
use crate::error::ApiError;
use crate::handlers::{content_type, now_millis, read, require_body, write_failed};
use crate::models::FileUploadQuery;
use crate::models::payments::{ConfirmPayment, PaymentStatus, PaymentView, UpdatePaymentStatus};
use crate::services::payments as payment_service;
use crate::supabase::SupabaseClient;
use crate::supabase::storage::{MEDIA_BUCKET, receipt_object_path};

/// GET /api/payments — payments on the events the caller can see, each with its event.
pub async fn list_payments(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let caller = Caller::resolve(db.get_ref(), user.0).await?;
    let visibility = caller.visibility();

    let event_ids = read(&config, "list visible events", || {
        event_db::visible_event_ids(db.get_ref(), &visibility)
    })
    .await?;
    let payments = read(&config, "list payments", || {
        payment_db::list_payments(db.get_ref(), event_ids.clone())
    })
    .await?;

    let ids: Vec<Uuid> = payments.iter().map(|p| p.event_id).collect();
    let mut events = read(&config, "load payment events", || {
        event_db::get_events_by_ids(db.get_ref(), &ids)
    })
    .await?;

    let views: Vec<PaymentView> = payments
        .into_iter()
        .map(|payment| PaymentView {
            event: events.remove(&payment.event_id),
            payment,
        })
        .collect();

    Ok(HttpResponse::Ok().json(views))
}

/// PUT /api/payments/{id}/status — admin moves the payment along its lifecycle.
pub async fn update_status(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<QueryCache>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePaymentStatus>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;

    let payment =
        payment_service::change_status(db.get_ref(), path.into_inner(), body.status).await?;
    cache.invalidate(&[keys::ALL_FINANCE]).await;

    Ok(HttpResponse::Ok().json(payment))
}

/// POST /api/payments/{id}/proof?file_name=... — the event's producer sends proof of transfer.
pub async fn upload_proof(
    req: HttpRequest,
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    cache: web::Data<QueryCache>,
    supabase: web::Data<SupabaseClient>,
    path: web::Path<Uuid>,
    query: web::Query<FileUploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let caller = Caller::resolve(db.get_ref(), user.0).await?;

    let payment = read(&config, "get payment", || {
        payment_db::get_payment_by_id(db.get_ref(), id)
    })
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Payment {id} not found")))?;
    let event = read(&config, "get event", || {
        event_db::get_event_by_id(db.get_ref(), payment.event_id)
    })
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Event {} not found", payment.event_id)))?;
    require(
        caller.can_manage_event(&event),
        "Only an admin or the event's producer can send payment proof",
    )?;
    payment_service::check_transition(payment.status, PaymentStatus::PagamentoEnviado)?;
    require_body(&body)?;

    let object = receipt_object_path(&event.id, None, now_millis(), &query.file_name);
    let url = supabase
        .upload(MEDIA_BUCKET, &object, body.to_vec(), &content_type(&req))
        .await?;

    let payment = payment_service::record_proof(db.get_ref(), payment, url).await?;
    cache.invalidate(&[keys::ALL_FINANCE]).await;

    Ok(HttpResponse::Ok().json(payment))
}

/// POST /api/payments/{id}/confirm — admin confirms the money arrived.
pub async fn confirm_payment(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<QueryCache>,
    path: web::Path<Uuid>,
    body: web::Json<ConfirmPayment>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;

    let payment =
        payment_service::confirm(db.get_ref(), path.into_inner(), body.into_inner()).await?;
    cache.invalidate(&[keys::ALL_FINANCE]).await;

    Ok(HttpResponse::Ok().json(payment))
}

/// DELETE /api/payments/{id} — admin only.
pub async fn delete_payment(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<QueryCache>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;
    let id = path.into_inner();

    let result = payment_db::delete_payment(db.get_ref(), id)
        .await
        .map_err(write_failed("delete payment"))?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found(format!("Payment {id} not found")));
    }
    cache.invalidate(&[keys::ALL_FINANCE]).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Payment {id} deleted"),
    })))
}
