use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::try_join;
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};
use tracing::info;
use uuid::Uuid;

use crate::auth::authorization::{Caller, require};
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{QueryCache, keys};
use crate::config::AppConfig;
use crate::db::payment_receipts::{self as receipt_db, NewReceipt};
use crate::db::{
    event_djs as event_dj_db, events as event_db, payments as payment_db,
    producers as producer_db, profiles as profile_db,
};
use crate::error::ApiError;
use crate::handlers::{content_type, now_millis, read, require_body, write_failed};
use crate::models::ListQuery;
use crate::models::events::{self, EventDjView, EventInput, EventView};
use crate::models::payment_receipts::ReceiptUploadQuery;
use crate::models::profiles::{DjSummary, Roles};
use crate::services::events as event_service;
use crate::supabase::SupabaseClient;
use crate::supabase::storage::{MEDIA_BUCKET, receipt_object_path};

/// Merge producers, DJ assignments and payments into event views.
///
/// The three lookups run concurrently; DJ profiles are fetched once the
/// assignments are known.
async fn build_views(
    db: &DatabaseConnection,
    events: Vec<events::Model>,
) -> Result<Vec<EventView>, DbErr> {
    let event_ids: Vec<Uuid> = events.iter().map(|e| e.id).collect();
    let producer_ids: Vec<Uuid> = events.iter().filter_map(|e| e.producer_id).collect();

    let (producers, mut assignments, payments) = try_join!(
        producer_db::get_producers_by_ids(db, &producer_ids),
        event_dj_db::list_for_events(db, &event_ids),
        payment_db::list_payments(db, Some(event_ids.clone())),
    )?;

    let dj_ids: Vec<Uuid> = assignments
        .values()
        .flatten()
        .map(|a| a.dj_id)
        .collect();
    let dj_profiles = profile_db::get_profiles_by_ids(db, &dj_ids).await?;

    let mut payments: HashMap<Uuid, _> = payments.into_iter().map(|p| (p.event_id, p)).collect();

    Ok(events
        .into_iter()
        .map(|event| {
            let producer = event
                .producer_id
                .and_then(|id| producers.get(&id).cloned());
            let djs = assignments
                .remove(&event.id)
                .unwrap_or_default()
                .into_iter()
                .map(|assignment| EventDjView {
                    dj: dj_profiles.get(&assignment.dj_id).map(DjSummary::from),
                    assignment,
                })
                .collect();
            EventView {
                producer,
                djs,
                payment: payments.remove(&event.id),
                event,
            }
        })
        .collect())
}

async fn load_event(
    db: &DatabaseConnection,
    config: &AppConfig,
    id: Uuid,
) -> Result<events::Model, ApiError> {
    read(config, "get event", || event_db::get_event_by_id(db, id))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Event {id} not found")))
}

/// Managers always; DJs only when assigned and the event is visible to them.
async fn can_view(
    db: &DatabaseConnection,
    caller: &Caller,
    event: &events::Model,
) -> Result<bool, DbErr> {
    if caller.can_manage_event(event) {
        return Ok(true);
    }
    if caller.role() != Roles::Dj || !event.visible_to_dj {
        return Ok(false);
    }
    Ok(event_dj_db::find_assignment(db, event.id, caller.id())
        .await?
        .is_some())
}

/// GET /api/events — events the caller may see, most recent first.
pub async fn list_events(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let caller = Caller::resolve(db.get_ref(), user.0).await?;
    let visibility = caller.visibility();
    let limit = query.limit();

    let events = read(&config, "list events", || {
        event_db::list_events(db.get_ref(), &visibility, limit)
    })
    .await?;
    let views = read(&config, "load event details", || {
        build_views(db.get_ref(), events.clone())
    })
    .await?;

    Ok(HttpResponse::Ok().json(views))
}

/// GET /api/events/{id}
pub async fn get_event(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let caller = Caller::resolve(db.get_ref(), user.0).await?;
    let event = load_event(db.get_ref(), &config, id).await?;
    require(
        can_view(db.get_ref(), &caller, &event).await?,
        "You do not have access to this event",
    )?;

    let view = read(&config, "load event details", || {
        build_views(db.get_ref(), vec![event.clone()])
    })
    .await?
    .pop()
    .ok_or_else(|| ApiError::not_found(format!("Event {id} not found")))?;

    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/events — create the event with its DJs, payment and contracts.
pub async fn create_event(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    cache: web::Data<QueryCache>,
    body: web::Json<EventInput>,
) -> Result<HttpResponse, ApiError> {
    let caller = Caller::resolve(db.get_ref(), user.0).await?;

    let event = event_service::create_event(
        db.get_ref(),
        &caller,
        body.into_inner(),
        config.default_commission_rate,
    )
    .await?;
    cache.invalidate(&[keys::ALL_FINANCE]).await;

    Ok(HttpResponse::Created().json(event))
}

/// PUT /api/events/{id}
pub async fn update_event(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    cache: web::Data<QueryCache>,
    path: web::Path<Uuid>,
    body: web::Json<EventInput>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let caller = Caller::resolve(db.get_ref(), user.0).await?;
    let existing = load_event(db.get_ref(), &config, id).await?;
    require(
        caller.can_manage_event(&existing),
        "You can only edit your own events",
    )?;

    let event = event_service::update_event(
        db.get_ref(),
        &caller,
        existing,
        body.into_inner(),
        config.default_commission_rate,
    )
    .await?;
    cache.invalidate(&[keys::ALL_FINANCE]).await;

    Ok(HttpResponse::Ok().json(event))
}

/// DELETE /api/events/{id} — admin or the event's creator.
pub async fn delete_event(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    cache: web::Data<QueryCache>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let event = load_event(db.get_ref(), &config, id).await?;
    require(
        user.0.role == Roles::Admin || event.created_by == Some(user.0.id),
        "Only an admin or the event's creator can delete it",
    )?;

    if !event_db::delete_event(db.get_ref(), id)
        .await
        .map_err(write_failed("delete event"))?
    {
        return Err(ApiError::not_found(format!("Event {id} not found")));
    }
    cache.invalidate(&[keys::ALL_FINANCE]).await;
    info!("Event {id} deleted by {}", user.0.id);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Event {id} deleted"),
    })))
}

/// GET /api/events/{id}/receipts
pub async fn list_receipts(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let caller = Caller::resolve(db.get_ref(), user.0).await?;
    let event = load_event(db.get_ref(), &config, id).await?;
    require(
        can_view(db.get_ref(), &caller, &event).await?,
        "You do not have access to this event",
    )?;

    let receipts = read(&config, "list receipts", || {
        receipt_db::list_for_event(db.get_ref(), id)
    })
    .await?;

    Ok(HttpResponse::Ok().json(receipts))
}

/// POST /api/events/{event_id}/djs/{dj_id}/receipt?file_name=...
///
/// Stores the transfer receipt for one DJ and marks that DJ as paid.
pub async fn upload_dj_receipt(
    req: HttpRequest,
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    supabase: web::Data<SupabaseClient>,
    path: web::Path<(Uuid, Uuid)>,
    query: web::Query<ReceiptUploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let (event_id, dj_id) = path.into_inner();
    let caller = Caller::resolve(db.get_ref(), user.0).await?;
    let event = load_event(db.get_ref(), &config, event_id).await?;
    require(
        caller.can_manage_event(&event),
        "Only an admin or the event's producer can upload receipts",
    )?;
    require_body(&body)?;

    let assignment = read(&config, "get assignment", || {
        event_dj_db::find_assignment(db.get_ref(), event_id, dj_id)
    })
    .await?
    .ok_or_else(|| ApiError::not_found(format!("DJ {dj_id} is not booked on event {event_id}")))?;

    let query = query.into_inner();
    let object = receipt_object_path(&event_id, Some(&dj_id), now_millis(), &query.file_name);
    let url = supabase
        .upload(MEDIA_BUCKET, &object, body.to_vec(), &content_type(&req))
        .await?;

    let txn = db.begin().await?;
    let receipt = receipt_db::insert_receipt(
        &txn,
        NewReceipt {
            event_id,
            dj_id,
            producer_id: event.producer_id,
            receipt_url: url.clone(),
            amount: query.amount.or(assignment.fee),
            notes: query.notes,
            uploaded_by: caller.id(),
        },
    )
    .await
    .map_err(write_failed("insert receipt"))?;
    event_dj_db::mark_paid(&txn, assignment, url)
        .await
        .map_err(write_failed("mark DJ paid"))?;
    txn.commit().await?;

    info!("Receipt stored for DJ {dj_id} on event {event_id}");
    Ok(HttpResponse::Created().json(receipt))
}
