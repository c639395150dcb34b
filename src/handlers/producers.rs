use actix_web::{HttpRequest, HttpResponse, web};
use sea_orm::DatabaseConnection;
use tracing::info;
use uuid::Uuid;

use crate::auth::authorization::{Caller, require, require_admin};
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{QueryCache, keys};
use crate::config::AppConfig;
use crate::db::producers as producer_db;
use crate::error::ApiError;
use crate::handlers::{content_type, now_millis, read, require_body, write_failed};
use crate::models::FileUploadQuery;
use crate::models::producers::{CreateProducer, UpdateProducer};
use crate::supabase::SupabaseClient;
use crate::supabase::storage::{PRODUCER_AVATARS_BUCKET, avatar_object_path};

/// Admins and the producer owning the record.
fn can_edit(caller: &Caller, producer_id: Uuid) -> bool {
    caller.is_admin() || caller.producer_id == Some(producer_id)
}

/// GET /api/producers — producers with their profile data, sorted by company name.
pub async fn list_producers(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let producers = read(&config, "list producers", || {
        producer_db::list_producers(db.get_ref())
    })
    .await?;

    Ok(HttpResponse::Ok().json(producers))
}

/// GET /api/producers/{id}
pub async fn get_producer(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let producer = read(&config, "get producer", || {
        producer_db::get_producer(db.get_ref(), id)
    })
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Producer {id} not found")))?;

    Ok(HttpResponse::Ok().json(producer))
}

/// POST /api/producers — admin creates the profile and the company record together.
pub async fn create_producer(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateProducer>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;

    let mut input = body.into_inner();
    input.email = input.email.trim().to_string();
    if input.email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }

    let producer = producer_db::create_producer(db.get_ref(), input)
        .await
        .map_err(write_failed("create producer"))?;
    info!("Producer {} created by {}", producer.producer.id, user.0.id);

    Ok(HttpResponse::Created().json(producer))
}

/// PUT /api/producers/{id} — admin or the producer themselves.
pub async fn update_producer(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProducer>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let caller = Caller::resolve(db.get_ref(), user.0).await?;
    require(can_edit(&caller, id), "You can only edit your own producer record")?;

    let producer = producer_db::update_producer(db.get_ref(), id, body.into_inner())
        .await
        .map_err(write_failed("update producer"))?;

    Ok(HttpResponse::Ok().json(producer))
}

/// DELETE /api/producers/{id} — admin only; the producer's profile goes with it.
pub async fn delete_producer(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<QueryCache>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;
    let id = path.into_inner();

    match producer_db::delete_producer(db.get_ref(), id)
        .await
        .map_err(write_failed("delete producer"))?
    {
        Some(profile_id) => {
            cache.invalidate(&[keys::ALL_FINANCE]).await;
            info!("Producer {id} (profile {profile_id}) deleted by {}", user.0.id);
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "message": format!("Producer {id} deleted"),
            })))
        }
        None => Err(ApiError::not_found(format!("Producer {id} not found"))),
    }
}

/// POST /api/producers/{id}/avatar?file_name=... — raw image body.
pub async fn upload_avatar(
    req: HttpRequest,
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    supabase: web::Data<SupabaseClient>,
    path: web::Path<Uuid>,
    query: web::Query<FileUploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let caller = Caller::resolve(db.get_ref(), user.0).await?;
    require(can_edit(&caller, id), "You can only change your own avatar")?;
    require_body(&body)?;

    let object = avatar_object_path("producer", &id, now_millis(), &query.file_name);
    let url = supabase
        .upload(PRODUCER_AVATARS_BUCKET, &object, body.to_vec(), &content_type(&req))
        .await?;

    let producer = producer_db::set_avatar_url(db.get_ref(), id, url)
        .await
        .map_err(write_failed("set producer avatar"))?;

    Ok(HttpResponse::Ok().json(producer))
}
