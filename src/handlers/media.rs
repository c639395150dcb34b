use actix_web::{HttpRequest, HttpResponse, web};
use sea_orm::DatabaseConnection;
use tracing::info;
use uuid::Uuid;

use crate::auth::authorization::{Caller, require};
use crate::auth::middleware::AuthenticatedUser;
use crate::config::AppConfig;
use crate::db::media as media_db;
use crate::error::ApiError;
use crate::handlers::{content_type, now_millis, read, require_body, write_failed};
use crate::models::media_files::MediaUploadQuery;
use crate::supabase::SupabaseClient;
use crate::supabase::storage::{DJ_MEDIA_BUCKET, file_extension};

/// GET /api/djs/{id}/media
pub async fn list_media(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let dj_id = path.into_inner();
    let media = read(&config, "list DJ media", || {
        media_db::list_for_dj(db.get_ref(), dj_id)
    })
    .await?;

    Ok(HttpResponse::Ok().json(media))
}

/// POST /api/djs/{id}/media?file_name=...&category=... — raw file body.
pub async fn upload_media(
    req: HttpRequest,
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    supabase: web::Data<SupabaseClient>,
    path: web::Path<Uuid>,
    query: web::Query<MediaUploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let dj_id = path.into_inner();
    let caller = Caller::resolve(db.get_ref(), user.0).await?;
    require(
        caller.can_act_on_profile(dj_id),
        "You can only upload media to your own profile",
    )?;
    require_body(&body)?;

    let query = query.into_inner();
    let category = query.category();
    let object = format!(
        "{dj_id}/{category}/{}.{}",
        now_millis(),
        file_extension(&query.file_name)
    );
    let url = supabase
        .upload(DJ_MEDIA_BUCKET, &object, body.to_vec(), &content_type(&req))
        .await?;

    let media = media_db::insert_media(
        db.get_ref(),
        dj_id,
        query.file_name,
        url,
        category,
        body.len() as i64,
    )
    .await
    .map_err(write_failed("insert media"))?;

    Ok(HttpResponse::Created().json(media))
}

/// DELETE /api/media/{id} — admin or the DJ who owns the file.
pub async fn delete_media(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let caller = Caller::resolve(db.get_ref(), user.0).await?;

    let media = read(&config, "get media", || {
        media_db::get_media_by_id(db.get_ref(), id)
    })
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Media {id} not found")))?;
    require(
        caller.can_act_on_profile(media.dj_id),
        "You can only delete your own media",
    )?;

    media_db::delete_media(db.get_ref(), id)
        .await
        .map_err(write_failed("delete media"))?;
    info!("Media {id} deleted by {}", caller.id());

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Media {id} deleted"),
    })))
}
