use actix_web::{HttpRequest, HttpResponse, web};
use sea_orm::DatabaseConnection;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::authorization::{Caller, require, require_admin};
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{QueryCache, keys};
use crate::config::AppConfig;
use crate::db::profiles as profile_db;
use crate::error::ApiError;
use crate::handlers::{content_type, now_millis, read, require_body, write_failed};
use crate::models::FileUploadQuery;
use crate::models::profiles::{CreateDj, DjFields};
use crate::supabase::storage::{DJ_AVATARS_BUCKET, avatar_object_path};
use crate::supabase::{SupabaseClient, SupabaseError};

/// GET /api/djs — every DJ, ordered by artist name.
pub async fn list_djs(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    cache: web::Data<QueryCache>,
) -> Result<HttpResponse, ApiError> {
    let djs = cache
        .get_or_load(keys::DJ_LIST, config.cache.roster_ttl, || {
            read(&config, "list DJs", || profile_db::list_djs(db.get_ref()))
        })
        .await?;

    Ok(HttpResponse::Ok().json(djs))
}

/// GET /api/djs/{id}
pub async fn get_dj(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let dj = read(&config, "get DJ", || profile_db::get_dj(db.get_ref(), id))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("DJ {id} not found")))?;

    Ok(HttpResponse::Ok().json(dj))
}

/// POST /api/djs — admin registers a DJ profile.
pub async fn create_dj(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<QueryCache>,
    body: web::Json<CreateDj>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;

    let mut input = body.into_inner();
    input.email = input.email.trim().to_string();
    if input.email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }

    let dj = profile_db::insert_dj(db.get_ref(), input)
        .await
        .map_err(write_failed("create DJ"))?;
    cache.invalidate(&[keys::ALL_DJS]).await;
    info!("DJ {} created by {}", dj.id, user.0.id);

    Ok(HttpResponse::Created().json(dj))
}

/// PUT /api/djs/{id} — admin, or the DJ editing their own profile.
pub async fn update_dj(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<QueryCache>,
    path: web::Path<Uuid>,
    body: web::Json<DjFields>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let caller = Caller::resolve(db.get_ref(), user.0).await?;
    require(caller.can_act_on_profile(id), "You can only edit your own profile")?;

    let dj = profile_db::update_dj(db.get_ref(), id, body.into_inner())
        .await
        .map_err(write_failed("update DJ"))?;
    cache.invalidate(&[keys::ALL_DJS]).await;

    Ok(HttpResponse::Ok().json(dj))
}

/// DELETE /api/djs/{id} — admin only. Removes the auth account too when the admin API is available.
pub async fn delete_dj(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    cache: web::Data<QueryCache>,
    supabase: web::Data<SupabaseClient>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;
    let id = path.into_inner();

    read(&config, "get DJ", || profile_db::get_dj(db.get_ref(), id))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("DJ {id} not found")))?;

    if supabase.has_service_role() {
        match supabase.delete_auth_user(id).await {
            Ok(()) => {}
            Err(SupabaseError::Api { status: 404, .. }) => {
                warn!("DJ {id} had no auth account, deleting profile only");
            }
            Err(e) => return Err(e.into()),
        }
    }

    profile_db::delete_profile(db.get_ref(), id)
        .await
        .map_err(write_failed("delete DJ"))?;
    cache.invalidate(&[keys::ALL_DJS, keys::ALL_FINANCE]).await;
    info!("DJ {id} deleted by {}", user.0.id);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("DJ {id} deleted"),
    })))
}

/// POST /api/djs/{id}/avatar?file_name=... — raw image body.
pub async fn upload_avatar(
    req: HttpRequest,
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<QueryCache>,
    supabase: web::Data<SupabaseClient>,
    path: web::Path<Uuid>,
    query: web::Query<FileUploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let caller = Caller::resolve(db.get_ref(), user.0).await?;
    require(caller.can_act_on_profile(id), "You can only change your own avatar")?;
    require_body(&body)?;

    let object = avatar_object_path("dj", &id, now_millis(), &query.file_name);
    let url = supabase
        .upload(DJ_AVATARS_BUCKET, &object, body.to_vec(), &content_type(&req))
        .await?;

    let dj = profile_db::set_avatar_url(db.get_ref(), id, url)
        .await
        .map_err(write_failed("set DJ avatar"))?;
    cache.invalidate(&[keys::ALL_DJS]).await;

    Ok(HttpResponse::Ok().json(dj))
}
