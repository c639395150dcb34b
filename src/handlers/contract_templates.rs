use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::require_admin;
use crate::auth::middleware::AuthenticatedUser;
use crate::config::AppConfig;
use crate::db::contract_templates as template_db;
use crate::error::ApiError;
use crate::handlers::{read, write_failed};
use crate::models::contract_templates::{CreateTemplate, UpdateTemplate};

/// GET /api/contract-templates
pub async fn list_templates(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;
    let templates = read(&config, "list contract templates", || {
        template_db::list_templates(db.get_ref())
    })
    .await?;

    Ok(HttpResponse::Ok().json(templates))
}

/// POST /api/contract-templates
pub async fn create_template(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateTemplate>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;
    let input = body.into_inner();
    if input.name.trim().is_empty() || input.content.trim().is_empty() {
        return Err(ApiError::validation("Template name and content are required"));
    }

    let template = template_db::insert_template(db.get_ref(), input)
        .await
        .map_err(write_failed("create contract template"))?;

    Ok(HttpResponse::Created().json(template))
}

/// PUT /api/contract-templates/{id}
pub async fn update_template(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTemplate>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;

    let template = template_db::update_template(db.get_ref(), path.into_inner(), body.into_inner())
        .await
        .map_err(write_failed("update contract template"))?;

    Ok(HttpResponse::Ok().json(template))
}
