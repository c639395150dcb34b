use actix_web::{HttpResponse, web};
use sea_orm::{DatabaseConnection, DbErr};
use tracing::info;
use uuid::Uuid;

use crate::auth::authorization::{Caller, require, require_admin};
use crate::auth::middleware::AuthenticatedUser;
use crate::config::AppConfig;
use crate::db::Visibility;
use crate::db::{contracts as contract_db, events as event_db};
use crate::error::ApiError;
use crate::handlers::{read, write_failed};
use crate::models::contracts::{self, UpdateContractContent};

async fn load_contract(
    db: &DatabaseConnection,
    config: &AppConfig,
    id: Uuid,
) -> Result<contracts::Model, ApiError> {
    read(config, "get contract", || contract_db::get_contract_by_id(db, id))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Contract {id} not found")))
}

/// GET /api/contracts — admin: all; producer: contracts on their events; DJ: their own.
pub async fn list_contracts(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let caller = Caller::resolve(db.get_ref(), user.0).await?;

    let contracts = match caller.visibility() {
        Visibility::All => {
            read(&config, "list contracts", || {
                contract_db::list_contracts(db.get_ref(), None, None)
            })
            .await?
        }
        Visibility::Dj(dj_id) => {
            read(&config, "list contracts", || {
                contract_db::list_contracts(db.get_ref(), None, Some(dj_id))
            })
            .await?
        }
        producer @ Visibility::Producer { .. } => {
            let event_ids = read(&config, "list visible events", || {
                event_db::visible_event_ids(db.get_ref(), &producer)
            })
            .await?;
            read(&config, "list contracts", || {
                contract_db::list_contracts(db.get_ref(), event_ids.clone(), None)
            })
            .await?
        }
    };

    Ok(HttpResponse::Ok().json(contracts))
}

/// GET /api/contracts/{id} — parties to the contract and admins.
pub async fn get_contract(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let caller = Caller::resolve(db.get_ref(), user.0).await?;
    let contract = load_contract(db.get_ref(), &config, path.into_inner()).await?;
    require(
        caller.is_contract_party(&contract),
        "You are not a party to this contract",
    )?;

    Ok(HttpResponse::Ok().json(contract))
}

/// PUT /api/contracts/{id}/content — edit the text of an unsigned contract.
pub async fn update_content(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateContractContent>,
) -> Result<HttpResponse, ApiError> {
    let caller = Caller::resolve(db.get_ref(), user.0).await?;
    let contract = load_contract(db.get_ref(), &config, path.into_inner()).await?;
    require(
        caller.can_edit_contract(&contract),
        "Only an admin or the contract's producer can edit it",
    )?;
    if contract.signed {
        return Err(ApiError::conflict("Signed contracts cannot be edited"));
    }

    let content = body.into_inner().contract_content;
    if content.trim().is_empty() {
        return Err(ApiError::validation("Contract content is required"));
    }

    let updated = contract_db::update_content(db.get_ref(), contract, content)
        .await
        .map_err(write_failed("update contract content"))?;

    Ok(HttpResponse::Ok().json(updated))
}

/// POST /api/contracts/{id}/sign — only the DJ named on the contract; once.
pub async fn sign_contract(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let contract = load_contract(db.get_ref(), &config, id).await?;
    require(
        contract.dj_id == user.0.id,
        "Only the contracted DJ can sign this contract",
    )?;
    if contract.signed {
        return Err(ApiError::conflict("Contract is already signed"));
    }

    let signed = match contract_db::sign(db.get_ref(), id).await {
        Ok(signed) => signed,
        Err(DbErr::RecordNotUpdated) => {
            return Err(ApiError::conflict("Contract is already signed"));
        }
        Err(e) => return Err(write_failed("sign contract")(e)),
    };
    info!("Contract {id} signed by DJ {}", user.0.id);

    Ok(HttpResponse::Ok().json(signed))
}

/// DELETE /api/contracts/{id} — admin only.
pub async fn delete_contract(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;
    let id = path.into_inner();

    let result = contract_db::delete_contract(db.get_ref(), id)
        .await
        .map_err(write_failed("delete contract"))?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found(format!("Contract {id} not found")));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Contract {id} deleted"),
    })))
}
