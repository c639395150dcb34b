use std::collections::HashSet;

use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::contracts;

/// A contract to be created for one DJ on one event.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContract {
    pub event_id: Uuid,
    pub dj_id: Uuid,
    pub producer_id: Option<Uuid>,
    pub cache_value: f64,
    pub contract_content: String,
}

/// DJs that already have a contract for the event.
pub async fn dj_ids_with_contract<C: ConnectionTrait>(
    conn: &C,
    event_id: Uuid,
) -> Result<HashSet<Uuid>, DbErr> {
    Ok(contracts::Entity::find()
        .select_only()
        .column(contracts::Column::DjId)
        .filter(contracts::Column::EventId.eq(event_id))
        .into_tuple::<Uuid>()
        .all(conn)
        .await?
        .into_iter()
        .collect())
}

pub async fn insert_contracts<C: ConnectionTrait>(
    conn: &C,
    new_contracts: Vec<NewContract>,
) -> Result<u64, DbErr> {
    if new_contracts.is_empty() {
        return Ok(0);
    }

    let now = chrono::Utc::now();
    let rows = new_contracts.into_iter().map(|c| contracts::ActiveModel {
        id: Set(Uuid::new_v4()),
        event_id: Set(c.event_id),
        dj_id: Set(c.dj_id),
        producer_id: Set(c.producer_id),
        cache_value: Set(c.cache_value),
        contract_content: Set(c.contract_content),
        signed: Set(false),
        signed_at: Set(None),
        created_at: Set(now),
        updated_at: Set(None),
    });

    contracts::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await
}

/// Contracts visible to the caller. `event_ids` of `None` means all events.
pub async fn list_contracts(
    db: &DatabaseConnection,
    event_ids: Option<Vec<Uuid>>,
    dj_id: Option<Uuid>,
) -> Result<Vec<contracts::Model>, DbErr> {
    let mut query = contracts::Entity::find().order_by_desc(contracts::Column::CreatedAt);

    if let Some(ids) = event_ids {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        query = query.filter(contracts::Column::EventId.is_in(ids));
    }
    if let Some(dj_id) = dj_id {
        query = query.filter(contracts::Column::DjId.eq(dj_id));
    }

    query.all(db).await
}

pub async fn get_contract_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<contracts::Model>, DbErr> {
    contracts::Entity::find_by_id(id).one(db).await
}

pub async fn update_content(
    db: &DatabaseConnection,
    contract: contracts::Model,
    content: String,
) -> Result<contracts::Model, DbErr> {
    let mut active: contracts::ActiveModel = contract.into();
    active.contract_content = Set(content);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Sign a contract now. The update only matches unsigned rows, so a
/// concurrent second signature affects nothing and is reported as not updated.
pub async fn sign(db: &DatabaseConnection, id: Uuid) -> Result<contracts::Model, DbErr> {
    let now = chrono::Utc::now();

    let result = contracts::Entity::update_many()
        .col_expr(contracts::Column::Signed, Expr::value(true))
        .col_expr(contracts::Column::SignedAt, Expr::value(now))
        .col_expr(contracts::Column::UpdatedAt, Expr::value(now))
        .filter(contracts::Column::Id.eq(id))
        .filter(contracts::Column::Signed.eq(false))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(DbErr::RecordNotUpdated);
    }

    contracts::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Contract not found".to_string()))
}

pub async fn delete_contract(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    contracts::Entity::delete_by_id(id).exec(db).await
}

pub async fn count_contracts(db: &DatabaseConnection) -> Result<u64, DbErr> {
    contracts::Entity::find().count(db).await
}

pub async fn count_unsigned(db: &DatabaseConnection) -> Result<u64, DbErr> {
    contracts::Entity::find()
        .filter(contracts::Column::Signed.eq(false))
        .count(db)
        .await
}
