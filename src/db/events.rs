use std::collections::HashMap;

use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::db::Visibility;
use crate::models::event_djs;
use crate::models::events::{self, EventFields};
use crate::models::payments::PaymentStatus;
use crate::models::profiles::Roles;

pub async fn insert_event<C: ConnectionTrait>(
    conn: &C,
    fields: EventFields,
    created_by: Uuid,
    created_by_role: Roles,
) -> Result<events::Model, DbErr> {
    let new_event = events::ActiveModel {
        id: Set(Uuid::new_v4()),
        event_name: Set(fields.event_name),
        event_date: Set(fields.event_date),
        event_time: Set(fields.event_time),
        location: Set(fields.location),
        city: Set(fields.city),
        venue: Set(fields.venue),
        description: Set(fields.description),
        cache_value: Set(fields.cache_value),
        commission_rate: Set(fields.commission_rate),
        commission_amount: Set(fields.commission_amount),
        payment_status: Set(PaymentStatus::Pending),
        status: Set(fields.status.unwrap_or_default()),
        producer_id: Set(fields.producer_id),
        created_by: Set(Some(created_by)),
        created_by_role: Set(created_by_role),
        shared_with_admin: Set(fields.shared_with_admin.unwrap_or(true)),
        visible_to_dj: Set(fields.visible_to_dj.unwrap_or(true)),
        payment_proof_url: Set(None),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_event.insert(conn).await
}

/// Overwrite an event's editable columns. Flags and status are only changed when given.
pub async fn update_event<C: ConnectionTrait>(
    conn: &C,
    existing: events::Model,
    fields: EventFields,
) -> Result<events::Model, DbErr> {
    let mut active: events::ActiveModel = existing.into();

    active.event_name = Set(fields.event_name);
    active.event_date = Set(fields.event_date);
    active.event_time = Set(fields.event_time);
    active.location = Set(fields.location);
    active.city = Set(fields.city);
    active.venue = Set(fields.venue);
    active.description = Set(fields.description);
    active.cache_value = Set(fields.cache_value);
    active.commission_rate = Set(fields.commission_rate);
    active.commission_amount = Set(fields.commission_amount);
    active.producer_id = Set(fields.producer_id);
    if let Some(status) = fields.status {
        active.status = Set(status);
    }
    if let Some(shared) = fields.shared_with_admin {
        active.shared_with_admin = Set(shared);
    }
    if let Some(visible) = fields.visible_to_dj {
        active.visible_to_dj = Set(visible);
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(conn).await
}

pub async fn get_event_by_id<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<events::Model>, DbErr> {
    events::Entity::find_by_id(id).one(conn).await
}

/// Batch-load events by id.
pub async fn get_events_by_ids<C: ConnectionTrait>(
    conn: &C,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, events::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    Ok(events::Entity::find()
        .filter(events::Column::Id.is_in(ids.to_vec()))
        .all(conn)
        .await?
        .into_iter()
        .map(|e| (e.id, e))
        .collect())
}

/// Events the caller may see, most recent date first.
pub async fn list_events(
    db: &DatabaseConnection,
    visibility: &Visibility,
    limit: u64,
) -> Result<Vec<events::Model>, DbErr> {
    let query = events::Entity::find()
        .order_by_desc(events::Column::EventDate)
        .order_by_desc(events::Column::CreatedAt)
        .limit(limit);

    let query = match visibility {
        Visibility::All => query,
        Visibility::Producer {
            profile_id,
            producer_id,
        } => query.filter(
            Condition::any()
                .add(events::Column::CreatedBy.eq(*profile_id))
                .add_option(producer_id.map(|id| events::Column::ProducerId.eq(id))),
        ),
        Visibility::Dj(dj_id) => {
            let ids = event_ids_for_dj(db, *dj_id).await?;
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            query
                .filter(events::Column::Id.is_in(ids))
                .filter(events::Column::VisibleToDj.eq(true))
        }
    };

    query.all(db).await
}

/// Ids of every event the caller may see; `None` means no restriction.
pub async fn visible_event_ids(
    db: &DatabaseConnection,
    visibility: &Visibility,
) -> Result<Option<Vec<Uuid>>, DbErr> {
    let query = match visibility {
        Visibility::All => return Ok(None),
        Visibility::Dj(dj_id) => return event_ids_for_dj(db, *dj_id).await.map(Some),
        Visibility::Producer {
            profile_id,
            producer_id,
        } => events::Entity::find().filter(
            Condition::any()
                .add(events::Column::CreatedBy.eq(*profile_id))
                .add_option(producer_id.map(|id| events::Column::ProducerId.eq(id))),
        ),
    };

    query
        .select_only()
        .column(events::Column::Id)
        .into_tuple::<Uuid>()
        .all(db)
        .await
        .map(Some)
}

async fn event_ids_for_dj(db: &DatabaseConnection, dj_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
    event_djs::Entity::find()
        .select_only()
        .column(event_djs::Column::EventId)
        .filter(event_djs::Column::DjId.eq(dj_id))
        .into_tuple::<Uuid>()
        .all(db)
        .await
}

/// Mirror a payment's status onto its event so event-based summaries agree.
pub async fn set_payment_status<C: ConnectionTrait>(
    conn: &C,
    event_id: Uuid,
    status: PaymentStatus,
    proof_url: Option<String>,
) -> Result<UpdateResult, DbErr> {
    let mut update = events::Entity::update_many()
        .col_expr(events::Column::PaymentStatus, Expr::value(status))
        .col_expr(events::Column::UpdatedAt, Expr::value(chrono::Utc::now()));
    if let Some(url) = proof_url {
        update = update.col_expr(events::Column::PaymentProofUrl, Expr::value(url));
    }

    update
        .filter(events::Column::Id.eq(event_id))
        .exec(conn)
        .await
}

/// Delete the event's DJ assignments and then the event itself, in one transaction.
///
/// Contracts, payments and receipts go with the event through cascading keys.
pub async fn delete_event(db: &DatabaseConnection, id: Uuid) -> Result<bool, DbErr> {
    let txn = db.begin().await?;

    event_djs::Entity::delete_many()
        .filter(event_djs::Column::EventId.eq(id))
        .exec(&txn)
        .await?;
    let result = events::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    Ok(result.rows_affected > 0)
}

pub async fn count_events(db: &DatabaseConnection) -> Result<u64, DbErr> {
    events::Entity::find().count(db).await
}
