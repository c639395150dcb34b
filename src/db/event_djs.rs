use std::collections::HashMap;

use sea_orm::*;
use uuid::Uuid;

use crate::models::event_djs;
use crate::models::payments::PaymentStatus;

/// Replace every DJ assignment of an event with `assignments` (dj id, fee).
///
/// Runs on the caller's connection so it can share the event transaction.
pub async fn replace_for_event<C: ConnectionTrait>(
    conn: &C,
    event_id: Uuid,
    assignments: &[(Uuid, Option<f64>)],
) -> Result<u64, DbErr> {
    event_djs::Entity::delete_many()
        .filter(event_djs::Column::EventId.eq(event_id))
        .exec(conn)
        .await?;

    if assignments.is_empty() {
        return Ok(0);
    }

    let now = chrono::Utc::now();
    let rows = assignments.iter().map(|(dj_id, fee)| event_djs::ActiveModel {
        id: Set(Uuid::new_v4()),
        event_id: Set(event_id),
        dj_id: Set(*dj_id),
        fee: Set(*fee),
        payment_status: Set(PaymentStatus::Pending),
        payment_receipt_url: Set(None),
        created_at: Set(now),
        updated_at: Set(None),
    });

    event_djs::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await
}

pub async fn list_for_event<C: ConnectionTrait>(
    conn: &C,
    event_id: Uuid,
) -> Result<Vec<event_djs::Model>, DbErr> {
    event_djs::Entity::find()
        .filter(event_djs::Column::EventId.eq(event_id))
        .order_by_asc(event_djs::Column::CreatedAt)
        .all(conn)
        .await
}

/// Batch-load assignments for many events, grouped by event id.
pub async fn list_for_events(
    db: &DatabaseConnection,
    event_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<event_djs::Model>>, DbErr> {
    if event_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = event_djs::Entity::find()
        .filter(event_djs::Column::EventId.is_in(event_ids.to_vec()))
        .order_by_asc(event_djs::Column::CreatedAt)
        .all(db)
        .await?;

    let mut grouped: HashMap<Uuid, Vec<event_djs::Model>> = HashMap::new();
    for row in rows {
        grouped.entry(row.event_id).or_default().push(row);
    }
    Ok(grouped)
}

pub async fn find_assignment<C: ConnectionTrait>(
    conn: &C,
    event_id: Uuid,
    dj_id: Uuid,
) -> Result<Option<event_djs::Model>, DbErr> {
    event_djs::Entity::find()
        .filter(event_djs::Column::EventId.eq(event_id))
        .filter(event_djs::Column::DjId.eq(dj_id))
        .one(conn)
        .await
}

/// Mark a DJ as paid for an event and keep the receipt link.
pub async fn mark_paid<C: ConnectionTrait>(
    conn: &C,
    assignment: event_djs::Model,
    receipt_url: String,
) -> Result<event_djs::Model, DbErr> {
    let mut active: event_djs::ActiveModel = assignment.into();
    active.payment_status = Set(PaymentStatus::Paid);
    active.payment_receipt_url = Set(Some(receipt_url));
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(conn).await
}
