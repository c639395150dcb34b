use sea_orm::*;
use uuid::Uuid;

use crate::finance::Cents;
use crate::models::dj_producer_relations::{self, RelationQuery};

/// Record one more booking of `dj_id` by `producer_id`.
///
/// Creates the relation on first booking; afterwards bumps the event count,
/// adds `allocation` to the revenue and keeps the latest event date.
pub async fn record_booking<C: ConnectionTrait>(
    conn: &C,
    dj_id: Uuid,
    producer_id: Uuid,
    allocation: Cents,
    event_date: chrono::NaiveDate,
) -> Result<dj_producer_relations::Model, DbErr> {
    let existing = dj_producer_relations::Entity::find()
        .filter(dj_producer_relations::Column::DjId.eq(dj_id))
        .filter(dj_producer_relations::Column::ProducerId.eq(producer_id))
        .one(conn)
        .await?;

    let Some(relation) = existing else {
        return dj_producer_relations::ActiveModel {
            id: Set(Uuid::new_v4()),
            dj_id: Set(dj_id),
            producer_id: Set(producer_id),
            total_events: Set(1),
            total_revenue: Set(allocation.as_f64()),
            last_event_date: Set(Some(event_date)),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now()),
            updated_at: Set(None),
        }
        .insert(conn)
        .await;
    };

    let total_revenue = Cents::from_f64(relation.total_revenue) + allocation;
    let last_event_date = relation
        .last_event_date
        .map_or(event_date, |d| Ord::max(d, event_date));
    let total_events = relation.total_events.saturating_add(1);

    let mut active: dj_producer_relations::ActiveModel = relation.into();
    active.total_events = Set(total_events);
    active.total_revenue = Set(total_revenue.as_f64());
    active.last_event_date = Set(Some(last_event_date));
    active.is_active = Set(true);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(conn).await
}

pub async fn list_relations(
    db: &DatabaseConnection,
    query: &RelationQuery,
) -> Result<Vec<dj_producer_relations::Model>, DbErr> {
    let mut select = dj_producer_relations::Entity::find()
        .order_by_desc(dj_producer_relations::Column::TotalEvents);

    if let Some(dj_id) = query.dj_id {
        select = select.filter(dj_producer_relations::Column::DjId.eq(dj_id));
    }
    if let Some(producer_id) = query.producer_id {
        select = select.filter(dj_producer_relations::Column::ProducerId.eq(producer_id));
    }

    select.all(db).await
}
