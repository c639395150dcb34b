use sea_orm::*;
use uuid::Uuid;

use crate::models::payment_receipts;

#[derive(Debug, Clone)]
pub struct NewReceipt {
    pub event_id: Uuid,
    pub dj_id: Uuid,
    pub producer_id: Option<Uuid>,
    pub receipt_url: String,
    pub amount: Option<f64>,
    pub notes: Option<String>,
    pub uploaded_by: Uuid,
}

pub async fn insert_receipt<C: ConnectionTrait>(
    conn: &C,
    input: NewReceipt,
) -> Result<payment_receipts::Model, DbErr> {
    payment_receipts::ActiveModel {
        id: Set(Uuid::new_v4()),
        event_id: Set(input.event_id),
        dj_id: Set(input.dj_id),
        producer_id: Set(input.producer_id),
        receipt_url: Set(input.receipt_url),
        amount: Set(input.amount),
        notes: Set(input.notes),
        uploaded_by: Set(Some(input.uploaded_by)),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(conn)
    .await
}

pub async fn list_for_event(
    db: &DatabaseConnection,
    event_id: Uuid,
) -> Result<Vec<payment_receipts::Model>, DbErr> {
    payment_receipts::Entity::find()
        .filter(payment_receipts::Column::EventId.eq(event_id))
        .order_by_desc(payment_receipts::Column::CreatedAt)
        .all(db)
        .await
}
