use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};
use tracing::info;
use uuid::Uuid;

use crate::db::{events as event_db, payments as payment_db};
use crate::error::ApiError;
use crate::models::payments::{self, ConfirmPayment, PaymentStatus};

async fn load(db: &DatabaseConnection, id: Uuid) -> Result<payments::Model, ApiError> {
    payment_db::get_payment_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Payment not found"))
}

/// Refuse a move the payment lifecycle does not allow.
pub fn check_transition(from: PaymentStatus, to: PaymentStatus) -> Result<(), ApiError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(ApiError::conflict(format!(
            "Payment cannot move from {from} to {to}"
        )))
    }
}

fn lost_race(id: Uuid) -> impl FnOnce(DbErr) -> ApiError {
    move |e| match e {
        DbErr::RecordNotUpdated => {
            ApiError::conflict(format!("Payment {id} was changed by another request"))
        }
        e => ApiError::from(e),
    }
}

/// Move a payment to `status` and mirror it on the event.
pub async fn change_status(
    db: &DatabaseConnection,
    id: Uuid,
    status: PaymentStatus,
) -> Result<payments::Model, ApiError> {
    let payment = load(db, id).await?;
    check_transition(payment.status, status)?;

    let previous = payment.status;
    let txn = db.begin().await?;
    let updated = payment_db::set_status(&txn, payment, status)
        .await
        .map_err(lost_race(id))?;
    event_db::set_payment_status(&txn, updated.event_id, status, None).await?;
    txn.commit().await?;

    info!("Payment {} moved from {} to {}", id, previous, status);
    Ok(updated)
}

/// Store the proof URL and mark the payment as sent.
pub async fn record_proof(
    db: &DatabaseConnection,
    payment: payments::Model,
    proof_url: String,
) -> Result<payments::Model, ApiError> {
    check_transition(payment.status, PaymentStatus::PagamentoEnviado)?;

    let id = payment.id;
    let txn = db.begin().await?;
    let updated = payment_db::attach_proof(&txn, payment, proof_url.clone())
        .await
        .map_err(lost_race(id))?;
    event_db::set_payment_status(
        &txn,
        updated.event_id,
        PaymentStatus::PagamentoEnviado,
        Some(proof_url),
    )
    .await?;
    txn.commit().await?;

    Ok(updated)
}

/// Admin confirmation that the money arrived.
pub async fn confirm(
    db: &DatabaseConnection,
    id: Uuid,
    input: ConfirmPayment,
) -> Result<payments::Model, ApiError> {
    let payment = load(db, id).await?;
    check_transition(payment.status, PaymentStatus::Paid)?;

    let txn = db.begin().await?;
    let updated = payment_db::confirm(&txn, payment, input)
        .await
        .map_err(lost_race(id))?;
    event_db::set_payment_status(
        &txn,
        updated.event_id,
        PaymentStatus::Paid,
        updated.payment_proof_url.clone(),
    )
    .await?;
    txn.commit().await?;

    info!("Payment {} confirmed", id);
    Ok(updated)
}
