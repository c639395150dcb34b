use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::payments::{self, ConfirmPayment, PaymentStatus};

pub async fn find_by_event<C: ConnectionTrait>(
    conn: &C,
    event_id: Uuid,
) -> Result<Option<payments::Model>, DbErr> {
    payments::Entity::find()
        .filter(payments::Column::EventId.eq(event_id))
        .one(conn)
        .await
}

/// Keep exactly one payment per event in step with the event's cache value.
///
/// An existing payment gets the new amount, due date and producer; its
/// status is left alone so confirmed or in-flight payments are not reset.
/// Otherwise a pending payment is created.
pub async fn upsert_for_event<C: ConnectionTrait>(
    conn: &C,
    event_id: Uuid,
    amount: f64,
    producer_id: Option<Uuid>,
    due_date: Option<chrono::NaiveDate>,
) -> Result<payments::Model, DbErr> {
    if let Some(existing) = find_by_event(conn, event_id).await? {
        let mut active: payments::ActiveModel = existing.into();
        active.amount = Set(amount);
        active.producer_id = Set(producer_id);
        active.due_date = Set(due_date);
        active.updated_at = Set(Some(chrono::Utc::now()));

        return active.update(conn).await;
    }

    let payment = payments::ActiveModel {
        id: Set(Uuid::new_v4()),
        event_id: Set(event_id),
        producer_id: Set(producer_id),
        amount: Set(amount),
        status: Set(PaymentStatus::Pending),
        due_date: Set(due_date),
        paid_at: Set(None),
        payment_method: Set(None),
        payment_proof_url: Set(None),
        commission_rate: Set(None),
        commission_amount: Set(None),
        notes: Set(None),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    payment.insert(conn).await
}

/// Payments visible to the caller, newest first. `event_ids` of `None` means all.
pub async fn list_payments(
    db: &DatabaseConnection,
    event_ids: Option<Vec<Uuid>>,
) -> Result<Vec<payments::Model>, DbErr> {
    let mut query = payments::Entity::find().order_by_desc(payments::Column::CreatedAt);

    if let Some(ids) = event_ids {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        query = query.filter(payments::Column::EventId.is_in(ids));
    }

    query.all(db).await
}

pub async fn get_payment_by_id<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<payments::Model>, DbErr> {
    payments::Entity::find_by_id(id).one(conn).await
}

/// An update that only matches the payment while it is still in `from`.
fn from_status(id: Uuid, from: PaymentStatus) -> UpdateMany<payments::Entity> {
    payments::Entity::update_many()
        .col_expr(payments::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(payments::Column::Id.eq(id))
        .filter(payments::Column::Status.eq(from))
}

/// Run a guarded update and reload the row.
///
/// `RecordNotUpdated` means another writer moved the payment first.
async fn apply<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    update: UpdateMany<payments::Entity>,
) -> Result<payments::Model, DbErr> {
    let result = update.exec(conn).await?;
    if result.rows_affected == 0 {
        return Err(DbErr::RecordNotUpdated);
    }

    payments::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(DbErr::RecordNotFound("Payment not found".to_string()))
}

/// Move `payment` to `status`, provided nobody changed its status since it was read.
pub async fn set_status<C: ConnectionTrait>(
    conn: &C,
    payment: payments::Model,
    status: PaymentStatus,
) -> Result<payments::Model, DbErr> {
    let mut update = from_status(payment.id, payment.status)
        .col_expr(payments::Column::Status, Expr::value(status.as_str()));
    if status == PaymentStatus::Paid {
        update = update.col_expr(payments::Column::PaidAt, Expr::value(chrono::Utc::now()));
    }

    apply(conn, payment.id, update).await
}

/// Attach an uploaded proof of payment and move the payment to `pagamento_enviado`.
pub async fn attach_proof<C: ConnectionTrait>(
    conn: &C,
    payment: payments::Model,
    proof_url: String,
) -> Result<payments::Model, DbErr> {
    let update = from_status(payment.id, payment.status)
        .col_expr(payments::Column::PaymentProofUrl, Expr::value(proof_url))
        .col_expr(
            payments::Column::Status,
            Expr::value(PaymentStatus::PagamentoEnviado.as_str()),
        );

    apply(conn, payment.id, update).await
}

/// Mark a payment as paid. `paid_at` defaults to now.
pub async fn confirm<C: ConnectionTrait>(
    conn: &C,
    payment: payments::Model,
    input: ConfirmPayment,
) -> Result<payments::Model, DbErr> {
    let paid_at = input.paid_at.unwrap_or_else(chrono::Utc::now);
    let mut update = from_status(payment.id, payment.status)
        .col_expr(payments::Column::Status, Expr::value(PaymentStatus::Paid.as_str()))
        .col_expr(payments::Column::PaidAt, Expr::value(paid_at));
    if let Some(method) = input.payment_method {
        update = update.col_expr(payments::Column::PaymentMethod, Expr::value(method));
    }
    if let Some(url) = input.payment_proof_url {
        update = update.col_expr(payments::Column::PaymentProofUrl, Expr::value(url));
    }
    if let Some(notes) = input.notes {
        update = update.col_expr(payments::Column::Notes, Expr::value(notes));
    }

    apply(conn, payment.id, update).await
}

pub async fn delete_payment(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    payments::Entity::delete_by_id(id).exec(db).await
}

pub async fn count_payments(db: &DatabaseConnection) -> Result<u64, DbErr> {
    payments::Entity::find().count(db).await
}

pub async fn count_by_status(db: &DatabaseConnection, status: PaymentStatus) -> Result<u64, DbErr> {
    payments::Entity::find()
        .filter(payments::Column::Status.eq(status))
        .count(db)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn payment(event_id: Uuid, amount: f64, status: PaymentStatus) -> payments::Model {
        payments::Model {
            id: Uuid::new_v4(),
            event_id,
            producer_id: None,
            amount,
            status,
            due_date: None,
            paid_at: None,
            payment_method: None,
            payment_proof_url: None,
            commission_rate: None,
            commission_amount: None,
            notes: None,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn upsert_inserts_pending_payment_when_missing() {
        let event_id = Uuid::new_v4();
        let inserted = payment(event_id, 500.0, PaymentStatus::Pending);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<payments::Model>::new()])
            .append_query_results([vec![inserted.clone()]])
            .into_connection();

        let result = upsert_for_event(&db, event_id, 500.0, None, None).await.unwrap();
        assert_eq!(result.status, PaymentStatus::Pending);
        assert_eq!(result.amount, 500.0);

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 2);
        assert!(format!("{:?}", log[1]).contains("INSERT INTO"));
    }

    #[tokio::test]
    async fn upsert_updates_existing_payment_without_touching_status() {
        let event_id = Uuid::new_v4();
        let existing = payment(event_id, 300.0, PaymentStatus::Paid);
        let updated = payments::Model {
            amount: 800.0,
            ..existing.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing]])
            .append_query_results([vec![updated]])
            .into_connection();

        let result = upsert_for_event(&db, event_id, 800.0, None, None).await.unwrap();
        assert_eq!(result.amount, 800.0);
        assert_eq!(result.status, PaymentStatus::Paid);

        let log = db.into_transaction_log();
        let update_sql = format!("{:?}", log[1]);
        let set_clause = &update_sql[update_sql.find("SET").unwrap()..update_sql.find("WHERE").unwrap()];
        assert!(set_clause.contains("amount"));
        assert!(!set_clause.contains("status"));
    }

    #[tokio::test]
    async fn status_change_only_matches_the_status_it_was_read_in() {
        let event_id = Uuid::new_v4();
        let current = payment(event_id, 500.0, PaymentStatus::Pending);
        let moved = payments::Model {
            status: PaymentStatus::Processing,
            ..current.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([vec![moved]])
            .into_connection();

        let result = set_status(&db, current, PaymentStatus::Processing).await.unwrap();
        assert_eq!(result.status, PaymentStatus::Processing);

        let log = db.into_transaction_log();
        let update = &log[0].statements()[0];
        let where_clause = &update.sql[update.sql.find("WHERE").unwrap()..];
        assert!(where_clause.contains(r#""status" = "#), "{}", update.sql);
        assert!(format!("{:?}", update.values).contains("pending"));
    }

    #[tokio::test]
    async fn status_changed_underneath_is_not_updated() {
        let current = payment(Uuid::new_v4(), 500.0, PaymentStatus::Pending);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let err = confirm(&db, current, ConfirmPayment::default()).await.unwrap_err();
        assert!(matches!(err, DbErr::RecordNotUpdated));
    }
}
