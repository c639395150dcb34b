use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment status, stored as a lowercase string.
///
/// `pendente` and `pago` are accepted on input for rows written by older
/// clients and always stored under their canonical names.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    #[serde(alias = "pendente")]
    Pending,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "pagamento_enviado")]
    PagamentoEnviado,
    #[sea_orm(string_value = "paid")]
    #[serde(alias = "pago")]
    Paid,
    #[sea_orm(string_value = "overdue")]
    Overdue,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Processing => "processing",
            PaymentStatus::PagamentoEnviado => "pagamento_enviado",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Overdue => "overdue",
        }
    }

    /// Case-insensitive parse including the legacy Portuguese aliases.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" | "pendente" => Some(PaymentStatus::Pending),
            "processing" => Some(PaymentStatus::Processing),
            "pagamento_enviado" => Some(PaymentStatus::PagamentoEnviado),
            "paid" | "pago" => Some(PaymentStatus::Paid),
            "overdue" => Some(PaymentStatus::Overdue),
            _ => None,
        }
    }

    /// Whether an admin may move a payment from `self` to `next`.
    ///
    /// Staying in the same state is always allowed. `Paid` is terminal.
    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        use PaymentStatus::*;

        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Pending, Processing | PagamentoEnviado | Paid | Overdue)
                | (Overdue, Processing | PagamentoEnviado | Paid)
                | (PagamentoEnviado, Processing | Paid | Pending)
                | (Processing, Paid | Pending)
        )
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SeaORM entity for the `payments` table. One payment per event.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub event_id: Uuid,
    pub producer_id: Option<Uuid>,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub status: PaymentStatus,
    pub due_date: Option<Date>,
    pub paid_at: Option<DateTimeUtc>,
    pub payment_method: Option<String>,
    pub payment_proof_url: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub commission_rate: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub commission_amount: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id"
    )]
    Event,
    #[sea_orm(
        belongs_to = "super::producers::Entity",
        from = "Column::ProducerId",
        to = "super::producers::Column::Id"
    )]
    Producer,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::producers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Producer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePaymentStatus {
    pub status: PaymentStatus,
}

/// Body of `POST /api/payments/{id}/confirm`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmPayment {
    pub paid_at: Option<DateTimeUtc>,
    pub payment_method: Option<String>,
    pub payment_proof_url: Option<String>,
    pub notes: Option<String>,
}

/// A payment together with its event, as listed by `GET /api/payments`.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentView {
    #[serde(flatten)]
    pub payment: Model,
    pub event: Option<super::events::Model>,
}

#[cfg(test)]
mod tests {
    use super::PaymentStatus::*;
    use super::*;

    #[test]
    fn legacy_aliases_parse_to_canonical_values() {
        assert_eq!(PaymentStatus::parse("PENDENTE"), Some(Pending));
        assert_eq!(PaymentStatus::parse(" pago "), Some(Paid));
        assert_eq!(PaymentStatus::parse("refunded"), None);

        let parsed: PaymentStatus = serde_json::from_str("\"pago\"").unwrap();
        assert_eq!(parsed, Paid);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"paid\"");
        assert_eq!(
            serde_json::to_string(&PagamentoEnviado).unwrap(),
            "\"pagamento_enviado\""
        );
    }

    #[test]
    fn paid_is_terminal() {
        for next in [Pending, Processing, PagamentoEnviado, Overdue] {
            assert!(!Paid.can_transition_to(next), "paid -> {next} must be rejected");
        }
        assert!(Paid.can_transition_to(Paid));
    }

    #[test]
    fn proof_can_be_rejected_back_to_pending() {
        assert!(PagamentoEnviado.can_transition_to(Pending));
        assert!(PagamentoEnviado.can_transition_to(Paid));
        assert!(!PagamentoEnviado.can_transition_to(Overdue));
    }

    #[test]
    fn overdue_cannot_return_to_pending() {
        assert!(!Overdue.can_transition_to(Pending));
        assert!(Overdue.can_transition_to(Paid));
        assert!(Pending.can_transition_to(Overdue));
    }
}
