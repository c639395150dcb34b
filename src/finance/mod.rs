//! Financial summary over events and payments.
//!
//! The aggregation is a pure fold: no I/O, no errors. Malformed numeric
//! fields count as zero and unknown statuses only contribute to the total.

pub mod money;

use serde::{Deserialize, Deserializer, Serialize};

pub use money::{Cents, NumberLike, format_brl, parse_decimal, round_currency};

use crate::models::{events, payments};

/// Which revenue bucket a status string falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBucket {
    Paid,
    Pending,
    Other,
}

impl StatusBucket {
    pub fn of(status: Option<&str>) -> Self {
        let status = status.unwrap_or_default().trim().to_lowercase();
        match status.as_str() {
            "paid" | "pago" => StatusBucket::Paid,
            "pending" | "pendente" | "pagamento_enviado" => StatusBucket::Pending,
            _ => StatusBucket::Other,
        }
    }
}

/// Commission terms carried by an event nested inside a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommissionTerms {
    #[serde(default)]
    pub commission_rate: Option<NumberLike>,
    #[serde(default)]
    pub commission_amount: Option<NumberLike>,
}

/// One event- or payment-like record to aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    #[serde(default)]
    pub amount: Option<NumberLike>,
    #[serde(default, alias = "payment_status", deserialize_with = "lenient_string")]
    pub status: Option<String>,
    /// Commission already computed upstream; wins over any rate.
    #[serde(default, alias = "unk_commission")]
    pub commission: Option<NumberLike>,
    #[serde(default)]
    pub commission_rate: Option<NumberLike>,
    #[serde(default)]
    pub commission_amount: Option<NumberLike>,
    #[serde(default, deserialize_with = "lenient_terms")]
    pub event: Option<CommissionTerms>,
}

impl FinancialRecord {
    pub fn amount(&self) -> Cents {
        Cents::from_f64(self.amount.as_ref().and_then(NumberLike::parse).unwrap_or(0.0))
    }

    /// Commission owed on `amount`: pre-computed value, else rate, else absolute amount.
    pub fn commission_for(&self, amount: Cents) -> Cents {
        let parse = |v: &Option<NumberLike>| v.as_ref().and_then(NumberLike::parse);
        let nested = self.event.as_ref();

        if let Some(explicit) = parse(&self.commission) {
            return Cents::from_f64(explicit.max(0.0));
        }

        let rate = parse(&self.commission_rate)
            .or_else(|| nested.and_then(|e| parse(&e.commission_rate)));
        if let Some(rate) = rate {
            return Cents::saturating_from_f64(amount.as_f64() * rate.max(0.0) / 100.0);
        }

        let absolute = parse(&self.commission_amount)
            .or_else(|| nested.and_then(|e| parse(&e.commission_amount)));
        absolute
            .map(|v| Cents::from_f64(v.max(0.0)))
            .unwrap_or(Cents::ZERO)
    }

    /// A payment row, optionally joined with its event.
    pub fn from_payment(payment: &payments::Model, event: Option<&events::Model>) -> Self {
        Self {
            amount: Some(payment.amount.into()),
            status: Some(payment.status.as_str().to_string()),
            commission: payment.commission_amount.map(NumberLike::from),
            commission_rate: payment.commission_rate.map(NumberLike::from),
            commission_amount: None,
            event: event.map(|e| CommissionTerms {
                commission_rate: e.commission_rate.map(NumberLike::from),
                commission_amount: e.commission_amount.map(NumberLike::from),
            }),
        }
    }

    /// An event row, using its cache value and payment status.
    ///
    /// A stored commission amount is the event's settled commission and wins over its rate.
    pub fn from_event(event: &events::Model) -> Self {
        Self {
            amount: Some(event.cache_value.into()),
            status: Some(event.payment_status.as_str().to_string()),
            commission: event.commission_amount.map(NumberLike::from),
            commission_rate: event.commission_rate.map(NumberLike::from),
            commission_amount: None,
            event: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialStats {
    pub total_revenue: Cents,
    pub paid_revenue: Cents,
    pub pending_revenue: Cents,
    pub pending_count: u64,
    pub total_commission: Cents,
    pub net_revenue: Cents,
}

/// Fold records into revenue buckets and commission totals.
///
/// Each amount is rounded to cents before it is added, so totals are exact
/// sums of cent values: two records of 0.005 total 0.02, not a single
/// rounding of the raw 0.01 sum.
pub fn aggregate<'a, I>(records: I) -> FinancialStats
where
    I: IntoIterator<Item = &'a FinancialRecord>,
{
    let mut stats = FinancialStats::default();

    for record in records {
        let amount = record.amount();
        stats.total_revenue += amount;

        match StatusBucket::of(record.status.as_deref()) {
            StatusBucket::Paid => stats.paid_revenue += amount,
            StatusBucket::Pending => {
                stats.pending_revenue += amount;
                stats.pending_count += 1;
            }
            StatusBucket::Other => {}
        }

        stats.total_commission += record.commission_for(amount);
    }

    stats.net_revenue = (stats.total_revenue - stats.total_commission).clamp_non_negative();
    stats
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_terms<'de, D>(deserializer: D) -> Result<Option<CommissionTerms>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(amount: impl Into<NumberLike>, status: &str) -> FinancialRecord {
        FinancialRecord {
            amount: Some(amount.into()),
            status: Some(status.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn worked_example_from_two_payments() {
        let paid = FinancialRecord {
            commission_rate: Some(15.0.into()),
            ..record(1000.0, "pago")
        };
        let pending = FinancialRecord {
            commission_amount: Some(50.0.into()),
            ..record(500.0, "pendente")
        };

        let stats = aggregate(&[paid, pending]);

        assert_eq!(stats.paid_revenue, Cents::new(100_000));
        assert_eq!(stats.pending_revenue, Cents::new(50_000));
        assert_eq!(stats.pending_count, 1);
        assert_eq!(stats.total_commission, Cents::new(20_000));
        assert_eq!(stats.total_revenue, Cents::new(150_000));
        assert_eq!(stats.net_revenue, Cents::new(130_000));
    }

    #[test]
    fn status_matching_is_case_insensitive() {
        assert_eq!(StatusBucket::of(Some("PAGO")), StatusBucket::Paid);
        assert_eq!(StatusBucket::of(Some("Paid")), StatusBucket::Paid);
        assert_eq!(StatusBucket::of(Some("Pagamento_Enviado")), StatusBucket::Pending);
        assert_eq!(StatusBucket::of(Some("overdue")), StatusBucket::Other);
        assert_eq!(StatusBucket::of(None), StatusBucket::Other);
    }

    #[test]
    fn unknown_status_only_counts_toward_total() {
        let stats = aggregate(&[record(100.0, "paid"), record(40.0, "overdue")]);
        assert_eq!(stats.total_revenue, Cents::new(14_000));
        assert_eq!(
            stats.total_revenue,
            stats.paid_revenue + stats.pending_revenue + Cents::new(4_000)
        );
        assert_eq!(stats.pending_count, 0);
    }

    #[test]
    fn precomputed_commission_beats_rate_and_amount() {
        let r = FinancialRecord {
            commission: Some(12.0.into()),
            commission_rate: Some(50.0.into()),
            commission_amount: Some(99.0.into()),
            ..record(100.0, "paid")
        };
        assert_eq!(aggregate(&[r]).total_commission, Cents::new(1_200));
    }

    #[test]
    fn nested_event_terms_are_a_fallback() {
        let r = FinancialRecord {
            event: Some(CommissionTerms {
                commission_rate: Some("10".into()),
                commission_amount: Some(999.0.into()),
            }),
            ..record(250.0, "pending")
        };
        assert_eq!(aggregate(&[r]).total_commission, Cents::new(2_500));
    }

    #[test]
    fn negative_commission_inputs_are_clamped() {
        let by_rate = FinancialRecord {
            commission_rate: Some((-20.0).into()),
            ..record(100.0, "paid")
        };
        let by_amount = FinancialRecord {
            commission_amount: Some((-5.0).into()),
            ..record(100.0, "paid")
        };
        assert_eq!(aggregate(&[by_rate, by_amount]).total_commission, Cents::ZERO);
    }

    #[test]
    fn net_revenue_never_goes_negative() {
        let r = FinancialRecord {
            commission: Some(5_000.0.into()),
            ..record(100.0, "paid")
        };
        let stats = aggregate(&[r]);
        assert_eq!(stats.total_commission, Cents::new(500_000));
        assert_eq!(stats.net_revenue, Cents::ZERO);
    }

    #[test]
    fn malformed_amounts_contribute_zero() {
        let blank = record("", "paid");
        let missing = FinancialRecord {
            status: Some("paid".to_string()),
            ..Default::default()
        };
        let brazilian = record("1.234,56", "paid");

        let stats = aggregate(&[blank, missing, brazilian]);
        assert_eq!(stats.paid_revenue, Cents::new(123_456));
    }

    #[test]
    fn empty_input_is_all_zero() {
        assert_eq!(aggregate(&[]), FinancialStats::default());
    }

    #[test]
    fn deserializes_loose_json_records() {
        let json = r#"[
            {"amount": "1.000,00", "payment_status": "PAGO", "event": {"commission_rate": 15}},
            {"amount": 500, "status": 3, "event": "not-an-object", "extra": true},
            {"amount": null, "status": null}
        ]"#;
        let records: Vec<FinancialRecord> = serde_json::from_str(json).unwrap();
        let stats = aggregate(&records);

        assert_eq!(stats.total_revenue, Cents::new(150_000));
        assert_eq!(stats.paid_revenue, Cents::new(100_000));
        assert_eq!(stats.total_commission, Cents::new(15_000));
        assert_eq!(records[1].status.as_deref(), Some("3"));
        assert!(records[1].event.is_none());
    }

    #[test]
    fn stats_serialize_in_camel_case() {
        let stats = aggregate(&[record(10.5, "paid")]);
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["totalRevenue"], serde_json::json!(10.5));
        assert_eq!(json["pendingCount"], serde_json::json!(0));
        assert_eq!(json["netRevenue"], serde_json::json!(10.5));
    }

    fn event_row(cache_value: f64, rate: Option<f64>, amount: Option<f64>) -> events::Model {
        let id = uuid::Uuid::from_u128(1);
        events::Model {
            id,
            event_name: "Baile".to_string(),
            event_date: chrono::NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            event_time: None,
            location: None,
            city: None,
            venue: None,
            description: None,
            cache_value,
            commission_rate: rate,
            commission_amount: amount,
            payment_status: payments::PaymentStatus::Pending,
            status: events::EventStatus::Pending,
            producer_id: None,
            created_by: Some(id),
            created_by_role: crate::models::profiles::Roles::Admin,
            shared_with_admin: true,
            visible_to_dj: true,
            payment_proof_url: None,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn event_commission_amount_wins_over_its_rate() {
        let both = FinancialRecord::from_event(&event_row(1000.0, Some(10.0), Some(50.0)));
        assert_eq!(aggregate(&[both]).total_commission, Cents::new(5_000));

        let rate_only = FinancialRecord::from_event(&event_row(1000.0, Some(10.0), None));
        assert_eq!(aggregate(&[rate_only]).total_commission, Cents::new(10_000));
    }

    #[test]
    fn amounts_are_rounded_per_record() {
        let stats = aggregate(&[record(0.005, "paid"), record(0.005, "paid")]);
        assert_eq!(stats.total_revenue, Cents::new(2));
    }

    #[test]
    fn overflowing_rate_saturates_instead_of_vanishing() {
        let r = FinancialRecord {
            commission_rate: Some(f64::MAX.into()),
            ..record(1_000_000.0, "paid")
        };
        let stats = aggregate(&[r]);
        assert_eq!(stats.total_commission, Cents::MAX);
        assert_eq!(stats.net_revenue, Cents::ZERO);
    }
}
