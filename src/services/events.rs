//! Event create/update: validation, DJ fee reconciliation and the follow-up
//! writes (assignments, payment, contracts, relation stats) that keep an
//! event's bookings consistent.

use std::collections::HashSet;

use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::authorization::Caller;
use crate::db::{
    contract_templates as template_db, contracts as contract_db, event_djs as event_dj_db,
    events as event_db, payments as payment_db, producers as producer_db,
    profiles as profile_db, relations as relation_db,
};
use crate::error::ApiError;
use crate::finance::{Cents, NumberLike};
use crate::models::contract_templates::DJ_SERVICE_TEMPLATE;
use crate::models::events::{self, EventFields, EventInput};
use crate::models::profiles::{self, Roles};
use crate::services::contract_text::{self, ContractContext};

/// One DJ on an event with the fee resolved from the form, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DjBooking {
    pub dj_id: Uuid,
    pub fee: Option<Cents>,
}

/// A validated request: the event row plus the DJ list to sync.
///
/// `djs` is `None` on updates that leave the assignments alone.
#[derive(Debug, Clone, PartialEq)]
pub struct EventPlan {
    pub fields: EventFields,
    pub djs: Option<Vec<DjBooking>>,
}

/// Primary DJ first, then the rest, without duplicates.
pub fn merge_dj_ids(primary: Option<Uuid>, others: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    primary
        .into_iter()
        .chain(others.iter().copied())
        .filter(|id| seen.insert(*id))
        .collect()
}

/// A fee counts only when it parses and is not negative.
pub fn resolve_fee(raw: Option<&NumberLike>) -> Option<Cents> {
    raw.and_then(NumberLike::parse)
        .filter(|fee| *fee >= 0.0)
        .map(Cents::from_f64)
}

/// The explicit cache when given (never negative), else the sum of known fees.
pub fn derive_cache_value(explicit: Option<&NumberLike>, bookings: &[DjBooking]) -> Cents {
    match explicit.and_then(NumberLike::parse) {
        Some(value) => Cents::from_f64(value).clamp_non_negative(),
        None => bookings.iter().filter_map(|b| b.fee).sum(),
    }
}

/// What a DJ is credited with on an event: their own fee, or an even share of the cache.
pub fn allocation(fee: Option<Cents>, cache_value: Cents, dj_count: usize) -> Cents {
    match fee {
        Some(fee) => fee,
        None if dj_count == 0 => Cents::ZERO,
        None => Cents::new(cache_value.get() / dj_count as i64),
    }
}

/// Accepts `YYYY-MM-DD` and ISO timestamps that start with one.
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn non_negative(raw: Option<&NumberLike>) -> Option<f64> {
    raw.and_then(NumberLike::parse)
        .map(|v| Cents::from_f64(v).clamp_non_negative().as_f64())
}

/// Validate an event body before anything touches the database.
///
/// `own_producer` is the caller's producer record when they are a producer.
/// `existing` is the stored event on update, `None` on create.
pub fn plan_event(
    input: EventInput,
    role: Roles,
    own_producer: Option<Uuid>,
    existing: Option<&events::Model>,
) -> Result<EventPlan, ApiError> {
    let is_create = existing.is_none();
    if is_create && role == Roles::Dj {
        return Err(ApiError::forbidden("DJs cannot create events"));
    }

    let event_name = non_blank(input.event_name.clone())
        .ok_or_else(|| ApiError::validation("Event name is required"))?;
    let event_date = input
        .event_date
        .as_deref()
        .ok_or_else(|| ApiError::validation("Event date is required"))
        .and_then(|raw| {
            parse_event_date(raw)
                .ok_or_else(|| ApiError::validation("Event date must be YYYY-MM-DD"))
        })?;

    let djs = if is_create || input.touches_djs() {
        let ids = merge_dj_ids(input.dj_id, input.dj_ids.as_deref().unwrap_or_default());
        if ids.is_empty() {
            return Err(ApiError::validation("Select at least one DJ"));
        }
        Some(
            ids.into_iter()
                .map(|dj_id| DjBooking {
                    dj_id,
                    fee: resolve_fee(input.dj_fee_map.get(&dj_id)),
                })
                .collect::<Vec<_>>(),
        )
    } else {
        None
    };

    let producer_id = match (role, existing) {
        (Roles::Admin, None) => Some(
            input
                .producer_id
                .ok_or_else(|| ApiError::validation("Select a producer for the event"))?,
        ),
        (Roles::Admin, Some(event)) => input.producer_id.or(event.producer_id),
        (_, None) => own_producer,
        (_, Some(event)) => event.producer_id,
    };

    let cache_value = match (&djs, existing) {
        (None, Some(event)) if input.cache_value.is_none() => event.cache_value,
        (bookings, _) => {
            derive_cache_value(input.cache_value.as_ref(), bookings.as_deref().unwrap_or_default())
                .as_f64()
        }
    };

    let fields = EventFields {
        event_name,
        event_date,
        event_time: non_blank(input.event_time),
        location: non_blank(input.location),
        city: non_blank(input.city),
        venue: non_blank(input.venue),
        description: non_blank(input.description),
        cache_value,
        commission_rate: non_negative(input.commission_rate.as_ref()),
        commission_amount: non_negative(input.commission_amount.as_ref()),
        status: input.status,
        producer_id,
        shared_with_admin: input.shared_with_admin,
        visible_to_dj: input.visible_to_dj,
    };

    Ok(EventPlan { fields, djs })
}

/// Create an event and all of its bookings in one transaction.
pub async fn create_event(
    db: &DatabaseConnection,
    caller: &Caller,
    input: EventInput,
    default_commission_rate: f64,
) -> Result<events::Model, ApiError> {
    let plan = plan_event(input, caller.role(), caller.producer_id, None)?;
    let bookings = plan.djs.unwrap_or_default();

    let txn = db.begin().await?;

    let event = event_db::insert_event(&txn, plan.fields, caller.id(), caller.role()).await?;
    sync_bookings(&txn, &event, Some(&bookings), default_commission_rate).await?;

    if let Some(producer_id) = event.producer_id {
        let cache = Cents::from_f64(event.cache_value);
        for booking in &bookings {
            relation_db::record_booking(
                &txn,
                booking.dj_id,
                producer_id,
                allocation(booking.fee, cache, bookings.len()),
                event.event_date,
            )
            .await?;
        }
    }

    txn.commit().await?;

    info!(
        "Event {} created by {} with {} DJ(s)",
        event.id,
        caller.id(),
        bookings.len()
    );
    Ok(event)
}

/// Update an event the caller may manage. Assignments are replaced only when
/// the body names DJs; payment and contracts are always brought in line.
pub async fn update_event(
    db: &DatabaseConnection,
    caller: &Caller,
    existing: events::Model,
    input: EventInput,
    default_commission_rate: f64,
) -> Result<events::Model, ApiError> {
    let plan = plan_event(input, caller.role(), caller.producer_id, Some(&existing))?;

    let txn = db.begin().await?;

    let event = event_db::update_event(&txn, existing, plan.fields).await?;
    sync_bookings(&txn, &event, plan.djs.as_deref(), default_commission_rate).await?;

    txn.commit().await?;

    info!("Event {} updated by {}", event.id, caller.id());
    Ok(event)
}

/// Assignments, payment and contracts for a freshly written event row.
///
/// With `bookings` of `None` the stored assignments are kept as they are.
async fn sync_bookings<C: sea_orm::ConnectionTrait>(
    conn: &C,
    event: &events::Model,
    bookings: Option<&[DjBooking]>,
    default_commission_rate: f64,
) -> Result<(), DbErr> {
    let bookings: Vec<DjBooking> = match bookings {
        Some(bookings) => {
            let rows: Vec<(Uuid, Option<f64>)> = bookings
                .iter()
                .map(|b| (b.dj_id, b.fee.map(Cents::as_f64)))
                .collect();
            let inserted = event_dj_db::replace_for_event(conn, event.id, &rows).await?;
            debug!("Event {}: {} DJ assignment(s) written", event.id, inserted);
            bookings.to_vec()
        }
        None => event_dj_db::list_for_event(conn, event.id)
            .await?
            .into_iter()
            .map(|row| DjBooking {
                dj_id: row.dj_id,
                fee: row.fee.map(Cents::from_f64),
            })
            .collect(),
    };

    payment_db::upsert_for_event(
        conn,
        event.id,
        event.cache_value,
        event.producer_id,
        Some(event.event_date),
    )
    .await?;

    ensure_contracts(conn, event, &bookings, default_commission_rate).await
}

/// Give every booked DJ without a contract one rendered from the current template.
async fn ensure_contracts<C: sea_orm::ConnectionTrait>(
    conn: &C,
    event: &events::Model,
    bookings: &[DjBooking],
    default_commission_rate: f64,
) -> Result<(), DbErr> {
    let existing = contract_db::dj_ids_with_contract(conn, event.id).await?;
    let missing: Vec<&DjBooking> = bookings
        .iter()
        .filter(|b| !existing.contains(&b.dj_id))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }

    let template = template_db::latest_of_type(conn, DJ_SERVICE_TEMPLATE)
        .await?
        .map(|t| t.content)
        .unwrap_or_else(|| contract_text::DEFAULT_TEMPLATE.to_string());

    let dj_ids: Vec<Uuid> = missing.iter().map(|b| b.dj_id).collect();
    let djs = profile_db::get_profiles_by_ids(conn, &dj_ids).await?;

    let producer_name = match event.producer_id {
        Some(id) => producer_db::get_producer(conn, id)
            .await?
            .map(|p| p.label())
            .unwrap_or_default(),
        None => String::new(),
    };

    let cache = Cents::from_f64(event.cache_value);
    let today = chrono::Utc::now().date_naive();

    let new_contracts = missing
        .iter()
        .map(|booking| {
            let dj_name = djs
                .get(&booking.dj_id)
                .map(profiles::Model::dj_display_name)
                .unwrap_or_default();
            let dj_cache = allocation(booking.fee, cache, bookings.len());
            let ctx = ContractContext {
                event_name: &event.event_name,
                event_date: event.event_date,
                location: event.location.as_deref().or(event.venue.as_deref()),
                city: event.city.as_deref(),
                cache_value: dj_cache,
                dj_name: &dj_name,
                producer_name: &producer_name,
                commission_rate: event.commission_rate.unwrap_or(default_commission_rate),
                today,
            };

            contract_db::NewContract {
                event_id: event.id,
                dj_id: booking.dj_id,
                producer_id: event.producer_id,
                cache_value: dj_cache.as_f64(),
                contract_content: contract_text::render(&template, &ctx),
            }
        })
        .collect();

    let created = contract_db::insert_contracts(conn, new_contracts).await?;
    debug!("Event {}: {} contract(s) generated", event.id, created);
    Ok(())
}
