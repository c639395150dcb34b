use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::authorization::Caller;
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{QueryCache, keys};
use crate::config::AppConfig;
use crate::db::{events as event_db, payments as payment_db};
use crate::error::ApiError;
use crate::finance::{self, FinancialRecord, FinancialStats};
use crate::handlers::read;

/// Upper bound for events pulled into an events summary.
const EVENTS_SUMMARY_LIMIT: u64 = 10_000;

/// GET /api/finance/summary — totals over the payments the caller can see.
pub async fn summary(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    cache: web::Data<QueryCache>,
) -> Result<HttpResponse, ApiError> {
    let caller = Caller::resolve(db.get_ref(), user.0).await?;
    let key = keys::finance_summary(caller.id());
    let visibility = caller.visibility();
    let (db, config) = (db.get_ref(), config.get_ref());

    let stats: FinancialStats = cache
        .get_or_load(&key, config.cache.finance_ttl, || async move {
            let event_ids = read(config, "list visible events", || {
                event_db::visible_event_ids(db, &visibility)
            })
            .await?;
            let payments = read(config, "list payments", || {
                payment_db::list_payments(db, event_ids.clone())
            })
            .await?;

            let ids: Vec<_> = payments.iter().map(|p| p.event_id).collect();
            let events = read(config, "load payment events", || {
                event_db::get_events_by_ids(db, &ids)
            })
            .await?;

            let records: Vec<FinancialRecord> = payments
                .iter()
                .map(|p| FinancialRecord::from_payment(p, events.get(&p.event_id)))
                .collect();
            Ok::<_, ApiError>(finance::aggregate(&records))
        })
        .await?;

    Ok(HttpResponse::Ok().json(stats))
}

/// GET /api/finance/events-summary — totals over event cache values and payment status.
pub async fn events_summary(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    cache: web::Data<QueryCache>,
) -> Result<HttpResponse, ApiError> {
    let caller = Caller::resolve(db.get_ref(), user.0).await?;
    let key = keys::events_summary(caller.id());
    let visibility = caller.visibility();
    let (db, config) = (db.get_ref(), config.get_ref());

    let stats: FinancialStats = cache
        .get_or_load(&key, config.cache.finance_ttl, || async move {
            let events = read(config, "list events", || {
                event_db::list_events(db, &visibility, EVENTS_SUMMARY_LIMIT)
            })
            .await?;

            let records: Vec<FinancialRecord> =
                events.iter().map(FinancialRecord::from_event).collect();
            Ok::<_, ApiError>(finance::aggregate(&records))
        })
        .await?;

    Ok(HttpResponse::Ok().json(stats))
}

/// POST /api/finance/aggregate — aggregate any list of loosely shaped records.
pub async fn aggregate(
    _user: AuthenticatedUser,
    body: web::Json<Vec<FinancialRecord>>,
) -> HttpResponse {
    HttpResponse::Ok().json(finance::aggregate(body.iter()))
}
