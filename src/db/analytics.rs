use futures_util::try_join;
use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;

use crate::db::{contracts, events, payments, profiles};
use crate::models::payments::PaymentStatus;
use crate::models::profiles::Roles;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCounts {
    pub total_djs: u64,
    pub total_contracts: u64,
    pub total_events: u64,
    pub total_payments: u64,
    pub pending_contracts: u64,
    pub pending_payments: u64,
}

/// Run the dashboard counts concurrently and merge once all have resolved.
pub async fn dashboard_counts(db: &DatabaseConnection) -> Result<DashboardCounts, DbErr> {
    let (total_djs, total_contracts, total_events, total_payments, pending_contracts, pending_payments) =
        try_join!(
            profiles::count_by_role(db, Roles::Dj),
            contracts::count_contracts(db),
            events::count_events(db),
            payments::count_payments(db),
            contracts::count_unsigned(db),
            payments::count_by_status(db, PaymentStatus::Pending),
        )?;

    Ok(DashboardCounts {
        total_djs,
        total_contracts,
        total_events,
        total_payments,
        pending_contracts,
        pending_payments,
    })
}
