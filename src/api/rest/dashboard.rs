use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Serialize;

use crate::auth::policy::{require_role, STAFF};
use crate::auth::Caller;
use crate::error::AppError;
use crate::models::shipment::ShipmentStatus;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/dashboard/stats", get(stats))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_shipments: usize,
    pub shipments_by_status: BTreeMap<&'static str, usize>,
    pub open_tickets: usize,
    pub active_partners: usize,
    pub hubs: usize,
}

async fn stats(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
) -> Result<Json<DashboardStats>, AppError> {
    require_role(&user, STAFF)?;

    let counts = state.shipments.count_by_status();
    let shipments_by_status = ShipmentStatus::ALL
        .iter()
        .map(|status| (status.as_str(), counts.get(status).copied().unwrap_or(0)))
        .collect();

    Ok(Json(DashboardStats {
        total_shipments: state.shipments.len(),
        shipments_by_status,
        open_tickets: state.tickets.count_open(),
        active_partners: state.partners.count_active(),
        hubs: state.hubs.len(),
    }))
}
