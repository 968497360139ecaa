use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::rest::extract::{require_non_negative, ValidJson, ValidPath};
use crate::auth::policy::{require_role, STAFF};
use crate::auth::Caller;
use crate::error::AppError;
use crate::geo::haversine_km;
use crate::models::route::{Route, RoutePatch, RouteStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/routes", get(list_routes).post(create_route))
        .route("/api/routes/:id", patch(update_route))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRouteRequest {
    pub delivery_partner_id: Uuid,
    pub shipment_id: Uuid,
    pub from_hub: Option<Uuid>,
    pub to_hub: Option<Uuid>,
    pub estimated_distance_km: Option<f64>,
    pub estimated_minutes: Option<u32>,
    #[serde(default)]
    pub earnings: f64,
}

async fn create_route(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    ValidJson(payload): ValidJson<CreateRouteRequest>,
) -> Result<(StatusCode, Json<Route>), AppError> {
    require_role(&user, STAFF)?;
    require_non_negative("earnings", payload.earnings)?;

    if state.partners.get(payload.delivery_partner_id).is_none() {
        return Err(AppError::BadRequest(format!(
            "unknown delivery partner {}",
            payload.delivery_partner_id
        )));
    }
    if state.shipments.get(payload.shipment_id).is_none() {
        return Err(AppError::BadRequest(format!(
            "unknown shipment {}",
            payload.shipment_id
        )));
    }

    let from = payload.from_hub.map(|id| lookup_hub(&state, id)).transpose()?;
    let to = payload.to_hub.map(|id| lookup_hub(&state, id)).transpose()?;

    // Straight-line estimate when both legs are geolocated hubs.
    let estimated_distance_km = payload.estimated_distance_km.or_else(|| {
        let a = from.as_ref()?.location?;
        let b = to.as_ref()?.location?;
        Some(haversine_km(&a, &b))
    });

    let now = Utc::now();
    let route = state.routes.insert(Route {
        id: Uuid::new_v4(),
        delivery_partner_id: payload.delivery_partner_id,
        shipment_id: payload.shipment_id,
        from_hub: payload.from_hub,
        to_hub: payload.to_hub,
        status: RouteStatus::Assigned,
        estimated_distance_km,
        estimated_minutes: payload.estimated_minutes,
        actual_distance_km: None,
        actual_minutes: None,
        earnings: payload.earnings,
        started_at: None,
        completed_at: None,
        created_at: now,
        updated_at: now,
    });

    tracing::info!(
        route_id = %route.id,
        partner_id = %route.delivery_partner_id,
        shipment_id = %route.shipment_id,
        "route assigned"
    );
    Ok((StatusCode::CREATED, Json(route)))
}

/// Staff see every route; anyone else only the routes of their own partner profile.
async fn list_routes(State(state): State<Arc<AppState>>, Caller(user): Caller) -> Json<Vec<Route>> {
    if user.role.is_staff() {
        return Json(state.routes.list(None));
    }

    match state.partners.find_by_user(user.id) {
        Some(partner) => Json(state.routes.list(Some(partner.id))),
        None => Json(Vec::new()),
    }
}

async fn update_route(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(patch): ValidJson<RoutePatch>,
) -> Result<Json<Route>, AppError> {
    require_role(&user, STAFF)?;
    let route = state.routes.update(id, patch)?;
    Ok(Json(route))
}

fn lookup_hub(state: &AppState, id: Uuid) -> Result<crate::models::hub::Hub, AppError> {
    state
        .hubs
        .get(id)
        .ok_or_else(|| AppError::BadRequest(format!("unknown hub {id}")))
}
