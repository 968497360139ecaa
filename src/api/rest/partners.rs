use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::rest::extract::{require_text, ValidJson, ValidPath};
use crate::auth::policy::{require, require_role, STAFF};
use crate::auth::Caller;
use crate::error::AppError;
use crate::models::partner::{DeliveryPartner, PartnerPatch, PartnerStatus, ShiftType};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/delivery-partners",
            get(list_partners).post(register_partner),
        )
        .route("/api/delivery-partners/me", get(my_profile))
        .route("/api/delivery-partners/:id", patch(update_partner))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPartnerRequest {
    pub vehicle_type: String,
    pub vehicle_number: String,
    pub license_number: String,
    pub shift_type: ShiftType,
    pub current_hub: Option<Uuid>,
}

async fn register_partner(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    ValidJson(payload): ValidJson<RegisterPartnerRequest>,
) -> Result<(StatusCode, Json<DeliveryPartner>), AppError> {
    require_text("vehicleType", &payload.vehicle_type)?;
    require_text("vehicleNumber", &payload.vehicle_number)?;
    require_text("licenseNumber", &payload.license_number)?;
    if let Some(hub) = payload.current_hub {
        if !state.hubs.contains(hub) {
            return Err(AppError::BadRequest(format!("unknown hub {hub}")));
        }
    }

    let now = Utc::now();
    let profile = DeliveryPartner {
        id: Uuid::new_v4(),
        user_id: user.id,
        vehicle_type: payload.vehicle_type,
        vehicle_number: payload.vehicle_number,
        license_number: payload.license_number,
        shift_type: payload.shift_type,
        status: PartnerStatus::Pending,
        performance_score: 0.0,
        total_deliveries: 0,
        total_earnings: 0.0,
        current_hub: payload.current_hub,
        created_at: now,
        updated_at: now,
    };

    let (partner, _promoted) = state.partners.register(&state.users, profile)?;
    state.metrics.partners_registered_total.inc();
    tracing::info!(partner_id = %partner.id, user_id = %user.id, "delivery partner registered");

    Ok((StatusCode::CREATED, Json(partner)))
}

async fn list_partners(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
) -> Result<Json<Vec<DeliveryPartner>>, AppError> {
    require_role(&user, STAFF)?;
    Ok(Json(state.partners.list()))
}

async fn my_profile(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
) -> Result<Json<DeliveryPartner>, AppError> {
    state
        .partners
        .find_by_user(user.id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Delivery partner profile not found".to_string()))
}

async fn update_partner(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(patch): ValidJson<PartnerPatch>,
) -> Result<Json<DeliveryPartner>, AppError> {
    let existing = state
        .partners
        .get(id)
        .ok_or_else(|| AppError::NotFound("Delivery partner not found".to_string()))?;
    require(&user, Some(existing.user_id), STAFF)?;

    let updated = state.partners.update(id, patch)?;
    Ok(Json(updated))
}
