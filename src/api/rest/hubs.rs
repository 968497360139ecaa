use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::rest::extract::{require_text, ValidJson, ValidPath};
use crate::auth::policy::{require_role, ADMIN_ONLY};
use crate::auth::Caller;
use crate::error::AppError;
use crate::models::hub::{Hub, HubStatus, HubType};
use crate::models::GeoPoint;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/hubs", get(list_hubs).post(create_hub))
        .route("/api/hubs/:id", get(get_hub))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHubRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub hub_type: HubType,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub location: Option<GeoPoint>,
    pub capacity: u32,
    #[serde(default)]
    pub current_load: u32,
    pub status: Option<HubStatus>,
}

impl CreateHubRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_text("name", &self.name)?;
        require_text("address", &self.address)?;
        require_text("city", &self.city)?;
        require_text("state", &self.state)?;
        require_text("pincode", &self.pincode)?;

        if self.capacity == 0 {
            return Err(AppError::BadRequest("capacity must be > 0".to_string()));
        }
        if self.current_load > self.capacity {
            return Err(AppError::BadRequest(
                "currentLoad cannot exceed capacity".to_string(),
            ));
        }
        if let Some(point) = &self.location {
            if !(-90.0..=90.0).contains(&point.lat) || !(-180.0..=180.0).contains(&point.lng) {
                return Err(AppError::BadRequest("location is out of range".to_string()));
            }
        }

        Ok(())
    }
}

async fn create_hub(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    ValidJson(payload): ValidJson<CreateHubRequest>,
) -> Result<(StatusCode, Json<Hub>), AppError> {
    require_role(&user, ADMIN_ONLY)?;
    payload.validate()?;

    let hub = state.hubs.insert(Hub {
        id: Uuid::new_v4(),
        name: payload.name,
        hub_type: payload.hub_type,
        address: payload.address,
        city: payload.city,
        state: payload.state,
        pincode: payload.pincode,
        location: payload.location,
        capacity: payload.capacity,
        current_load: payload.current_load,
        status: payload.status.unwrap_or(HubStatus::Active),
        created_at: Utc::now(),
    });

    tracing::info!(hub_id = %hub.id, name = %hub.name, hub_type = ?hub.hub_type, "hub created");
    Ok((StatusCode::CREATED, Json(hub)))
}

async fn list_hubs(State(state): State<Arc<AppState>>, Caller(_user): Caller) -> Json<Vec<Hub>> {
    Json(state.hubs.list())
}

async fn get_hub(
    State(state): State<Arc<AppState>>,
    Caller(_user): Caller,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<Hub>, AppError> {
    state
        .hubs
        .get(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Hub not found".to_string()))
}
