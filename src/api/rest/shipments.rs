use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Json;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::rest::extract::{
    require_non_negative, require_text, ValidJson, ValidPath, ValidQuery,
};
use crate::auth::policy::{can_act, require_role, STAFF};
use crate::auth::Caller;
use crate::engine::lifecycle::booking_event;
use crate::error::AppError;
use crate::models::shipment::{PaymentStatus, Shipment, ShipmentPatch, ShipmentStatus};
use crate::models::tracking::TrackingEvent;
use crate::models::user::{Role, User};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: usize = 50;
const MAX_PAGE_SIZE: usize = 200;
const COST_TOLERANCE: f64 = 0.005;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/shipments", get(list_shipments).post(create_shipment))
        .route(
            "/api/shipments/tracking/:tracking_number",
            get(track_shipment),
        )
        .route(
            "/api/shipments/:id",
            get(get_shipment).patch(update_shipment),
        )
        .route("/api/shipments/:id/history", get(shipment_history))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipmentRequest {
    pub pickup_address: String,
    pub pickup_city: String,
    pub pickup_state: String,
    pub pickup_pincode: String,
    pub pickup_contact_name: String,
    pub pickup_contact_phone: String,
    pub pickup_date: Option<DateTime<Utc>>,

    pub package_type: String,
    pub weight: f64,
    pub dimensions: String,
    pub value: f64,
    pub package_description: Option<String>,

    pub destination_country: String,
    pub destination_city: String,
    pub destination_address: String,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub recipient_email: Option<String>,

    pub base_cost: f64,
    #[serde(default)]
    pub insurance_cost: f64,
    pub total_cost: Option<f64>,
    #[serde(default)]
    pub has_insurance: bool,
    #[serde(default)]
    pub documents: Vec<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
}

impl CreateShipmentRequest {
    fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("pickupAddress", &self.pickup_address),
            ("pickupCity", &self.pickup_city),
            ("pickupState", &self.pickup_state),
            ("pickupPincode", &self.pickup_pincode),
            ("pickupContactName", &self.pickup_contact_name),
            ("pickupContactPhone", &self.pickup_contact_phone),
            ("packageType", &self.package_type),
            ("dimensions", &self.dimensions),
            ("destinationCountry", &self.destination_country),
            ("destinationCity", &self.destination_city),
            ("destinationAddress", &self.destination_address),
            ("recipientName", &self.recipient_name),
            ("recipientPhone", &self.recipient_phone),
        ];
        for (field, value) in required {
            require_text(field, value)?;
        }

        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(AppError::BadRequest("weight must be > 0".to_string()));
        }
        require_non_negative("value", self.value)?;
        require_non_negative("baseCost", self.base_cost)?;
        require_non_negative("insuranceCost", self.insurance_cost)?;
        if let Some(total) = self.total_cost {
            require_non_negative("totalCost", total)?;
        }

        Ok(())
    }

    /// Client totals are trusted; a disagreement with the parts is only logged.
    fn resolve_total_cost(&self) -> f64 {
        let computed = self.base_cost + self.insurance_cost;
        match self.total_cost {
            Some(total) => {
                if (total - computed).abs() > COST_TOLERANCE {
                    warn!(
                        total_cost = total,
                        base_cost = self.base_cost,
                        insurance_cost = self.insurance_cost,
                        "client-supplied totalCost differs from baseCost + insuranceCost"
                    );
                }
                total
            }
            None => computed,
        }
    }
}

#[derive(Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Serialize)]
pub struct TrackingResponse {
    pub shipment: Shipment,
    pub history: Vec<TrackingEvent>,
}

async fn create_shipment(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    ValidJson(payload): ValidJson<CreateShipmentRequest>,
) -> Result<(StatusCode, Json<Shipment>), AppError> {
    payload.validate()?;

    let now = Utc::now();
    let id = Uuid::new_v4();
    let tracking_number = state.shipments.reserve_tracking_number(id, now)?;
    let total_cost = payload.resolve_total_cost();

    let shipment = Shipment {
        id,
        tracking_number,
        customer_id: user.id,
        pickup_address: payload.pickup_address,
        pickup_city: payload.pickup_city,
        pickup_state: payload.pickup_state,
        pickup_pincode: payload.pickup_pincode,
        pickup_contact_name: payload.pickup_contact_name,
        pickup_contact_phone: payload.pickup_contact_phone,
        pickup_date: payload.pickup_date,
        package_type: payload.package_type,
        weight: payload.weight,
        dimensions: payload.dimensions,
        value: payload.value,
        package_description: payload.package_description,
        destination_country: payload.destination_country,
        destination_city: payload.destination_city,
        destination_address: payload.destination_address,
        recipient_name: payload.recipient_name,
        recipient_phone: payload.recipient_phone,
        recipient_email: payload.recipient_email,
        status: ShipmentStatus::Pending,
        current_location: None,
        current_hub: None,
        base_cost: payload.base_cost,
        insurance_cost: payload.insurance_cost,
        total_cost,
        payment_status: PaymentStatus::Pending,
        has_insurance: payload.has_insurance,
        documents: payload.documents,
        estimated_delivery: payload.estimated_delivery,
        created_at: now,
        updated_at: now,
    };

    let (shipment, seed) = state.shipments.insert(shipment, booking_event());
    state.metrics.shipments_created_total.inc();
    state.publish_tracking(&shipment.tracking_number, seed);

    info!(
        shipment_id = %shipment.id,
        tracking_number = %shipment.tracking_number,
        customer_id = %user.id,
        "shipment booked"
    );

    Ok((StatusCode::CREATED, Json(shipment)))
}

async fn list_shipments(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    ValidQuery(params): ValidQuery<ListParams>,
) -> Json<Vec<Shipment>> {
    let owner = if user.role.is_staff() {
        None
    } else {
        Some(user.id)
    };

    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let page = state
        .shipments
        .list(owner)
        .into_iter()
        .skip(params.offset.unwrap_or(0))
        .take(limit)
        .collect();

    Json(page)
}

async fn get_shipment(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<Shipment>, AppError> {
    let shipment = load_readable(&state, &user, id)?;
    Ok(Json(shipment))
}

async fn track_shipment(
    State(state): State<Arc<AppState>>,
    ValidPath(tracking_number): ValidPath<String>,
) -> Result<Json<TrackingResponse>, AppError> {
    match state.shipments.find_by_tracking_number(&tracking_number) {
        Some((shipment, history)) => {
            state
                .metrics
                .tracking_lookups_total
                .with_label_values(&["found"])
                .inc();
            Ok(Json(TrackingResponse { shipment, history }))
        }
        None => {
            state
                .metrics
                .tracking_lookups_total
                .with_label_values(&["not_found"])
                .inc();
            Err(AppError::NotFound(
                "No shipment found for this tracking number".to_string(),
            ))
        }
    }
}

async fn shipment_history(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<Vec<TrackingEvent>>, AppError> {
    load_readable(&state, &user, id)?;
    Ok(Json(state.shipments.history(id)?))
}

async fn update_shipment(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(patch): ValidJson<ShipmentPatch>,
) -> Result<Json<Shipment>, AppError> {
    require_role(&user, STAFF)?;

    let (shipment, event) = state
        .shipments
        .update(id, patch, state.transition_policy)?;

    if let Some(event) = event {
        state
            .metrics
            .status_updates_total
            .with_label_values(&[event.status.as_str()])
            .inc();
        info!(
            shipment_id = %shipment.id,
            status = %event.status,
            location = %event.location,
            updated_by = %user.id,
            "shipment status changed"
        );
        state.publish_tracking(&shipment.tracking_number, event);
    }

    Ok(Json(shipment))
}

/// Customers read their own shipments, partners the ones routed to them, staff all.
pub(crate) fn load_readable(
    state: &AppState,
    caller: &User,
    id: Uuid,
) -> Result<Shipment, AppError> {
    let shipment = state
        .shipments
        .get(id)
        .ok_or_else(|| AppError::NotFound("Shipment not found".to_string()))?;

    if can_act(caller, Some(shipment.customer_id), STAFF) {
        return Ok(shipment);
    }

    let routed_to_caller = caller.role == Role::DeliveryPartner
        && state
            .partners
            .find_by_user(caller.id)
            .is_some_and(|partner| state.routes.is_assigned(partner.id, shipment.id));

    if routed_to_caller {
        Ok(shipment)
    } else {
        Err(AppError::Forbidden("Access denied".to_string()))
    }
}
