use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::shipment::{Shipment, ShipmentPatch, ShipmentStatus};
use crate::models::tracking::NewTrackingEvent;

pub const BOOKING_LOCATION: &str = "Booking Confirmed";
pub const FALLBACK_LOCATION: &str = "In Transit";

/// Which status moves a staff update may make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPolicy {
    /// Any status may follow any other.
    Permissive,
    /// Forward along the delivery path only; terminal states are final.
    Strict,
}

impl std::str::FromStr for TransitionPolicy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "permissive" => Ok(TransitionPolicy::Permissive),
            "strict" => Ok(TransitionPolicy::Strict),
            other => Err(format!(
                "unknown transition policy {other:?}, expected permissive or strict"
            )),
        }
    }
}

pub fn check_transition(
    policy: TransitionPolicy,
    from: ShipmentStatus,
    to: ShipmentStatus,
) -> Result<(), AppError> {
    if from == to || policy == TransitionPolicy::Permissive {
        return Ok(());
    }

    if from.is_terminal() {
        return Err(AppError::BadRequest(format!(
            "shipment is already {from} and cannot move to {to}"
        )));
    }

    let allowed = match (from.stage(), to.stage()) {
        (_, None) => true,
        (Some(current), Some(next)) => next > current,
        (None, Some(_)) => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "invalid status transition from {from} to {to}"
        )))
    }
}

/// Seed row written alongside every new shipment.
pub fn booking_event() -> NewTrackingEvent {
    NewTrackingEvent {
        status: ShipmentStatus::Pending,
        location: BOOKING_LOCATION.to_string(),
        description: Some("Shipment booked".to_string()),
        latitude: None,
        longitude: None,
    }
}

/// Applies a staff patch in place and returns the ledger row to append when
/// the status actually changed. Nothing is mutated if the patch is rejected.
pub fn apply_patch(
    shipment: &mut Shipment,
    patch: ShipmentPatch,
    policy: TransitionPolicy,
    now: DateTime<Utc>,
) -> Result<Option<NewTrackingEvent>, AppError> {
    validate_patch(&patch)?;

    let status_change = match patch.status {
        Some(next) if next != shipment.status => {
            check_transition(policy, shipment.status, next)?;
            Some(next)
        }
        _ => None,
    };

    let event = status_change.map(|next| NewTrackingEvent {
        status: next,
        location: patch
            .current_location
            .clone()
            .or_else(|| shipment.current_location.clone())
            .unwrap_or_else(|| FALLBACK_LOCATION.to_string()),
        description: Some(format!("Status updated to {next}")),
        latitude: patch.latitude,
        longitude: patch.longitude,
    });

    if let Some(next) = status_change {
        shipment.status = next;
    }
    if let Some(location) = patch.current_location {
        shipment.current_location = Some(location);
    }
    if let Some(hub) = patch.current_hub {
        shipment.current_hub = Some(hub);
    }
    if let Some(date) = patch.pickup_date {
        shipment.pickup_date = Some(date);
    }
    if let Some(date) = patch.estimated_delivery {
        shipment.estimated_delivery = Some(date);
    }
    if let Some(weight) = patch.weight {
        shipment.weight = weight;
    }
    if let Some(dimensions) = patch.dimensions {
        shipment.dimensions = dimensions;
    }
    if let Some(value) = patch.value {
        shipment.value = value;
    }
    if let Some(description) = patch.package_description {
        shipment.package_description = Some(description);
    }
    if let Some(address) = patch.destination_address {
        shipment.destination_address = address;
    }
    if let Some(name) = patch.recipient_name {
        shipment.recipient_name = name;
    }
    if let Some(phone) = patch.recipient_phone {
        shipment.recipient_phone = phone;
    }
    if let Some(email) = patch.recipient_email {
        shipment.recipient_email = Some(email);
    }
    // Pricing fields are stored as sent; totals are not recomputed.
    if let Some(cost) = patch.base_cost {
        shipment.base_cost = cost;
    }
    if let Some(cost) = patch.insurance_cost {
        shipment.insurance_cost = cost;
    }
    if let Some(cost) = patch.total_cost {
        shipment.total_cost = cost;
    }
    if let Some(payment) = patch.payment_status {
        shipment.payment_status = payment;
    }
    if let Some(insured) = patch.has_insurance {
        shipment.has_insurance = insured;
    }
    if let Some(documents) = patch.documents {
        shipment.documents = documents;
    }

    shipment.updated_at = now;
    Ok(event)
}

fn validate_patch(patch: &ShipmentPatch) -> Result<(), AppError> {
    let amounts = [
        ("weight", patch.weight),
        ("value", patch.value),
        ("baseCost", patch.base_cost),
        ("insuranceCost", patch.insurance_cost),
        ("totalCost", patch.total_cost),
    ];

    for (field, amount) in amounts {
        if let Some(amount) = amount {
            if !amount.is_finite() || amount < 0.0 {
                return Err(AppError::BadRequest(format!(
                    "{field} must be a non-negative number"
                )));
            }
        }
    }

    Ok(())
}
