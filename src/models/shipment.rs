use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    Pending,
    PickedUp,
    AtLocalHub,
    AtRegionalHub,
    AtPort,
    InTransit,
    CustomsClearance,
    Delivered,
    Cancelled,
}

impl ShipmentStatus {
    pub const ALL: [ShipmentStatus; 9] = [
        ShipmentStatus::Pending,
        ShipmentStatus::PickedUp,
        ShipmentStatus::AtLocalHub,
        ShipmentStatus::AtRegionalHub,
        ShipmentStatus::AtPort,
        ShipmentStatus::InTransit,
        ShipmentStatus::CustomsClearance,
        ShipmentStatus::Delivered,
        ShipmentStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "pending",
            ShipmentStatus::PickedUp => "picked_up",
            ShipmentStatus::AtLocalHub => "at_local_hub",
            ShipmentStatus::AtRegionalHub => "at_regional_hub",
            ShipmentStatus::AtPort => "at_port",
            ShipmentStatus::InTransit => "in_transit",
            ShipmentStatus::CustomsClearance => "customs_clearance",
            ShipmentStatus::Delivered => "delivered",
            ShipmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ShipmentStatus::Delivered | ShipmentStatus::Cancelled)
    }

    /// Position along the forward delivery path. `Cancelled` sits off the path.
    pub fn stage(self) -> Option<usize> {
        match self {
            ShipmentStatus::Cancelled => None,
            other => Self::ALL.iter().position(|s| *s == other),
        }
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: Uuid,
    pub tracking_number: String,
    pub customer_id: Uuid,

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

    pub status: ShipmentStatus,
    pub current_location: Option<String>,
    pub current_hub: Option<Uuid>,

    pub base_cost: f64,
    pub insurance_cost: f64,
    pub total_cost: f64,
    pub payment_status: PaymentStatus,
    pub has_insurance: bool,

    pub documents: Vec<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Staff-side field patch. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentPatch {
    pub status: Option<ShipmentStatus>,
    pub current_location: Option<String>,
    pub current_hub: Option<Uuid>,
    pub pickup_date: Option<DateTime<Utc>>,
    pub estimated_delivery: Option<DateTime<Utc>>,

    pub weight: Option<f64>,
    pub dimensions: Option<String>,
    pub value: Option<f64>,
    pub package_description: Option<String>,

    pub destination_address: Option<String>,
    pub recipient_name: Option<String>,
    pub recipient_phone: Option<String>,
    pub recipient_email: Option<String>,

    pub base_cost: Option<f64>,
    pub insurance_cost: Option<f64>,
    pub total_cost: Option<f64>,
    pub payment_status: Option<PaymentStatus>,
    pub has_insurance: Option<bool>,
    pub documents: Option<Vec<String>>,

    /// Coordinates recorded on the tracking row when the status changes.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
