use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    Morning,
    Evening,
    Night,
    Flexible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerStatus {
    Pending,
    Approved,
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPartner {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vehicle_type: String,
    pub vehicle_number: String,
    pub license_number: String,
    pub shift_type: ShiftType,
    pub status: PartnerStatus,
    pub performance_score: f64,
    pub total_deliveries: u32,
    pub total_earnings: f64,
    pub current_hub: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerPatch {
    pub vehicle_type: Option<String>,
    pub vehicle_number: Option<String>,
    pub license_number: Option<String>,
    pub shift_type: Option<ShiftType>,
    pub status: Option<PartnerStatus>,
    pub performance_score: Option<f64>,
    pub total_deliveries: Option<u32>,
    pub total_earnings: Option<f64>,
    pub current_hub: Option<Uuid>,
}
