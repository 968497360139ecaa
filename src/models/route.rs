use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: Uuid,
    pub delivery_partner_id: Uuid,
    pub shipment_id: Uuid,
    pub from_hub: Option<Uuid>,
    pub to_hub: Option<Uuid>,
    pub status: RouteStatus,
    pub estimated_distance_km: Option<f64>,
    pub estimated_minutes: Option<u32>,
    pub actual_distance_km: Option<f64>,
    pub actual_minutes: Option<u32>,
    pub earnings: f64,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePatch {
    pub status: Option<RouteStatus>,
    pub from_hub: Option<Uuid>,
    pub to_hub: Option<Uuid>,
    pub estimated_distance_km: Option<f64>,
    pub estimated_minutes: Option<u32>,
    pub actual_distance_km: Option<f64>,
    pub actual_minutes: Option<u32>,
    pub earnings: Option<f64>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}
