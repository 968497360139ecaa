use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HubType {
    Local,
    Regional,
    Port,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HubStatus {
    Active,
    Maintenance,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hub {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub hub_type: HubType,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub location: Option<GeoPoint>,
    pub capacity: u32,
    pub current_load: u32,
    pub status: HubStatus,
    pub created_at: DateTime<Utc>,
}
