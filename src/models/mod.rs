pub mod hub;
pub mod partner;
pub mod route;
pub mod shipment;
pub mod ticket;
pub mod tracking;
pub mod user;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}
