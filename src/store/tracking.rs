//! Tracking ledger operations. Rows live beside their shipment in
//! [`ShipmentStore`] and are only ever appended.

use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::tracking::{NewTrackingEvent, TrackingEvent};
use crate::store::shipments::{ShipmentRecord, ShipmentStore};

impl ShipmentRecord {
    pub(crate) fn append(&mut self, new_event: NewTrackingEvent) -> TrackingEvent {
        let event = TrackingEvent {
            id: Uuid::new_v4(),
            shipment_id: self.shipment.id,
            status: new_event.status,
            location: new_event.location,
            description: new_event.description,
            latitude: new_event.latitude,
            longitude: new_event.longitude,
            timestamp: Utc::now(),
        };
        self.history.push(event.clone());
        event
    }
}

impl ShipmentStore {
    /// All rows for a shipment, newest first.
    pub fn history(&self, shipment_id: Uuid) -> Result<Vec<TrackingEvent>, AppError> {
        let record = self
            .records
            .get(&shipment_id)
            .ok_or_else(|| AppError::NotFound("Shipment not found".to_string()))?;

        Ok(record.history.iter().rev().cloned().collect())
    }
}
