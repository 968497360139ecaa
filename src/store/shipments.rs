use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::engine::lifecycle::{apply_patch, TransitionPolicy};
use crate::engine::tracking_number;
use crate::error::AppError;
use crate::models::shipment::{Shipment, ShipmentPatch, ShipmentStatus};
use crate::models::tracking::{NewTrackingEvent, TrackingEvent};

const MAX_TRACKING_NUMBER_ATTEMPTS: usize = 8;

/// A shipment together with its tracking ledger, oldest row first.
pub(crate) struct ShipmentRecord {
    pub(crate) seq: u64,
    pub(crate) shipment: Shipment,
    pub(crate) history: Vec<TrackingEvent>,
}

#[derive(Default)]
pub struct ShipmentStore {
    pub(crate) records: DashMap<Uuid, ShipmentRecord>,
    by_tracking_number: DashMap<String, Uuid>,
    next_seq: AtomicU64,
}

impl ShipmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a fresh tracking number for `shipment_id` through the unique index.
    pub fn reserve_tracking_number(
        &self,
        shipment_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        for attempt in 1..=MAX_TRACKING_NUMBER_ATTEMPTS {
            let candidate = tracking_number::generate(now);
            match self.by_tracking_number.entry(candidate) {
                Entry::Vacant(slot) => {
                    let number = slot.key().clone();
                    slot.insert(shipment_id);
                    return Ok(number);
                }
                Entry::Occupied(slot) => {
                    tracing::warn!(
                        tracking_number = %slot.key(),
                        attempt,
                        "tracking number collision; drawing another"
                    );
                }
            }
        }

        Err(AppError::Internal(format!(
            "could not allocate a unique tracking number after {MAX_TRACKING_NUMBER_ATTEMPTS} attempts"
        )))
    }

    /// Persists a new shipment with its seed ledger row in one step.
    pub fn insert(&self, shipment: Shipment, seed: NewTrackingEvent) -> (Shipment, TrackingEvent) {
        let mut record = ShipmentRecord {
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            shipment,
            history: Vec::with_capacity(4),
        };
        let event = record.append(seed);
        let shipment = record.shipment.clone();

        self.records.insert(shipment.id, record);
        (shipment, event)
    }

    pub fn get(&self, id: Uuid) -> Option<Shipment> {
        self.records.get(&id).map(|record| record.shipment.clone())
    }

    /// Public tracking lookup: the shipment and its ledger, newest row first.
    pub fn find_by_tracking_number(
        &self,
        tracking_number: &str,
    ) -> Option<(Shipment, Vec<TrackingEvent>)> {
        let id = *self.by_tracking_number.get(tracking_number)?.value();
        let record = self.records.get(&id)?;
        let history = record.history.iter().rev().cloned().collect();
        Some((record.shipment.clone(), history))
    }

    /// Newest first. `customer` narrows the list to one owner.
    pub fn list(&self, customer: Option<Uuid>) -> Vec<Shipment> {
        let mut rows: Vec<(u64, Shipment)> = self
            .records
            .iter()
            .filter(|record| customer.is_none_or(|owner| record.shipment.customer_id == owner))
            .map(|record| (record.seq, record.shipment.clone()))
            .collect();

        rows.sort_by(|a, b| b.0.cmp(&a.0));
        rows.into_iter().map(|(_, shipment)| shipment).collect()
    }

    /// Applies a staff patch and, when the status changed, appends the ledger
    /// row while still holding the shipment's entry.
    pub fn update(
        &self,
        id: Uuid,
        patch: ShipmentPatch,
        policy: TransitionPolicy,
    ) -> Result<(Shipment, Option<TrackingEvent>), AppError> {
        let mut record = self
            .records
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Shipment not found".to_string()))?;

        let pending = apply_patch(&mut record.shipment, patch, policy, Utc::now())?;
        let event = pending.map(|new_event| record.append(new_event));

        Ok((record.shipment.clone(), event))
    }

    pub fn count_by_status(&self) -> HashMap<ShipmentStatus, usize> {
        let mut counts = HashMap::new();
        for record in self.records.iter() {
            *counts.entry(record.shipment.status).or_insert(0) += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::ShipmentStore;
    use crate::engine::lifecycle::{booking_event, TransitionPolicy, BOOKING_LOCATION};
    use crate::engine::tracking_number::is_well_formed;
    use crate::models::shipment::{PaymentStatus, Shipment, ShipmentPatch, ShipmentStatus};

    pub(crate) fn book(store: &ShipmentStore, customer_id: Uuid) -> Shipment {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let tracking_number = store.reserve_tracking_number(id, now).unwrap();
        let shipment = Shipment {
            id,
            tracking_number,
            customer_id,
            pickup_address: "4 Netaji Rd".to_string(),
            pickup_city: "Tiruppur".to_string(),
            pickup_state: "Tamil Nadu".to_string(),
            pickup_pincode: "641601".to_string(),
            pickup_contact_name: "Kavin".to_string(),
            pickup_contact_phone: "+91 90000 11111".to_string(),
            pickup_date: None,
            package_type: "garments".to_string(),
            weight: 8.0,
            dimensions: "50x40x30".to_string(),
            value: 1200.0,
            package_description: None,
            destination_country: "UAE".to_string(),
            destination_city: "Dubai".to_string(),
            destination_address: "Jebel Ali Free Zone".to_string(),
            recipient_name: "Omar".to_string(),
            recipient_phone: "+971 50 000 0000".to_string(),
            recipient_email: None,
            status: ShipmentStatus::Pending,
            current_location: None,
            current_hub: None,
            base_cost: 100.0,
            insurance_cost: 0.0,
            total_cost: 100.0,
            payment_status: PaymentStatus::Pending,
            has_insurance: false,
            documents: Vec::new(),
            estimated_delivery: None,
            created_at: now,
            updated_at: now,
        };
        store.insert(shipment, booking_event()).0
    }

    fn status(next: ShipmentStatus) -> ShipmentPatch {
        ShipmentPatch {
            status: Some(next),
            ..Default::default()
        }
    }

    #[test]
    fn insert_seeds_exactly_one_pending_row() {
        let store = ShipmentStore::new();
        let shipment = book(&store, Uuid::new_v4());

        assert!(is_well_formed(&shipment.tracking_number));
        let (_, history) = store
            .find_by_tracking_number(&shipment.tracking_number)
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, ShipmentStatus::Pending);
        assert_eq!(history[0].location, BOOKING_LOCATION);
    }

    #[test]
    fn ledger_grows_only_on_real_status_changes() {
        let store = ShipmentStore::new();
        let shipment = book(&store, Uuid::new_v4());
        let sequence = [
            ShipmentStatus::PickedUp,
            ShipmentStatus::PickedUp,
            ShipmentStatus::AtLocalHub,
            ShipmentStatus::AtLocalHub,
            ShipmentStatus::InTransit,
        ];

        let mut expected = 1;
        let mut previous = ShipmentStatus::Pending;
        for next in sequence {
            store
                .update(shipment.id, status(next), TransitionPolicy::Permissive)
                .unwrap();
            if next != previous {
                expected += 1;
            }
            previous = next;
        }

        let history = store.history(shipment.id).unwrap();
        assert_eq!(history.len(), expected);
        assert_eq!(history[0].status, ShipmentStatus::InTransit);
        assert_eq!(history.last().unwrap().status, ShipmentStatus::Pending);
        assert_eq!(store.get(shipment.id).unwrap().status, history[0].status);
    }

    #[test]
    fn list_is_newest_first_and_filters_by_owner() {
        let store = ShipmentStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let first = book(&store, alice);
        let _ = book(&store, bob);
        let third = book(&store, alice);

        let mine = store.list(Some(alice));
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].id, third.id);
        assert_eq!(mine[1].id, first.id);
        assert_eq!(store.list(None).len(), 3);
    }

    #[test]
    fn update_of_missing_shipment_is_not_found() {
        let store = ShipmentStore::new();
        let err = store
            .update(
                Uuid::new_v4(),
                status(ShipmentStatus::Delivered),
                TransitionPolicy::Permissive,
            )
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
    }
}
