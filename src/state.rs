use std::sync::Arc;

use tokio::sync::broadcast;

use crate::auth::identity::IdentityProvider;
use crate::engine::lifecycle::TransitionPolicy;
use crate::models::tracking::{TrackingEvent, TrackingUpdate};
use crate::observability::metrics::Metrics;
use crate::store::{HubStore, PartnerStore, RouteStore, ShipmentStore, TicketStore, UserStore};

pub struct AppState {
    pub users: UserStore,
    pub hubs: HubStore,
    pub shipments: ShipmentStore,
    pub partners: PartnerStore,
    pub routes: RouteStore,
    pub tickets: TicketStore,
    pub identity: Arc<dyn IdentityProvider>,
    pub transition_policy: TransitionPolicy,
    pub tracking_events_tx: broadcast::Sender<TrackingUpdate>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        transition_policy: TransitionPolicy,
        event_buffer_size: usize,
    ) -> Self {
        let (tracking_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            users: UserStore::new(),
            hubs: HubStore::new(),
            shipments: ShipmentStore::new(),
            partners: PartnerStore::new(),
            routes: RouteStore::new(),
            tickets: TicketStore::new(),
            identity,
            transition_policy,
            tracking_events_tx,
            metrics: Metrics::new(),
        }
    }

    /// Fans a freshly appended ledger row out to live tracking subscribers.
    pub fn publish_tracking(&self, tracking_number: &str, event: TrackingEvent) {
        // No subscribers is the common case.
        let _ = self.tracking_events_tx.send(TrackingUpdate {
            tracking_number: tracking_number.to_string(),
            event,
        });
    }
}
