//! In-memory repositories, one per entity.
//!
//! Each repository owns its maps and exposes only whole-entity operations, so
//! multi-step writes (shipment update plus ledger append, partner registration
//! plus role promotion) happen under a single entry lock.

pub mod hubs;
pub mod partners;
pub mod routes;
pub mod shipments;
pub mod tickets;
pub mod tracking;
pub mod users;

pub use hubs::HubStore;
pub use partners::PartnerStore;
pub use routes::RouteStore;
pub use shipments::ShipmentStore;
pub use tickets::TicketStore;
pub use users::UserStore;
