use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::route::{Route, RoutePatch};

#[derive(Default)]
pub struct RouteStore {
    routes: DashMap<Uuid, Route>,
}

impl RouteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, route: Route) -> Route {
        self.routes.insert(route.id, route.clone());
        route
    }

    /// Newest first. `partner` narrows the list to one delivery partner.
    pub fn list(&self, partner: Option<Uuid>) -> Vec<Route> {
        let mut routes: Vec<Route> = self
            .routes
            .iter()
            .filter(|entry| partner.is_none_or(|id| entry.delivery_partner_id == id))
            .map(|entry| entry.value().clone())
            .collect();
        routes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        routes
    }

    pub fn is_assigned(&self, partner_id: Uuid, shipment_id: Uuid) -> bool {
        self.routes.iter().any(|entry| {
            entry.delivery_partner_id == partner_id && entry.shipment_id == shipment_id
        })
    }

    pub fn update(&self, id: Uuid, patch: RoutePatch) -> Result<Route, AppError> {
        let mut route = self
            .routes
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Route not found".to_string()))?;

        if let Some(status) = patch.status {
            route.status = status;
        }
        if let Some(hub) = patch.from_hub {
            route.from_hub = Some(hub);
        }
        if let Some(hub) = patch.to_hub {
            route.to_hub = Some(hub);
        }
        if let Some(distance) = patch.estimated_distance_km {
            route.estimated_distance_km = Some(distance);
        }
        if let Some(minutes) = patch.estimated_minutes {
            route.estimated_minutes = Some(minutes);
        }
        if let Some(distance) = patch.actual_distance_km {
            route.actual_distance_km = Some(distance);
        }
        if let Some(minutes) = patch.actual_minutes {
            route.actual_minutes = Some(minutes);
        }
        if let Some(earnings) = patch.earnings {
            route.earnings = earnings;
        }
        if let Some(at) = patch.started_at {
            route.started_at = Some(at);
        }
        if let Some(at) = patch.completed_at {
            route.completed_at = Some(at);
        }
        route.updated_at = Utc::now();

        Ok(route.clone())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
