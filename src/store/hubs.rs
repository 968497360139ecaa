use dashmap::DashMap;
use uuid::Uuid;

use crate::models::hub::Hub;

#[derive(Default)]
pub struct HubStore {
    hubs: DashMap<Uuid, Hub>,
}

impl HubStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, hub: Hub) -> Hub {
        self.hubs.insert(hub.id, hub.clone());
        hub
    }

    pub fn get(&self, id: Uuid) -> Option<Hub> {
        self.hubs.get(&id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.hubs.contains_key(&id)
    }

    pub fn list(&self) -> Vec<Hub> {
        let mut hubs: Vec<Hub> = self.hubs.iter().map(|entry| entry.value().clone()).collect();
        hubs.sort_by(|a, b| a.name.cmp(&b.name));
        hubs
    }

    pub fn len(&self) -> usize {
        self.hubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hubs.is_empty()
    }
}
