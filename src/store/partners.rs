use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::partner::{DeliveryPartner, PartnerPatch, PartnerStatus};
use crate::models::user::{Role, User};
use crate::store::users::UserStore;

#[derive(Default)]
pub struct PartnerStore {
    partners: DashMap<Uuid, DeliveryPartner>,
    by_user: DashMap<Uuid, Uuid>,
}

impl PartnerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the partner profile and promotes its owner to `delivery_partner`.
    ///
    /// The owner's user row stays locked for the whole operation, so a second
    /// registration for the same user either waits and then conflicts, or
    /// never sees a half-written state.
    pub fn register(
        &self,
        users: &UserStore,
        partner: DeliveryPartner,
    ) -> Result<(DeliveryPartner, User), AppError> {
        let mut user = users.entry_mut(partner.user_id)?;

        match self.by_user.entry(partner.user_id) {
            Entry::Occupied(_) => Err(AppError::Conflict(
                "Delivery partner profile already exists".to_string(),
            )),
            Entry::Vacant(slot) => {
                self.partners.insert(partner.id, partner.clone());
                slot.insert(partner.id);

                user.role = Role::DeliveryPartner;
                user.updated_at = Utc::now();
                Ok((partner, user.clone()))
            }
        }
    }

    pub fn get(&self, id: Uuid) -> Option<DeliveryPartner> {
        self.partners.get(&id).map(|entry| entry.value().clone())
    }

    pub fn find_by_user(&self, user_id: Uuid) -> Option<DeliveryPartner> {
        let id = *self.by_user.get(&user_id)?.value();
        self.get(id)
    }

    pub fn list(&self) -> Vec<DeliveryPartner> {
        let mut partners: Vec<DeliveryPartner> = self
            .partners
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        partners.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        partners
    }

    pub fn update(&self, id: Uuid, patch: PartnerPatch) -> Result<DeliveryPartner, AppError> {
        let mut partner = self
            .partners
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Delivery partner not found".to_string()))?;

        if let Some(vehicle_type) = patch.vehicle_type {
            partner.vehicle_type = vehicle_type;
        }
        if let Some(vehicle_number) = patch.vehicle_number {
            partner.vehicle_number = vehicle_number;
        }
        if let Some(license_number) = patch.license_number {
            partner.license_number = license_number;
        }
        if let Some(shift_type) = patch.shift_type {
            partner.shift_type = shift_type;
        }
        if let Some(status) = patch.status {
            partner.status = status;
        }
        if let Some(score) = patch.performance_score {
            partner.performance_score = score;
        }
        if let Some(deliveries) = patch.total_deliveries {
            partner.total_deliveries = deliveries;
        }
        if let Some(earnings) = patch.total_earnings {
            partner.total_earnings = earnings;
        }
        if let Some(hub) = patch.current_hub {
            partner.current_hub = Some(hub);
        }
        partner.updated_at = Utc::now();

        Ok(partner.clone())
    }

    pub fn count_active(&self) -> usize {
        self.partners
            .iter()
            .filter(|entry| entry.status == PartnerStatus::Active)
            .count()
    }

    pub fn len(&self) -> usize {
        self.partners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::PartnerStore;
    use crate::auth::identity::Identity;
    use crate::models::partner::{DeliveryPartner, PartnerStatus, ShiftType};
    use crate::models::user::Role;
    use crate::store::users::UserStore;

    fn profile(user_id: Uuid) -> DeliveryPartner {
        let now = Utc::now();
        DeliveryPartner {
            id: Uuid::new_v4(),
            user_id,
            vehicle_type: "bike".to_string(),
            vehicle_number: "TN 59 AB 1234".to_string(),
            license_number: "TN5920200001234".to_string(),
            shift_type: ShiftType::Morning,
            status: PartnerStatus::Pending,
            performance_score: 0.0,
            total_deliveries: 0,
            total_earnings: 0.0,
            current_hub: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn second_registration_conflicts_and_keeps_first_profile() {
        let users = UserStore::new();
        let partners = PartnerStore::new();
        let user = users
            .get_or_create(&Identity {
                uid: "rider-1".to_string(),
                email: None,
                name: None,
            })
            .unwrap();

        let (first, promoted) = partners.register(&users, profile(user.id)).unwrap();
        assert_eq!(promoted.role, Role::DeliveryPartner);

        let err = partners.register(&users, profile(user.id)).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::CONFLICT);
        assert_eq!(partners.len(), 1);
        assert_eq!(partners.find_by_user(user.id).unwrap().id, first.id);
    }

    #[test]
    fn registration_for_unknown_user_writes_nothing() {
        let users = UserStore::new();
        let partners = PartnerStore::new();

        assert!(partners.register(&users, profile(Uuid::new_v4())).is_err());
        assert!(partners.is_empty());
    }
}
