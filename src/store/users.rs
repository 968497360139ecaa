use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use uuid::Uuid;

use crate::auth::identity::Identity;
use crate::error::AppError;
use crate::models::user::{Role, User};

#[derive(Default)]
pub struct UserStore {
    users: DashMap<Uuid, User>,
    by_external_id: DashMap<String, Uuid>,
}

/// Self-service profile edits. Role is deliberately absent.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves an authenticated identity to its user, creating a customer on first sight.
    pub fn get_or_create(&self, identity: &Identity) -> Result<User, AppError> {
        match self.by_external_id.entry(identity.uid.clone()) {
            Entry::Occupied(slot) => {
                let id = *slot.get();
                drop(slot);
                self.get(id).ok_or_else(|| {
                    AppError::Internal(format!("user index points at missing user {id}"))
                })
            }
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let (first_name, last_name) = split_display_name(identity.name.as_deref());
                let user = User {
                    id: Uuid::new_v4(),
                    external_id: identity.uid.clone(),
                    email: identity.email.clone(),
                    first_name,
                    last_name,
                    phone: None,
                    company: None,
                    role: Role::Customer,
                    created_at: now,
                    updated_at: now,
                };

                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                tracing::info!(user_id = %user.id, "user created on first sign-in");
                Ok(user)
            }
        }
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).map(|entry| entry.value().clone())
    }

    pub fn list(&self) -> Vec<User> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        users
    }

    pub fn set_role(&self, id: Uuid, role: Role) -> Result<User, AppError> {
        let mut user = self.entry_mut(id)?;
        user.role = role;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    pub fn update_profile(&self, id: Uuid, patch: ProfilePatch) -> Result<User, AppError> {
        let mut user = self.entry_mut(id)?;
        if let Some(first_name) = patch.first_name {
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = Some(last_name);
        }
        if let Some(phone) = patch.phone {
            user.phone = Some(phone);
        }
        if let Some(company) = patch.company {
            user.company = Some(company);
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Locks one user row. Callers must not hold it while taking another user lock.
    pub(crate) fn entry_mut(&self, id: Uuid) -> Result<RefMut<'_, Uuid, User>, AppError> {
        self.users
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

fn split_display_name(name: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return (None, None);
    };

    match name.split_once(' ') {
        Some((first, last)) => (Some(first.to_string()), Some(last.trim().to_string())),
        None => (Some(name.to_string()), None),
    }
}
