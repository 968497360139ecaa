use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::ticket::{SupportTicket, TicketPatch};

#[derive(Default)]
pub struct TicketStore {
    tickets: DashMap<Uuid, SupportTicket>,
}

impl TicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, ticket: SupportTicket) -> SupportTicket {
        self.tickets.insert(ticket.id, ticket.clone());
        ticket
    }

    /// Newest first. `owner` narrows the list to one user's tickets.
    pub fn list(&self, owner: Option<Uuid>) -> Vec<SupportTicket> {
        let mut tickets: Vec<SupportTicket> = self
            .tickets
            .iter()
            .filter(|entry| owner.is_none_or(|id| entry.user_id == id))
            .map(|entry| entry.value().clone())
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tickets
    }

    pub fn update(&self, id: Uuid, patch: TicketPatch) -> Result<SupportTicket, AppError> {
        let mut ticket = self
            .tickets
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Support ticket not found".to_string()))?;

        if let Some(subject) = patch.subject {
            ticket.subject = subject;
        }
        if let Some(description) = patch.description {
            ticket.description = description;
        }
        if let Some(status) = patch.status {
            ticket.status = status;
        }
        if let Some(priority) = patch.priority {
            ticket.priority = priority;
        }
        if let Some(assignee) = patch.assigned_to {
            ticket.assigned_to = Some(assignee);
        }
        ticket.updated_at = Utc::now();

        Ok(ticket.clone())
    }

    pub fn count_open(&self) -> usize {
        self.tickets
            .iter()
            .filter(|entry| entry.status.is_open())
            .count()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}
