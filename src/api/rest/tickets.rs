use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::rest::extract::{require_text, ValidJson, ValidPath};
use crate::api::rest::shipments::load_readable;
use crate::auth::policy::{require_role, STAFF};
use crate::auth::Caller;
use crate::error::AppError;
use crate::models::ticket::{SupportTicket, TicketPatch, TicketPriority, TicketStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/support-tickets",
            get(list_tickets).post(create_ticket),
        )
        .route("/api/support-tickets/:id", patch(update_ticket))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub shipment_id: Option<Uuid>,
    pub subject: String,
    pub description: String,
    #[serde(default)]
    pub priority: TicketPriority,
}

async fn create_ticket(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    ValidJson(payload): ValidJson<CreateTicketRequest>,
) -> Result<(StatusCode, Json<SupportTicket>), AppError> {
    require_text("subject", &payload.subject)?;
    require_text("description", &payload.description)?;
    if let Some(shipment_id) = payload.shipment_id {
        load_readable(&state, &user, shipment_id)?;
    }

    let now = Utc::now();
    let ticket = state.tickets.insert(SupportTicket {
        id: Uuid::new_v4(),
        user_id: user.id,
        shipment_id: payload.shipment_id,
        subject: payload.subject,
        description: payload.description,
        status: TicketStatus::Open,
        priority: payload.priority,
        assigned_to: None,
        created_at: now,
        updated_at: now,
    });

    state
        .metrics
        .open_support_tickets
        .set(state.tickets.count_open() as i64);
    tracing::info!(ticket_id = %ticket.id, user_id = %user.id, priority = ?ticket.priority, "support ticket opened");

    Ok((StatusCode::CREATED, Json(ticket)))
}

async fn list_tickets(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
) -> Json<Vec<SupportTicket>> {
    let owner = if user.role.is_staff() {
        None
    } else {
        Some(user.id)
    };
    Json(state.tickets.list(owner))
}

async fn update_ticket(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(patch): ValidJson<TicketPatch>,
) -> Result<Json<SupportTicket>, AppError> {
    require_role(&user, STAFF)?;

    let ticket = state.tickets.update(id, patch)?;
    state
        .metrics
        .open_support_tickets
        .set(state.tickets.count_open() as i64);

    Ok(Json(ticket))
}
