use std::sync::Arc;

use axum::routing::post;
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::api::rest::extract::{require_text, ValidJson};
use crate::auth::Caller;
use crate::error::AppError;
use crate::state::AppState;

const CANNED_REPLY: &str = "Thanks for reaching out to Kutty Port. Our assistant is not available \
yet; track your shipment with its KP tracking number or open a support ticket and our team will help.";

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/ai/chat", post(chat))
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: &'static str,
}

/// Placeholder assistant: validates the message and answers with a fixed reply.
async fn chat(
    Caller(_user): Caller,
    ValidJson(payload): ValidJson<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    require_text("message", &payload.message)?;
    Ok(Json(ChatResponse {
        reply: CANNED_REPLY,
    }))
}
