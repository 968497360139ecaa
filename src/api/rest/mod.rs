pub mod ai;
pub mod dashboard;
pub mod extract;
pub mod hubs;
pub mod partners;
pub mod routes;
pub mod shipments;
pub mod tickets;
pub mod users;
pub mod ws;

use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// REST and websocket surface without a static site fallback.
pub fn router(state: Arc<AppState>) -> Router {
    api_router().with_state(state)
}

/// Full service router: the API plus the marketing site served from `static_dir`.
pub fn router_with_site(state: Arc<AppState>, static_dir: &Path) -> Router {
    api_router()
        .with_state(state)
        .fallback_service(ServeDir::new(static_dir))
}

fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(users::router())
        .merge(shipments::router())
        .merge(hubs::router())
        .merge(partners::router())
        .merge(routes::router())
        .merge(tickets::router())
        .merge(dashboard::router())
        .merge(ai::router())
        .route("/ws/tracking/:tracking_number", get(ws::ws_handler))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    users: usize,
    shipments: usize,
    hubs: usize,
    partners: usize,
    routes: usize,
    tickets: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        users: state.users.len(),
        shipments: state.shipments.len(),
        hubs: state.hubs.len(),
        partners: state.partners.len(),
        routes: state.routes.len(),
        tickets: state.tickets.len(),
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err).into_response(),
    }
}
