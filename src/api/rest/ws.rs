use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::SinkExt;
use futures::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{info, warn};

use crate::api::rest::extract::ValidPath;
use crate::state::AppState;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    ValidPath(tracking_number): ValidPath<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, tracking_number))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, tracking_number: String) {
    let (mut sender, mut receiver) = socket.split();

    // Lagged receivers just skip what they missed.
    let wanted = tracking_number.clone();
    let mut updates = Box::pin(
        BroadcastStream::new(state.tracking_events_tx.subscribe()).filter_map(move |result| {
            let update = result
                .ok()
                .filter(|update| update.tracking_number == wanted);
            futures::future::ready(update)
        }),
    );

    info!(tracking_number = %tracking_number, "tracking subscriber connected");

    let send_task = tokio::spawn(async move {
        while let Some(update) = updates.next().await {
            let json = match serde_json::to_string(&update.event) {
                Ok(json) => json,
                Err(err) => {
                    warn!(error = %err, "failed to serialize tracking event for ws");
                    continue;
                }
            };

            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(_msg)) = receiver.next().await {}
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    info!(tracking_number = %tracking_number, "tracking subscriber disconnected");
}
