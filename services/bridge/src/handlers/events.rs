use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::broadcast;

use crate::state::AppState;

// ── GET /ws/events ───────────────────────────────────────────────────────────

/// Upgrades to a WebSocket and streams every fan-out message to the client.
pub async fn events_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let rx = state.events.subscribe();
    ws.on_upgrade(move |socket| stream_events(socket, rx))
}

async fn stream_events(mut socket: WebSocket, mut rx: broadcast::Receiver<String>) {
    loop {
        tokio::select! {
            published = rx.recv() => match published {
                Ok(text) => {
                    if socket.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Lossy fan-out: slow clients miss messages instead of
                    // applying backpressure to publishers.
                    tracing::debug!(skipped, "events subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            inbound = socket.recv() => match inbound {
                // Clients only listen on this socket; ignore their frames.
                Some(Ok(_)) => {}
                Some(Err(_)) | None => break,
            },
        }
    }
}
