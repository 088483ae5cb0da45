//! WebSocket push channel.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use jobportal_core::push::{ClientEvent, ServerEvent};
use jobportal_core::Identity;
use tracing::{debug, info, warn};

use crate::auth::AuthUser;
use crate::rooms::{ConnectionId, RoomHub};
use crate::state::AppState;

/// WebSocket upgrade handler. The token is checked before upgrading.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, identity))
}

/// Handle individual WebSocket connection.
async fn handle_socket(socket: WebSocket, state: AppState, identity: Identity) {
    let (conn, mut rx) = state.rooms.connect().await;
    for room in identity.rooms() {
        state.rooms.join(conn, &room).await;
    }
    info!(connection = conn, identity = %identity.id, "WebSocket client connected");

    let (mut sender, mut receiver) = socket.split();

    // Forward queued events to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match event.to_frame() {
                Ok(json) => json,
                Err(e) => {
                    warn!(error = %e, "Cannot encode push event");
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                debug!("WebSocket send failed, client disconnected");
                break;
            }
        }
    });

    // Handle incoming messages from client
    let hub = state.rooms.clone();
    let caller = identity.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => handle_frame(&hub, conn, &caller, text.as_str()).await,
                Message::Close(_) => {
                    debug!("WebSocket client sent close frame");
                    break;
                }
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.rooms.disconnect(conn).await;
    info!(connection = conn, identity = %identity.id, "WebSocket client disconnected");
}

async fn handle_frame(hub: &RoomHub, conn: ConnectionId, identity: &Identity, frame: &str) {
    let reply = match ClientEvent::from_frame(frame) {
        Ok(ClientEvent::Join(room)) if identity.may_join(&room) => {
            hub.join(conn, &room).await;
            ServerEvent::Joined(room)
        }
        Ok(ClientEvent::Join(room)) => {
            warn!(identity = %identity.id, room = %room, "Refused room join");
            ServerEvent::Error(format!("not allowed to join room '{}'", room))
        }
        Err(e) => {
            debug!(error = %e, "Unrecognized client frame");
            ServerEvent::Error("unrecognized event".to_string())
        }
    };
    hub.send_to(conn, reply).await;
}
