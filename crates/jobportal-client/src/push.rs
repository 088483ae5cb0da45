//! Push channel client.
//!
//! Keeps one WebSocket open to the server, joins the caller's rooms after
//! every connect and forwards what arrives as [`PushUpdate`]s. Dropped
//! connections are retried with exponential backoff. Events sent while
//! disconnected are lost; the session refetches after reconnecting.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use jobportal_core::notification::model::Notification;
use jobportal_core::push::{ClientEvent, ServerEvent};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::error::ClientResult;

/// First reconnect delay.
pub const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
/// Upper bound on the reconnect delay.
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// What the push channel reports to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushUpdate {
    Connected,
    Notification(Notification),
    Disconnected,
}

/// Doubling reconnect delay with a cap.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            current: initial,
        }
    }

    /// The delay to wait now. Doubles the next one.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(INITIAL_BACKOFF, MAX_BACKOFF)
    }
}

/// Run the push channel in the background.
///
/// The task ends once the returned receiver is dropped, closing any open
/// connection.
pub fn spawn_push(url: String, rooms: Vec<String>) -> (mpsc::Receiver<PushUpdate>, JoinHandle<()>) {
    spawn_push_with_backoff(url, rooms, Backoff::default())
}

pub fn spawn_push_with_backoff(
    url: String,
    rooms: Vec<String>,
    mut backoff: Backoff,
) -> (mpsc::Receiver<PushUpdate>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(64);
    let handle = tokio::spawn(async move {
        loop {
            match run_connection(&url, &rooms, &tx, &mut backoff).await {
                Ok(()) => debug!("Push channel closed by server"),
                Err(e) => warn!(error = %e, "Push channel failed"),
            }
            if tx.send(PushUpdate::Disconnected).await.is_err() {
                return;
            }
            let delay = backoff.next_delay();
            info!(delay_ms = delay.as_millis() as u64, "Reconnecting push channel");
            tokio::time::sleep(delay).await;
            if tx.is_closed() {
                return;
            }
        }
    });
    (rx, handle)
}

async fn run_connection(
    url: &str,
    rooms: &[String],
    tx: &mpsc::Sender<PushUpdate>,
    backoff: &mut Backoff,
) -> ClientResult<()> {
    let (ws, _) = connect_async(url).await?;
    backoff.reset();
    let (mut sink, mut stream) = ws.split();

    for room in rooms {
        let frame = ClientEvent::Join(room.clone()).to_frame()?;
        sink.send(Message::text(frame)).await?;
    }
    if tx.send(PushUpdate::Connected).await.is_err() {
        return Ok(());
    }
    info!(rooms = ?rooms, "Push channel connected");

    loop {
        let msg = tokio::select! {
            msg = stream.next() => msg,
            _ = tx.closed() => {
                debug!("Push receiver dropped, closing channel");
                let _ = sink.close().await;
                return Ok(());
            }
        };
        let Some(msg) = msg else { break };
        let text = match msg? {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };
        match ServerEvent::from_frame(text.as_str()) {
            Ok(ServerEvent::Notification(n)) => {
                if tx.send(PushUpdate::Notification(n)).await.is_err() {
                    return Ok(());
                }
            }
            Ok(ServerEvent::Joined(room)) => debug!(room = %room, "Joined room"),
            Ok(ServerEvent::Error(message)) => warn!(message = %message, "Server refused request"),
            Err(e) => debug!(error = %e, "Ignoring unrecognized frame"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let mut backoff = Backoff::default();
        let delays: Vec<u64> = (0..7).map(|_| backoff.next_delay().as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 16, 30, 30]);

        backoff.reset();
        assert_eq!(backoff.next_delay(), INITIAL_BACKOFF);
    }

    #[tokio::test]
    async fn test_unreachable_server_reports_disconnect() {
        let (mut rx, handle) = spawn_push_with_backoff(
            "ws://127.0.0.1:1/ws".to_string(),
            vec!["u123".to_string()],
            Backoff::new(Duration::from_millis(10), Duration::from_millis(20)),
        );
        assert_eq!(rx.recv().await, Some(PushUpdate::Disconnected));
        assert_eq!(rx.recv().await, Some(PushUpdate::Disconnected));
        drop(rx);
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_dropping_receiver_closes_open_connection() {
        use jobportal_core::auth::issue_token;
        use jobportal_core::{Identity, Role};
        use jobportal_web::state::AppState;
        use jobportal_web::ServerConfig;

        let state = AppState::new(jobportal_db::memory_pool(), ServerConfig::new("push-secret"));
        let app = jobportal_web::create_router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let identity = Identity::new("u123", Role::Candidate).unwrap();
        let token = issue_token("push-secret", &identity, chrono::Duration::minutes(5)).unwrap();
        let (mut rx, handle) = spawn_push(
            format!("ws://{}/ws?token={}", addr, token),
            identity.rooms(),
        );
        assert_eq!(rx.recv().await, Some(PushUpdate::Connected));
        assert_eq!(state.rooms.connection_count().await, 1);

        drop(rx);
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("push task kept running after its receiver was dropped")
            .unwrap();

        for _ in 0..100 {
            if state.rooms.connection_count().await == 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("server still holds the connection");
    }
}
