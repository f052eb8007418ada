//! Relay Client
//!
//! Owns one WebSocket connection to the relay hub. Inbound events queue
//! up until [`pump`] folds them into a [`WorldView`] and flushes the
//! view's queued outbound events back to the hub. A heartbeat task
//! keeps the player's pose flowing on a fixed cadence.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info};

use crate::client::view::WorldView;
use crate::relay::protocol::{ClientEvent, ServerEvent};

/// Cadence of position heartbeats, matching the update rate peers ease
/// their animations against.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(100);

/// Relay connection errors.
#[derive(Debug, Error)]
pub enum NetError {
    /// The WebSocket handshake or transport failed.
    #[error("Failed to connect: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),

    /// The connection is no longer accepting events.
    #[error("Connection closed")]
    Closed,
}

/// One live connection to the relay hub.
///
/// Reading and writing run on background tasks; the connection itself
/// is just the queues between them and the caller.
#[derive(Debug)]
pub struct RelayConnection {
    /// Outbound event queue feeding the writer task.
    sender: mpsc::Sender<ClientEvent>,
    /// Events read off the socket, waiting for a [`pump`].
    incoming: Arc<Mutex<Vec<ServerEvent>>>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl RelayConnection {
    /// Connect to the hub at `url` and start the socket tasks.
    pub async fn connect(url: &str) -> Result<Self, NetError> {
        let (socket, _) = connect_async(url).await?;
        info!("Connected to relay hub at {}", url);

        let (mut write, mut read) = socket.split();
        let incoming = Arc::new(Mutex::new(Vec::new()));
        let (tx, mut rx) = mpsc::channel::<ClientEvent>(64);

        let queue = Arc::clone(&incoming);
        let reader = tokio::spawn(async move {
            while let Some(message) = read.next().await {
                match message {
                    Ok(Message::Text(text)) => match ServerEvent::from_json(&text) {
                        Ok(event) => queue.lock().await.push(event),
                        Err(err) => debug!("Dropping unreadable hub frame: {}", err),
                    },
                    Ok(Message::Close(_)) | Err(_) => break,
                    _ => {}
                }
            }
            debug!("Relay read loop ended");
        });

        let writer = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if let Ok(text) = event.to_json() {
                    if write.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
            }
        });

        Ok(Self {
            sender: tx,
            incoming,
            reader,
            writer,
        })
    }

    /// Queue one event for the hub.
    pub async fn send(&self, event: ClientEvent) -> Result<(), NetError> {
        self.sender.send(event).await.map_err(|_| NetError::Closed)
    }

    /// Take everything the hub has sent since the last drain.
    pub async fn drain_incoming(&self) -> Vec<ServerEvent> {
        std::mem::take(&mut *self.incoming.lock().await)
    }

    /// Send the view's pose every [`HEARTBEAT_INTERVAL`] until the
    /// connection drops.
    pub fn spawn_heartbeat(&self, view: Arc<Mutex<WorldView>>) -> JoinHandle<()> {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let mut ticker = interval(HEARTBEAT_INTERVAL);
            loop {
                ticker.tick().await;
                let event = view.lock().await.heartbeat_event();
                if sender.send(event).await.is_err() {
                    break;
                }
            }
        })
    }

    /// Tear down the socket tasks. Queued events are dropped.
    pub fn close(&self) {
        self.reader.abort();
        self.writer.abort();
    }
}

/// Apply everything the hub sent, then flush everything the view queued.
///
/// Call this once per frame or poll cycle. Events apply in arrival
/// order, so the hello and roster land before anything that depends on
/// them.
pub async fn pump(conn: &RelayConnection, view: &Mutex<WorldView>) -> Result<(), NetError> {
    let events = conn.drain_incoming().await;
    let outbound = {
        let mut view = view.lock().await;
        for event in events {
            view.apply_server_event(event);
        }
        view.take_outbound()
    };
    for event in outbound {
        conn.send(event).await?;
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
