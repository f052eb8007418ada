//! Relay Hub
//!
//! Async WebSocket hub for realtime presence. Clients announce level
//! changes and positions; the hub keeps a roster of last-known
//! whereabouts and fans events out to clients sharing a level. It never
//! validates game assertions, it only routes them.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::time::interval;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::core::coord::{GridPos, LevelCoord};
use crate::relay::protocol::{ClientEvent, ClientId, PeerState, ServerEvent};

/// Hub configuration.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Bind address.
    pub bind_addr: SocketAddr,
    /// Maximum concurrent clients.
    pub max_clients: usize,
    /// Drop roster records silent for longer than this.
    pub idle_timeout: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".parse().unwrap(),
            max_clients: 256,
            idle_timeout: Duration::from_secs(300),
        }
    }
}

impl HubConfig {
    /// Build a config from the environment. `RELAY_BIND_ADDR` overrides
    /// the bind address; everything else keeps defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var("RELAY_BIND_ADDR") {
            match addr.parse() {
                Ok(addr) => config.bind_addr = addr,
                Err(_) => warn!("Ignoring unparseable RELAY_BIND_ADDR {:?}", addr),
            }
        }
        config
    }
}

/// Hub errors.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// Failed to bind to address.
    #[error("Failed to bind: {0}")]
    BindFailed(#[from] std::io::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

/// One connected client's roster record.
struct ClientRecord {
    /// Outbound event queue to this client's socket.
    sender: mpsc::Sender<ServerEvent>,
    /// Last announced level, `None` until the first `change_level`.
    level: Option<LevelCoord>,
    /// Last announced tile position.
    position: GridPos,
    /// Last announced facing.
    rotation: f32,
    /// Connection time.
    connected_at: Instant,
    /// Last inbound event.
    last_activity: Instant,
}

impl ClientRecord {
    fn peer_state(&self, id: ClientId) -> PeerState {
        PeerState {
            id,
            level: self.level,
            position: self.position,
            rotation: self.rotation,
        }
    }
}

type Roster = Arc<RwLock<BTreeMap<ClientId, ClientRecord>>>;

/// The relay hub.
pub struct RelayHub {
    /// Hub configuration.
    config: HubConfig,
    /// Connected clients.
    clients: Roster,
    /// Shutdown signal.
    shutdown_tx: broadcast::Sender<()>,
}

impl RelayHub {
    /// Create a new hub.
    pub fn new(config: HubConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            clients: Arc::new(RwLock::new(BTreeMap::new())),
            shutdown_tx,
        }
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn run(&self) -> Result<(), HubError> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!("Relay hub listening on {}", self.config.bind_addr);
        self.serve(listener).await
    }

    /// Serve an already-bound listener until shutdown. Callers that need
    /// the actual port can bind port 0 themselves and pass it in.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), HubError> {
        let sweep_clients = self.clients.clone();
        let idle_timeout = self.config.idle_timeout;
        let sweep_handle = tokio::spawn(async move {
            Self::run_sweep_loop(sweep_clients, idle_timeout).await;
        });

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            let connected = self.clients.read().await.len();
                            if connected >= self.config.max_clients {
                                warn!("Client limit reached, rejecting {}", addr);
                                continue;
                            }

                            info!("New connection from {}", addr);
                            self.handle_connection(stream, addr);
                        }
                        Err(e) => {
                            error!("Accept error: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        sweep_handle.abort();

        Ok(())
    }

    /// Handle a new WebSocket connection.
    fn handle_connection(&self, stream: TcpStream, addr: SocketAddr) {
        let clients = self.clients.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            let ws_stream = match accept_async(stream).await {
                Ok(ws) => ws,
                Err(e) => {
                    error!("WebSocket handshake failed for {}: {}", addr, e);
                    return;
                }
            };

            let id = ClientId::random();
            let (mut ws_sender, mut ws_receiver) = ws_stream.split();
            let (event_tx, mut event_rx) = mpsc::channel::<ServerEvent>(64);

            // Register before snapshotting so the roster includes self.
            {
                let mut clients = clients.write().await;
                clients.insert(
                    id,
                    ClientRecord {
                        sender: event_tx.clone(),
                        level: None,
                        position: GridPos::new(0, 0),
                        rotation: 0.0,
                        connected_at: Instant::now(),
                        last_activity: Instant::now(),
                    },
                );
            }

            // Spawn outbound sender task
            let sender_task = tokio::spawn(async move {
                while let Some(event) = event_rx.recv().await {
                    let text = match event.to_json() {
                        Ok(t) => t,
                        Err(e) => {
                            error!("Failed to serialize event: {}", e);
                            continue;
                        }
                    };
                    if ws_sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
            });

            // Hello plus current roster
            let _ = event_tx.send(ServerEvent::Connected { id }).await;
            let players = Self::roster_snapshot(&clients).await;
            let _ = event_tx.send(ServerEvent::Players { players }).await;

            // Handle incoming events
            loop {
                tokio::select! {
                    msg = ws_receiver.next() => {
                        match msg {
                            Some(Ok(Message::Text(text))) => {
                                let event = match ClientEvent::from_json(&text) {
                                    Ok(event) => event,
                                    Err(e) => {
                                        debug!("Invalid event from {}: {}", id, e);
                                        continue;
                                    }
                                };

                                // Update activity
                                {
                                    let mut clients = clients.write().await;
                                    if let Some(record) = clients.get_mut(&id) {
                                        record.last_activity = Instant::now();
                                    }
                                }

                                Self::handle_client_event(id, event, &clients).await;
                            }
                            Some(Ok(Message::Close(_))) | None => {
                                debug!("Client {} disconnected", id);
                                break;
                            }
                            Some(Err(e)) => {
                                error!("WebSocket error for {}: {}", id, e);
                                break;
                            }
                            _ => {}
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }

            // Cleanup
            sender_task.abort();

            let removed = {
                let mut clients = clients.write().await;
                clients.remove(&id)
            };

            // The idle sweep may have beaten us to the record; whoever
            // removes it owns the departure broadcast.
            if let Some(record) = removed {
                Self::broadcast_to_all(&clients, &ServerEvent::PlayerLeft { id }).await;
                info!(
                    "Client {} cleaned up after {:?}",
                    id,
                    record.connected_at.elapsed()
                );
            }
        });
    }

    /// Route one client event. Puzzle and door assertions are relayed
    /// as-is; peers apply them without re-validation.
    async fn handle_client_event(id: ClientId, event: ClientEvent, clients: &Roster) {
        match event {
            ClientEvent::ChangeLevel { level, position } => {
                let joined = {
                    let mut clients = clients.write().await;
                    match clients.get_mut(&id) {
                        Some(record) => {
                            record.level = Some(level);
                            record.position = position;
                            record.peer_state(id)
                        }
                        None => return,
                    }
                };

                debug!("Client {} entered level {:?}", id, level);
                Self::broadcast_to_level(
                    clients,
                    level,
                    id,
                    &ServerEvent::PlayerJoined { player: joined },
                )
                .await;
            }
            ClientEvent::UpdatePosition {
                position,
                rotation,
                level,
            } => {
                {
                    let mut clients = clients.write().await;
                    match clients.get_mut(&id) {
                        Some(record) => {
                            record.level = Some(level);
                            record.position = position;
                            record.rotation = rotation;
                        }
                        None => return,
                    }
                }

                Self::broadcast_to_level(
                    clients,
                    level,
                    id,
                    &ServerEvent::PlayerMoved {
                        id,
                        position,
                        rotation,
                    },
                )
                .await;
            }
            ClientEvent::CompletePuzzle { puzzle_id, level } => {
                debug!("Client {} asserted puzzle {} solved", id, puzzle_id);
                Self::broadcast_to_level(
                    clients,
                    level,
                    id,
                    &ServerEvent::PuzzleCompleted { puzzle_id, level },
                )
                .await;
            }
            ClientEvent::UnlockDoor { door_id, level } => {
                debug!("Client {} asserted door {} unlocked", id, door_id);
                Self::broadcast_to_level(
                    clients,
                    level,
                    id,
                    &ServerEvent::DoorUnlocked { door_id, level },
                )
                .await;
            }
            ClientEvent::SendChatMessage { message, level } => {
                Self::broadcast_to_level(
                    clients,
                    level,
                    id,
                    &ServerEvent::ChatMessage { from: id, message },
                )
                .await;
            }
        }
    }

    /// Snapshot every record as a wire roster entry.
    async fn roster_snapshot(clients: &Roster) -> Vec<PeerState> {
        let clients = clients.read().await;
        clients
            .iter()
            .map(|(id, record)| record.peer_state(*id))
            .collect()
    }

    /// Send an event to every client on `level` except `skip`.
    async fn broadcast_to_level(
        clients: &Roster,
        level: LevelCoord,
        skip: ClientId,
        event: &ServerEvent,
    ) {
        let targets: Vec<mpsc::Sender<ServerEvent>> = {
            let clients = clients.read().await;
            clients
                .iter()
                .filter(|(id, record)| **id != skip && record.level == Some(level))
                .map(|(_, record)| record.sender.clone())
                .collect()
        };

        for sender in targets {
            let _ = sender.send(event.clone()).await;
        }
    }

    /// Send an event to every connected client.
    async fn broadcast_to_all(clients: &Roster, event: &ServerEvent) {
        let targets: Vec<mpsc::Sender<ServerEvent>> = {
            let clients = clients.read().await;
            clients.values().map(|record| record.sender.clone()).collect()
        };

        for sender in targets {
            let _ = sender.send(event.clone()).await;
        }
    }

    /// Drop roster records whose connections have gone silent.
    async fn run_sweep_loop(clients: Roster, idle_timeout: Duration) {
        let mut interval = interval(Duration::from_secs(60));

        loop {
            interval.tick().await;

            let now = Instant::now();
            let to_remove: Vec<ClientId> = {
                let clients = clients.read().await;
                clients
                    .iter()
                    .filter(|(_, record)| now.duration_since(record.last_activity) > idle_timeout)
                    .map(|(id, _)| *id)
                    .collect()
            };

            for id in to_remove {
                let removed = {
                    let mut clients = clients.write().await;
                    clients.remove(&id)
                };

                if removed.is_some() {
                    info!("Removed idle client {}", id);
                    Self::broadcast_to_all(&clients, &ServerEvent::PlayerLeft { id }).await;
                }
            }
        }
    }

    /// Shutdown the hub.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Get active client count.
    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }
}
