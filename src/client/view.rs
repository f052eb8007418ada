//! World View
//!
//! Client-side merge of three state sources: the session's own
//! authoritative state, the level currently on screen, and the presence
//! overlay mirrored from the relay hub. The view owns the lock state of
//! every exit it has seen plus the puzzle-to-door assignments driving
//! them; both maps are kept across level changes, which works because
//! door and puzzle ids embed their level coordinates.
//!
//! Nothing here talks to a socket. The view consumes [`ServerEvent`]s
//! handed to it and queues [`ClientEvent`]s for whoever owns the
//! connection to drain.

use std::collections::{BTreeMap, BTreeSet};
use std::f32::consts::{PI, TAU};
use std::mem;

use tracing::debug;

use crate::core::coord::{Direction, GridPos, LevelCoord, WorldPos};
use crate::puzzle::engine::CheckOutcome;
use crate::relay::protocol::{ClientEvent, ClientId, PeerState, ServerEvent};
use crate::session::store::SessionStore;
use crate::world::door::{DoorId, DoorKey};
use crate::world::generator::{self, GeneratedLevel};
use crate::world::template::Layout;
use crate::world::tile::{locked_display_code, Tile};

/// Smoothing factor applied to remote movement each animation tick.
const SMOOTHING: f32 = 0.1;

/// Line shown when movement runs into a locked exit.
pub const LOCKED_MESSAGE: &str = "This door is locked. Find a way to unlock it first.";

// =============================================================================
// PEER PRESENCE
// =============================================================================

/// One remote player as the scene tracks them.
///
/// Positions are doubled up: `position` is where the peer is drawn this
/// frame, `target_position` where their last update put them. Ticks pull
/// the former toward the latter.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerPresence {
    /// Level the peer last announced, if any.
    pub level: Option<LevelCoord>,
    /// Rendered position, eased between updates.
    pub position: WorldPos,
    /// Position from the peer's latest update.
    pub target_position: WorldPos,
    /// Rendered facing in radians.
    pub rotation: f32,
    /// Facing from the peer's latest update.
    pub target_rotation: f32,
    /// Handle shown over the peer's head.
    pub display_name: String,
}

impl PeerPresence {
    /// Presence snapped to a roster entry, with nothing left to animate.
    fn from_state(state: &PeerState) -> Self {
        let position = WorldPos::from(state.position);
        Self {
            level: state.level,
            position,
            target_position: position,
            rotation: state.rotation,
            target_rotation: state.rotation,
            display_name: state.id.display_name(),
        }
    }
}

/// One received chat line.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatLine {
    /// Sender's display handle.
    pub from: String,
    /// The line itself.
    pub message: String,
}

// =============================================================================
// EXIT CLASSIFICATION
// =============================================================================

/// What stepping onto a tile means for level flow.
#[derive(Debug, Clone, PartialEq)]
pub enum ExitOutcome {
    /// The tile is not a transition; movement proceeds normally.
    NotAnExit,
    /// The origin lobby portal. The embedding client opens the live feed.
    Portal,
    /// A locked exit, carrying the line to print.
    Locked(&'static str),
    /// An open exit to a neighboring level.
    Transition {
        /// Destination level.
        level: LevelCoord,
        /// Side of the destination the player comes in through.
        entry: Direction,
        /// Text to print while the level loads.
        message: String,
    },
}

/// Sector name printed in transition text for each exit side.
fn wing_name(side: Direction) -> &'static str {
    match side {
        Direction::Right => "East Wing",
        Direction::Left => "West Wing",
        Direction::Top => "North Datacenter",
        Direction::Bottom => "South Corridor",
    }
}

// =============================================================================
// WORLD VIEW
// =============================================================================

/// One player's merged view of the world.
#[derive(Debug)]
pub struct WorldView {
    store: SessionStore,
    self_id: Option<ClientId>,
    peers: BTreeMap<ClientId, PeerPresence>,
    level: GeneratedLevel,
    /// Lock state per exit id, across every level seen this session.
    locked_doors: BTreeMap<DoorId, bool>,
    /// Which puzzle guards which exit. Assigned lazily, never cleared.
    door_puzzle_map: BTreeMap<DoorId, String>,
    /// Puzzle completions asserted by peers. Kept out of the session's
    /// own record so a local solve still validates and pays out.
    remote_completions: BTreeSet<String>,
    chat_log: Vec<ChatLine>,
    notices: Vec<String>,
    outbound: Vec<ClientEvent>,
    player_rotation: f32,
}

impl WorldView {
    /// View over a fresh session, starting in the origin lobby.
    pub fn new() -> Self {
        Self::from_session(SessionStore::new())
    }

    /// View over an existing session, e.g. one restored from a save.
    ///
    /// The player stays wherever the session last put them; the level
    /// itself comes from the visited cache when it is there.
    pub fn from_session(store: SessionStore) -> Self {
        let mut view = Self {
            store,
            self_id: None,
            peers: BTreeMap::new(),
            level: generator::origin_level(),
            locked_doors: BTreeMap::new(),
            door_puzzle_map: BTreeMap::new(),
            remote_completions: BTreeSet::new(),
            chat_log: Vec::new(),
            notices: Vec::new(),
            outbound: Vec::new(),
            player_rotation: 0.0,
        };
        let coord = view.store.state().current_level;
        let position = view.store.state().player_position;
        view.level = view.store.generate_or_fetch_level(Direction::Bottom, coord);
        view.refresh_door_locks();
        view.outbound.push(ClientEvent::ChangeLevel {
            level: coord,
            position,
        });
        view
    }

    /// The session behind this view.
    pub fn session(&self) -> &SessionStore {
        &self.store
    }

    /// Mutable session access for endpoint dispatch.
    pub fn session_mut(&mut self) -> &mut SessionStore {
        &mut self.store
    }

    /// The level currently on screen.
    pub fn level(&self) -> &GeneratedLevel {
        &self.level
    }

    /// This client's hub-assigned id, once the hello has arrived.
    pub fn self_id(&self) -> Option<ClientId> {
        self.self_id
    }

    // -------------------------------------------------------------------------
    // Level flow
    // -------------------------------------------------------------------------

    /// Move the player to `coord`, entering through `entry`.
    ///
    /// Fetches or generates the level, re-derives exit locks, and
    /// announces the change to peers.
    pub fn enter_level(&mut self, coord: LevelCoord, entry: Direction) -> &GeneratedLevel {
        let level = self.store.generate_or_fetch_level(entry, coord);
        self.store.set_location(coord, level.entry_point);
        self.level = level;

        // Peers left mid-ease would glide across the new room from their
        // stale render position. Snap them to their targets instead.
        for peer in self.peers.values_mut() {
            peer.position = peer.target_position;
            peer.rotation = peer.target_rotation;
        }

        self.refresh_door_locks();
        self.outbound.push(ClientEvent::ChangeLevel {
            level: coord,
            position: self.store.state().player_position,
        });
        &self.level
    }

    /// Classify a step onto `cell` without changing any state.
    pub fn exit_transition(&self, cell: GridPos) -> ExitOutcome {
        let Some(tile) = self.tile_code(cell).and_then(Tile::from_code) else {
            return ExitOutcome::NotAnExit;
        };
        if tile == Tile::Portal {
            return ExitOutcome::Portal;
        }
        let Some(side) = tile.exit_side() else {
            return ExitOutcome::NotAnExit;
        };
        if self.is_exit_locked(cell) {
            return ExitOutcome::Locked(LOCKED_MESSAGE);
        }
        let coord = self.store.state().current_level;
        ExitOutcome::Transition {
            level: coord.step(side),
            entry: side.opposite(),
            message: format!(
                "Accessing {}...\nEstablishing connection...\nMapping network topology...",
                wing_name(side)
            ),
        }
    }

    /// Step onto `cell`, following the exit when it is open.
    pub fn step_through(&mut self, cell: GridPos) -> ExitOutcome {
        let outcome = self.exit_transition(cell);
        if let ExitOutcome::Transition { level, entry, .. } = &outcome {
            self.enter_level(*level, *entry);
        }
        outcome
    }

    // -------------------------------------------------------------------------
    // Doors and puzzles
    // -------------------------------------------------------------------------

    /// Whether the exit at `cell` is currently locked.
    pub fn is_exit_locked(&self, cell: GridPos) -> bool {
        let id = DoorId::exit(self.store.state().current_level, cell);
        self.locked_doors.get(&id).copied().unwrap_or(false)
    }

    /// Layout to render: base tile codes, with locked exits offset so
    /// the renderer draws them shut.
    pub fn display_layout(&self) -> Layout {
        let mut layout = self.level.layout;
        let coord = self.store.state().current_level;
        for (cell, _) in self.exit_cells() {
            let id = DoorId::exit(coord, cell);
            if self.locked_doors.get(&id).copied().unwrap_or(false) {
                let (z, x) = (cell.z as usize, cell.x as usize);
                layout[z][x] = locked_display_code(layout[z][x]);
            }
        }
        layout
    }

    /// Check a puzzle answer against the session's puzzle engine.
    ///
    /// A correct answer announces the completion to peers and, when the
    /// puzzle guards an exit, asserts that unlock too.
    pub fn check_puzzle(&mut self, kind: &str, puzzle_id: &str, answer: &str) -> CheckOutcome {
        let outcome = self.store.check_puzzle(kind, puzzle_id, answer);
        if outcome.correct {
            self.on_puzzle_solved(puzzle_id);
        }
        outcome
    }

    fn on_puzzle_solved(&mut self, puzzle_id: &str) {
        let coord = self.store.state().current_level;
        self.outbound.push(ClientEvent::CompletePuzzle {
            puzzle_id: puzzle_id.to_string(),
            level: coord,
        });
        let guarded = self
            .door_puzzle_map
            .iter()
            .find(|(_, id)| id.as_str() == puzzle_id)
            .map(|(door, _)| *door);
        if let Some(door) = guarded {
            self.outbound.push(ClientEvent::UnlockDoor {
                door_id: door.to_string(),
                level: coord,
            });
        }
        self.refresh_door_locks();
    }

    /// Run an admin-terminal command.
    ///
    /// Door changes in the response are folded into the lock overlay
    /// immediately, so a `unlock` takes effect on screen without waiting
    /// for the next level load.
    pub fn terminal_command(&mut self, command: &str) -> String {
        let (response, updates) = self.store.terminal_command(command);
        if let Some(updates) = updates {
            if updates.unlocked_doors.is_some() {
                self.refresh_door_locks();
                self.notices.push(
                    "Door security protocols bypassed. Access granted to restricted areas."
                        .to_string(),
                );
            }
        }
        response
    }

    /// Re-derive the lock state of every exit on the current level.
    ///
    /// Precedence per exit:
    /// 1. a session unlock for the side key or the exit's own cell opens it
    /// 2. a puzzle already mapped to the exit locks it until that puzzle
    ///    counts as completed
    /// 3. an exit seen for the first time gets a puzzle assigned and
    ///    starts locked
    ///
    /// Exits with an existing lock entry and no mapped puzzle keep their
    /// state, which is how peer-asserted unlocks survive.
    fn refresh_door_locks(&mut self) {
        let coord = self.store.state().current_level;
        for (cell, side) in self.exit_cells() {
            let exit_id = DoorId::exit(coord, cell);
            let side_key = DoorId::Cardinal(DoorKey::new(coord, side.door_side()));
            let cell_key = DoorId::Tile {
                x: cell.x,
                y: cell.z,
            };

            if self.store.is_door_unlocked(&side_key) || self.store.is_door_unlocked(&cell_key) {
                self.locked_doors.insert(exit_id, false);
            } else if let Some(puzzle_id) = self.door_puzzle_map.get(&exit_id) {
                let locked = !self.puzzle_completed(puzzle_id);
                self.locked_doors.insert(exit_id, locked);
            } else if !self.locked_doors.contains_key(&exit_id) {
                self.assign_puzzle_to_door(exit_id);
                self.locked_doors.insert(exit_id, true);
            }
        }
    }

    /// Map an exit to the first puzzle on the level not already guarding
    /// another door, falling back to the first puzzle when all are
    /// taken. Levels without puzzles leave the exit unmapped; only a
    /// terminal unlock can open those.
    fn assign_puzzle_to_door(&mut self, exit_id: DoorId) {
        let coord = self.store.state().current_level;
        let ids: Vec<String> = self
            .level
            .positions_of(Tile::Puzzle)
            .into_iter()
            .map(|cell| format!("puzzle_{}_{}_{}_{}", coord.x, coord.y, cell.x, cell.z))
            .collect();

        let pick = ids
            .iter()
            .find(|id| !self.door_puzzle_map.values().any(|assigned| assigned == *id))
            .or_else(|| ids.first());
        if let Some(id) = pick {
            self.door_puzzle_map.insert(exit_id, id.clone());
        }
    }

    /// Whether a puzzle counts as completed for door purposes. Peer
    /// assertions count here without touching the session's own record.
    fn puzzle_completed(&self, puzzle_id: &str) -> bool {
        self.store.state().completed_puzzles.contains(puzzle_id)
            || self.remote_completions.contains(puzzle_id)
    }

    // -------------------------------------------------------------------------
    // Relay traffic
    // -------------------------------------------------------------------------

    /// Fold one hub event into the view.
    pub fn apply_server_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::Connected { id } => {
                self.self_id = Some(id);
            }

            // The roster includes this client; drop our own entry.
            ServerEvent::Players { players } => {
                self.peers.clear();
                for player in players {
                    if Some(player.id) == self.self_id {
                        continue;
                    }
                    self.peers.insert(player.id, PeerPresence::from_state(&player));
                }
            }

            ServerEvent::PlayerJoined { player } => {
                if Some(player.id) == self.self_id {
                    return;
                }
                let here = player.level == Some(self.store.state().current_level);
                self.peers.insert(player.id, PeerPresence::from_state(&player));
                if here {
                    self.notices
                        .push("A new penguin agent has connected to this sector.".to_string());
                }
            }

            // Movement only applies to peers we already know about.
            ServerEvent::PlayerMoved {
                id,
                position,
                rotation,
            } => {
                if let Some(peer) = self.peers.get_mut(&id) {
                    peer.target_position = WorldPos::from(position);
                    peer.target_rotation = rotation;
                }
            }

            ServerEvent::PlayerLeft { id } => {
                self.peers.remove(&id);
            }

            ServerEvent::DoorUnlocked { door_id, level } => {
                if level != self.store.state().current_level {
                    return;
                }
                match DoorId::parse(&door_id) {
                    Some(door) => {
                        self.locked_doors.insert(door, false);
                        self.notices
                            .push("A door was unlocked by another agent.".to_string());
                    }
                    None => debug!(door = %door_id, "ignoring unparseable door id"),
                }
            }

            // The paired door_unlocked event carries the lock change;
            // this one only marks the puzzle itself.
            ServerEvent::PuzzleCompleted { puzzle_id, level } => {
                if level != self.store.state().current_level {
                    return;
                }
                self.remote_completions.insert(puzzle_id);
                self.notices
                    .push("A security bypass was completed by another agent.".to_string());
            }

            ServerEvent::ChatMessage { from, message } => {
                self.chat_log.push(ChatLine {
                    from: from.display_name(),
                    message,
                });
            }
        }
    }

    /// Queue a chat line for everyone on the current level.
    pub fn send_chat(&mut self, message: &str) {
        self.outbound.push(ClientEvent::SendChatMessage {
            message: message.to_string(),
            level: self.store.state().current_level,
        });
    }

    /// Record the local player's tile and facing for the next heartbeat.
    pub fn set_player_pose(&mut self, position: GridPos, rotation: f32) {
        let coord = self.store.state().current_level;
        self.store.set_location(coord, position);
        self.player_rotation = rotation;
    }

    /// The position heartbeat to send on the update cadence.
    pub fn heartbeat_event(&self) -> ClientEvent {
        let state = self.store.state();
        ClientEvent::UpdatePosition {
            position: state.player_position,
            rotation: self.player_rotation,
            level: state.current_level,
        }
    }

    /// Advance remote-player animation by one tick.
    pub fn tick(&mut self) {
        for peer in self.peers.values_mut() {
            peer.position = peer.position.approach(peer.target_position, SMOOTHING);
            peer.rotation = ease_angle(peer.rotation, peer.target_rotation, SMOOTHING);
        }
    }

    /// Peers on the current level, the ones the scene actually renders.
    pub fn scene_peers(&self) -> impl Iterator<Item = (&ClientId, &PeerPresence)> {
        let current = self.store.state().current_level;
        self.peers
            .iter()
            .filter(move |(_, peer)| peer.level == Some(current))
    }

    /// All chat received so far, oldest first.
    pub fn chat_log(&self) -> &[ChatLine] {
        &self.chat_log
    }

    /// Drain queued notification lines.
    pub fn take_notices(&mut self) -> Vec<String> {
        mem::take(&mut self.notices)
    }

    /// Drain events queued for the hub.
    pub fn take_outbound(&mut self) -> Vec<ClientEvent> {
        mem::take(&mut self.outbound)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Every exit tile on the current layout with the side it sits on,
    /// in row-major scan order.
    fn exit_cells(&self) -> Vec<(GridPos, Direction)> {
        let mut out = Vec::new();
        for (z, row) in self.level.layout.iter().enumerate() {
            for (x, &code) in row.iter().enumerate() {
                if let Some(side) = Tile::from_code(code).and_then(Tile::exit_side) {
                    out.push((GridPos::new(x as i32, z as i32), side));
                }
            }
        }
        out
    }

    fn tile_code(&self, cell: GridPos) -> Option<i32> {
        let z = usize::try_from(cell.z).ok()?;
        let x = usize::try_from(cell.x).ok()?;
        self.level.layout.get(z)?.get(x).copied()
    }
}

impl Default for WorldView {
    fn default() -> Self {
        Self::new()
    }
}

/// Ease a facing toward `target` along the shortest arc.
fn ease_angle(current: f32, target: f32, factor: f32) -> f32 {
    let mut diff = target - current;
    while diff > PI {
        diff -= TAU;
    }
    while diff < -PI {
        diff += TAU;
    }
    current + diff * factor
}

// =============================================================================
// TESTS
// =============================================================================
