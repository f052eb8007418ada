//! # Penguin Hacker Game Server
//!
//! Server core for a multiplayer hacking RPG: procedural level
//! generation, puzzle checking, per-session game state, NPC dialogue,
//! and a realtime relay hub for presence between players.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 PENGUIN HACKER SERVER                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Shared primitives                         │
//! │  ├── coord.rs    - Level, grid, and world coordinates        │
//! │  ├── rng.rs      - Deterministic Xorshift128+ rolls          │
//! │  └── hash.rs     - CRC-32 hashing of puzzle identifiers      │
//! │                                                              │
//! │  world/          - Level geometry (deterministic)            │
//! │  ├── tile.rs     - Integer tile codes                        │
//! │  ├── template.rs - Room templates and the origin lobby       │
//! │  ├── generator.rs- Procedural level assembly                 │
//! │  └── door.rs     - Door key schemes                          │
//! │                                                              │
//! │  puzzle/         - Hacking challenges                        │
//! │  ├── catalog.rs  - Id-derived puzzle definitions             │
//! │  └── engine.rs   - Answer checking and rewards               │
//! │                                                              │
//! │  session/        - Per-player authoritative state            │
//! │  dialogue/       - NPC chat via a completion service         │
//! │  api.rs          - Endpoint request dispatch                 │
//! │                                                              │
//! │  relay/          - Realtime presence (advisory)              │
//! │  ├── hub.rs      - WebSocket fan-out hub                     │
//! │  └── protocol.rs - Relay event types                         │
//! │                                                              │
//! │  client/         - One player's merged world view            │
//! │  ├── view.rs     - Doors, exits, peers, notices              │
//! │  └── net.rs      - Hub connection and event pump             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Trust Model
//!
//! Each session's endpoint checks are **authoritative**:
//! - Puzzle answers validate against id-derived definitions
//! - Rewards and door unlocks mutate only the owning session
//! - Level geometry is a pure function of the level coordinate
//!
//! The relay hub sits on top as advisory dressing: it mirrors puzzle
//! and door assertions between clients without validating them, and
//! receivers apply them to visual state only. A malicious client can
//! repaint a peer's doors, never their session.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod api;
pub mod client;
pub mod core;
pub mod dialogue;
pub mod puzzle;
pub mod relay;
pub mod session;
pub mod world;

// Re-export commonly used types
pub use crate::core::coord::{Direction, GridPos, LevelCoord, WorldPos};
pub use client::{RelayConnection, WorldView};
pub use relay::{ClientEvent, ClientId, HubConfig, RelayHub, ServerEvent};
pub use session::{GameState, SessionStore};
pub use world::GeneratedLevel;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
