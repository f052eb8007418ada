//! Session Module
//!
//! Per-player authoritative game state: the level cache, puzzle
//! completion and rewards, door locks, NPC transcripts, and the admin
//! terminal. One [`SessionStore`] per browser session.
//!
//! ## Module Structure
//!
//! - `state`: state types and the wire-facing update snapshot
//! - `store`: the owning store and its endpoint-facing operations
//! - `terminal`: the in-fiction admin command shell

pub mod state;
pub mod store;
pub mod terminal;

pub use state::{
    ConversationTurn, GameState, GameStateUpdates, Inventory, PuzzleRecord, SkillLevels,
};
pub use store::{SaveError, SessionStore};
