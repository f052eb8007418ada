//! Puzzle Module
//!
//! Hacking challenges attached to puzzle terminals in the world grid.
//!
//! ## Module Structure
//!
//! - `catalog`: fixed content tables and deterministic id-to-entry selection
//! - `engine`: answer validation, rewards, and check outcomes

pub mod catalog;
pub mod engine;

pub use catalog::{definition_for, PuzzleDef, PuzzleKind, RegexCase};
pub use engine::{check, reward_for, CheckOutcome, Reward, SkillKind};
