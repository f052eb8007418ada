//! World Generation Module
//!
//! Level geometry and the identifiers attached to it.
//!
//! ## Module Structure
//!
//! - `tile`: Integer tile codes and their meanings
//! - `template`: Hand-authored room templates and the origin lobby
//! - `generator`: Procedural level assembly from coordinates
//! - `door`: Door key schemes and the canonical unlock key

pub mod door;
pub mod generator;
pub mod template;
pub mod tile;

// Re-export key types
pub use door::{DoorId, DoorKey};
pub use generator::{generate, origin_level, GeneratedLevel};
pub use template::{Layout, TemplateKind, GRID_SIZE};
pub use tile::Tile;
