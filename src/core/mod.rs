//! Core primitives.
//!
//! Coordinates, deterministic randomness, and identifier hashing. Everything
//! here is a pure function of its inputs so level geometry and puzzle
//! selection come out identical on every session and every restart.

pub mod coord;
pub mod hash;
pub mod rng;

// Re-export core types
pub use coord::{Direction, DoorSide, GridPos, LevelCoord, WorldPos};
pub use hash::{crc32, table_index};
pub use rng::DeterministicRng;
