//! Door Keys
//!
//! Unlocks are recorded against door identifiers. The canonical key is
//! [`DoorKey`], a level coordinate plus compass side, which is what the
//! admin terminal writes and what the session store matches against.
//!
//! The browser client predates that scheme and still emits two older
//! string forms over the relay, so [`DoorId`] parses all three:
//!
//! - `door_<lx>_<ly>_<side>` - canonical, one per level side
//! - `door_<x>_<y>` - terminal coordinate unlock, grid cell of the exit
//! - `exit_<lx>_<ly>_<x>_<z>` - per-exit-tile ids relayed between peers
//!
//! Everything past the parse boundary works with the typed values.

use std::fmt;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::coord::{DoorSide, GridPos, LevelCoord};

/// Canonical door key: one per side of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DoorKey {
    /// Level the door belongs to.
    pub level: LevelCoord,
    /// Which side of the level.
    pub side: DoorSide,
}

impl DoorKey {
    /// Create a door key.
    pub fn new(level: LevelCoord, side: DoorSide) -> Self {
        Self { level, side }
    }
}

impl fmt::Display for DoorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "door_{}_{}_{}",
            self.level.x,
            self.level.y,
            self.side.as_str()
        )
    }
}

/// Any door identifier accepted at the wire boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DoorId {
    /// Canonical level-side key.
    Cardinal(DoorKey),
    /// Coordinate unlock typed into a terminal, keyed by exit tile cell.
    Tile {
        /// Column of the exit tile.
        x: i32,
        /// Row of the exit tile.
        y: i32,
    },
    /// Per-exit-tile id as relayed between clients.
    Exit {
        /// Level the exit belongs to.
        level: LevelCoord,
        /// Position of the exit tile in the layout.
        cell: GridPos,
    },
}

impl DoorId {
    /// Id of the exit tile at `cell` of `level`.
    pub fn exit(level: LevelCoord, cell: GridPos) -> DoorId {
        DoorId::Exit { level, cell }
    }

    /// Parse any of the three wire forms. Unknown shapes return `None`;
    /// the relay forwards them untouched either way.
    pub fn parse(s: &str) -> Option<DoorId> {
        let parts: Vec<&str> = s.split('_').collect();
        match parts.as_slice() {
            ["door", x, y] => Some(DoorId::Tile {
                x: x.parse().ok()?,
                y: y.parse().ok()?,
            }),
            ["door", x, y, side] => Some(DoorId::Cardinal(DoorKey {
                level: LevelCoord::new(x.parse().ok()?, y.parse().ok()?),
                side: DoorSide::parse(side)?,
            })),
            ["exit", lx, ly, x, z] => Some(DoorId::Exit {
                level: LevelCoord::new(lx.parse().ok()?, ly.parse().ok()?),
                cell: GridPos::new(x.parse().ok()?, z.parse().ok()?),
            }),
            _ => None,
        }
    }

    /// Collapse to the canonical key where one exists.
    ///
    /// Exit-tile ids map to the side their cell sits on. Coordinate
    /// unlocks have no canonical form and match by cell instead.
    pub fn canonical(&self) -> Option<DoorKey> {
        match *self {
            DoorId::Cardinal(key) => Some(key),
            DoorId::Tile { .. } => None,
            DoorId::Exit { level, cell } => {
                let side = if cell.z == 0 {
                    DoorSide::North
                } else if cell.z == 19 {
                    DoorSide::South
                } else if cell.x == 0 {
                    DoorSide::West
                } else if cell.x == 19 {
                    DoorSide::East
                } else {
                    return None;
                };
                Some(DoorKey { level, side })
            }
        }
    }
}

impl fmt::Display for DoorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoorId::Cardinal(key) => key.fmt(f),
            DoorId::Tile { x, y } => write!(f, "door_{}_{}", x, y),
            DoorId::Exit { level, cell } => {
                write!(f, "exit_{}_{}_{}_{}", level.x, level.y, cell.x, cell.z)
            }
        }
    }
}

impl Serialize for DoorId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DoorId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        DoorId::parse(&s).ok_or_else(|| D::Error::custom(format!("unrecognized door id: {s}")))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cardinal() {
        let id = DoorId::parse("door_-1_2_north").unwrap();
        assert_eq!(
            id,
            DoorId::Cardinal(DoorKey::new(LevelCoord::new(-1, 2), DoorSide::North))
        );
        assert_eq!(id.to_string(), "door_-1_2_north");
    }

    #[test]
    fn test_parse_tile() {
        let id = DoorId::parse("door_9_19").unwrap();
        assert_eq!(id, DoorId::Tile { x: 9, y: 19 });
        assert_eq!(id.to_string(), "door_9_19");
    }

    #[test]
    fn test_parse_exit() {
        let id = DoorId::parse("exit_1_0_19_10").unwrap();
        assert_eq!(
            id,
            DoorId::Exit {
                level: LevelCoord::new(1, 0),
                cell: GridPos::new(19, 10),
            }
        );
        assert_eq!(id.to_string(), "exit_1_0_19_10");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(DoorId::parse(""), None);
        assert_eq!(DoorId::parse("door"), None);
        assert_eq!(DoorId::parse("door_1"), None);
        assert_eq!(DoorId::parse("door_1_2_sideways"), None);
        assert_eq!(DoorId::parse("door_a_b"), None);
        assert_eq!(DoorId::parse("exit_1_2_3"), None);
        assert_eq!(DoorId::parse("portal_1_2"), None);
    }

    #[test]
    fn test_canonical_from_exit_cells() {
        let level = LevelCoord::new(2, -3);
        let cases = [
            (GridPos::new(9, 0), DoorSide::North),
            (GridPos::new(10, 19), DoorSide::South),
            (GridPos::new(0, 9), DoorSide::West),
            (GridPos::new(19, 10), DoorSide::East),
        ];
        for (cell, side) in cases {
            assert_eq!(
                DoorId::exit(level, cell).canonical(),
                Some(DoorKey::new(level, side))
            );
        }

        // Interior cells are not doors.
        assert_eq!(DoorId::exit(level, GridPos::new(5, 5)).canonical(), None);
    }

    #[test]
    fn test_tile_has_no_canonical_form() {
        assert_eq!(DoorId::Tile { x: 0, y: 9 }.canonical(), None);
    }

    #[test]
    fn test_serde_as_wire_string() {
        let id = DoorId::Cardinal(DoorKey::new(LevelCoord::new(0, 0), DoorSide::East));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"door_0_0_east\"");

        let back: DoorId = serde_json::from_str("\"exit_0_0_9_0\"").unwrap();
        assert_eq!(
            back,
            DoorId::exit(LevelCoord::origin(), GridPos::new(9, 0))
        );

        assert!(serde_json::from_str::<DoorId>("\"nonsense\"").is_err());
    }
}
