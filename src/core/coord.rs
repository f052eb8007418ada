//! World Coordinates
//!
//! Two coordinate systems cover the game world:
//!
//! - [`LevelCoord`] addresses a level on the infinite 2D map of sectors.
//! - [`GridPos`] addresses a tile inside a level's 20x20 layout grid.
//!
//! Both serialize as two-element JSON arrays to match the wire format
//! used by the browser client. [`WorldPos`] is the floating-point
//! variant of a grid position used for presence updates, where peers
//! may be mid-animation between tiles.

use serde::{Deserialize, Serialize};

/// Side of a level through which a player enters or exits.
///
/// The names follow the layout grid: `Top` is row 0, `Bottom` is row 19,
/// `Left` is column 0, `Right` is column 19.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Top edge of the grid (row 0).
    Top,
    /// Bottom edge of the grid (row 19).
    Bottom,
    /// Left edge of the grid (column 0).
    Left,
    /// Right edge of the grid (column 19).
    Right,
}

impl Direction {
    /// All four directions in carve order.
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Bottom,
        Direction::Left,
        Direction::Right,
    ];

    /// The side facing this one across the grid.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Compass name used for door keys (`top` -> `north`, etc).
    pub fn door_side(self) -> DoorSide {
        match self {
            Direction::Top => DoorSide::North,
            Direction::Bottom => DoorSide::South,
            Direction::Left => DoorSide::West,
            Direction::Right => DoorSide::East,
        }
    }

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Top => "top",
            Direction::Bottom => "bottom",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Parse a wire name. Unknown strings return `None` so callers can
    /// apply their own fallback.
    pub fn parse(s: &str) -> Option<Direction> {
        match s {
            "top" => Some(Direction::Top),
            "bottom" => Some(Direction::Bottom),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Compass side used in door unlock keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorSide {
    /// Top edge of the level.
    North,
    /// Bottom edge of the level.
    South,
    /// Right edge of the level.
    East,
    /// Left edge of the level.
    West,
}

impl DoorSide {
    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            DoorSide::North => "north",
            DoorSide::South => "south",
            DoorSide::East => "east",
            DoorSide::West => "west",
        }
    }

    /// Parse a compass name as typed by terminal users.
    pub fn parse(s: &str) -> Option<DoorSide> {
        match s {
            "north" => Some(DoorSide::North),
            "south" => Some(DoorSide::South),
            "east" => Some(DoorSide::East),
            "west" => Some(DoorSide::West),
            _ => None,
        }
    }
}

/// Coordinate of a level on the infinite sector map.
///
/// Serializes as `[x, y]` to match the client's `level_coords` payloads.
/// The origin `(0, 0)` is the hand-authored lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct LevelCoord {
    /// East-west position on the map.
    pub x: i32,
    /// North-south position on the map.
    pub y: i32,
}

impl LevelCoord {
    /// Create a level coordinate.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The origin lobby level.
    pub fn origin() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Whether this is the fixed origin level.
    pub fn is_origin(self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Difficulty scales with Manhattan distance from the origin.
    pub fn difficulty(self) -> u32 {
        self.x.unsigned_abs() + self.y.unsigned_abs()
    }

    /// Seed for the extra-exit rolls, derived as `|1000 * x + y|` so each
    /// level always rolls the same doors.
    pub fn carve_seed(self) -> u64 {
        (self.x as i64 * 1000 + self.y as i64).unsigned_abs()
    }

    /// Key used for the visited-level cache and save snapshots.
    pub fn cache_key(self) -> String {
        format!("{}_{}", self.x, self.y)
    }

    /// The neighboring level reached by walking out through `side`.
    pub fn step(self, side: Direction) -> LevelCoord {
        match side {
            Direction::Top => LevelCoord::new(self.x, self.y - 1),
            Direction::Bottom => LevelCoord::new(self.x, self.y + 1),
            Direction::Left => LevelCoord::new(self.x - 1, self.y),
            Direction::Right => LevelCoord::new(self.x + 1, self.y),
        }
    }
}

impl From<(i32, i32)> for LevelCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<LevelCoord> for (i32, i32) {
    fn from(c: LevelCoord) -> Self {
        (c.x, c.y)
    }
}

/// Tile position inside a level layout.
///
/// Serializes as `[x, z]`. The layout grid is indexed `layout[z][x]`,
/// so `z` is the row and `x` the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct GridPos {
    /// Column in the layout grid.
    pub x: i32,
    /// Row in the layout grid.
    pub z: i32,
}

impl GridPos {
    /// Create a grid position.
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, z): (i32, i32)) -> Self {
        Self { x, z }
    }
}

impl From<GridPos> for (i32, i32) {
    fn from(p: GridPos) -> Self {
        (p.x, p.z)
    }
}

/// Floating-point position for presence updates.
///
/// Peers animate between tiles, so their reported positions are not
/// always whole grid cells. Serializes as `[x, z]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f32, f32)", into = "(f32, f32)")]
pub struct WorldPos {
    /// Column, possibly fractional.
    pub x: f32,
    /// Row, possibly fractional.
    pub z: f32,
}

impl WorldPos {
    /// Create a world position.
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Move a fraction of the way toward `target`.
    ///
    /// With a factor below 1.0 repeated calls converge on the target,
    /// which is how remote players are animated between updates.
    pub fn approach(self, target: WorldPos, factor: f32) -> WorldPos {
        WorldPos {
            x: self.x + (target.x - self.x) * factor,
            z: self.z + (target.z - self.z) * factor,
        }
    }
}

impl From<GridPos> for WorldPos {
    fn from(p: GridPos) -> Self {
        Self {
            x: p.x as f32,
            z: p.z as f32,
        }
    }
}

impl From<(f32, f32)> for WorldPos {
    fn from((x, z): (f32, f32)) -> Self {
        Self { x, z }
    }
}

impl From<WorldPos> for (f32, f32) {
    fn from(p: WorldPos) -> Self {
        (p.x, p.z)
    }
}

// =============================================================================
// TESTS
// =============================================================================
