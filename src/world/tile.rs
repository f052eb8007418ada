//! Tile Codes
//!
//! Level layouts are grids of integer tile codes, kept as raw `i32` on
//! the wire so the browser client can index them directly. [`Tile`]
//! gives the codes names on the server side.
//!
//! Locked exits are a presentation concern: the client shows a locked
//! door by adding [`LOCKED_DISPLAY_OFFSET`] to the exit code. Stored
//! layouts never contain offset codes.

use crate::core::coord::Direction;

/// Added to an exit code to display it as locked (e.g. 4 -> 24).
pub const LOCKED_DISPLAY_OFFSET: i32 = 20;

/// A named tile code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    /// Walkable floor.
    Floor,
    /// Solid wall.
    Wall,
    /// Entrance marker in the origin lobby.
    Entrance,
    /// Exit on the bottom edge, leading to `y + 1`.
    ExitBottom,
    /// Exit on the top edge, leading to `y - 1`.
    ExitTop,
    /// Exit on the right edge, leading to `x + 1`.
    ExitRight,
    /// Exit on the left edge, leading to `x - 1`.
    ExitLeft,
    /// Server rack.
    Server,
    /// Computer workstation.
    Computer,
    /// Network router.
    Router,
    /// Satellite uplink.
    Satellite,
    /// Office desk.
    Desk,
    /// Office chair.
    Chair,
    /// NPC spawn.
    Npc,
    /// Puzzle terminal spawn.
    Puzzle,
    /// Portal in the origin lobby.
    Portal,
}

impl Tile {
    /// Integer code stored in layouts.
    pub fn code(self) -> i32 {
        match self {
            Tile::Floor => 0,
            Tile::Wall => 1,
            Tile::Entrance => 2,
            Tile::ExitBottom => 3,
            Tile::ExitTop => 4,
            Tile::ExitRight => 5,
            Tile::ExitLeft => 6,
            Tile::Server => 7,
            Tile::Computer => 8,
            Tile::Router => 9,
            Tile::Satellite => 10,
            Tile::Desk => 11,
            Tile::Chair => 12,
            Tile::Npc => 13,
            Tile::Puzzle => 14,
            Tile::Portal => 30,
        }
    }

    /// Look up a tile by its layout code.
    pub fn from_code(code: i32) -> Option<Tile> {
        match code {
            0 => Some(Tile::Floor),
            1 => Some(Tile::Wall),
            2 => Some(Tile::Entrance),
            3 => Some(Tile::ExitBottom),
            4 => Some(Tile::ExitTop),
            5 => Some(Tile::ExitRight),
            6 => Some(Tile::ExitLeft),
            7 => Some(Tile::Server),
            8 => Some(Tile::Computer),
            9 => Some(Tile::Router),
            10 => Some(Tile::Satellite),
            11 => Some(Tile::Desk),
            12 => Some(Tile::Chair),
            13 => Some(Tile::Npc),
            14 => Some(Tile::Puzzle),
            30 => Some(Tile::Portal),
            _ => None,
        }
    }

    /// The exit tile carved on side `side` of a level.
    pub fn exit_for(side: Direction) -> Tile {
        match side {
            Direction::Top => Tile::ExitTop,
            Direction::Bottom => Tile::ExitBottom,
            Direction::Left => Tile::ExitLeft,
            Direction::Right => Tile::ExitRight,
        }
    }

    /// Which side of the level this exit sits on, if it is an exit.
    pub fn exit_side(self) -> Option<Direction> {
        match self {
            Tile::ExitTop => Some(Direction::Top),
            Tile::ExitBottom => Some(Direction::Bottom),
            Tile::ExitLeft => Some(Direction::Left),
            Tile::ExitRight => Some(Direction::Right),
            _ => None,
        }
    }

    /// Whether this tile is one of the four exits.
    pub fn is_exit(self) -> bool {
        self.exit_side().is_some()
    }
}

/// Whether a code marks a level transition (entrance or any exit).
///
/// The generator keeps NPCs and puzzles out of the 3x3 neighborhood of
/// these so doorways never get blocked.
pub fn is_transition_code(code: i32) -> bool {
    (2..=6).contains(&code)
}

/// Display code for an exit shown as locked.
pub fn locked_display_code(code: i32) -> i32 {
    code + LOCKED_DISPLAY_OFFSET
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in (0..=14).chain([30]) {
            let tile = Tile::from_code(code).unwrap();
            assert_eq!(tile.code(), code);
        }
        assert_eq!(Tile::from_code(15), None);
        assert_eq!(Tile::from_code(-1), None);
        assert_eq!(Tile::from_code(24), None);
    }

    #[test]
    fn test_exit_sides() {
        assert_eq!(Tile::ExitTop.exit_side(), Some(Direction::Top));
        assert_eq!(Tile::ExitBottom.exit_side(), Some(Direction::Bottom));
        assert_eq!(Tile::ExitLeft.exit_side(), Some(Direction::Left));
        assert_eq!(Tile::ExitRight.exit_side(), Some(Direction::Right));
        assert_eq!(Tile::Floor.exit_side(), None);
        assert_eq!(Tile::Portal.exit_side(), None);
    }

    #[test]
    fn test_exit_for_inverts_exit_side() {
        for side in Direction::ALL {
            assert_eq!(Tile::exit_for(side).exit_side(), Some(side));
        }
    }

    #[test]
    fn test_transition_codes() {
        assert!(!is_transition_code(Tile::Floor.code()));
        assert!(!is_transition_code(Tile::Wall.code()));
        assert!(is_transition_code(Tile::Entrance.code()));
        assert!(is_transition_code(Tile::ExitBottom.code()));
        assert!(is_transition_code(Tile::ExitLeft.code()));
        assert!(!is_transition_code(Tile::Server.code()));
    }

    #[test]
    fn test_locked_display_code() {
        assert_eq!(locked_display_code(Tile::ExitTop.code()), 24);
        assert_eq!(locked_display_code(Tile::ExitRight.code()), 25);
    }
}
