//! Level Generator
//!
//! Stamps out a template for a level coordinate, carves its exits, and
//! scatters NPC and puzzle spawns. Geometry is a pure function of the
//! coordinate and entry direction: the template choice, the forced exit,
//! and the extra-exit rolls all derive from the coordinate alone, so two
//! sessions exploring the same map see the same rooms and doors.
//!
//! Spawn placement is the one intentionally unseeded step. Each session
//! shuffles the candidate cells with ambient entropy and then caches the
//! result, so a level's furniture is stable within a session but varies
//! between sessions.
//!
//! Generation never fails. Any coordinate and any entry direction
//! produce a playable level.

use rand::seq::SliceRandom;
use rand::thread_rng;
use serde::{Deserialize, Serialize};

use crate::core::coord::{Direction, GridPos, LevelCoord};
use crate::core::rng::DeterministicRng;
use crate::world::template::{origin_layout, Layout, TemplateKind, GRID_SIZE};
use crate::world::tile::{is_transition_code, Tile};

/// Percent chance that each non-entry side gets an extra exit.
const EXTRA_EXIT_CHANCE: u32 = 70;
/// Most NPCs a single level can hold.
const MAX_NPCS: u32 = 5;
/// Most puzzles a single level can hold.
const MAX_PUZZLES: u32 = 3;

/// A fully generated level, as served to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedLevel {
    /// 20x20 grid of tile codes, indexed `layout[z][x]`.
    pub layout: Layout,
    /// Where the player materializes, just inside the side they entered.
    pub entry_point: GridPos,
    /// Manhattan distance from the origin. The origin lobby itself has
    /// no difficulty and omits the field on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u32>,
}

impl GeneratedLevel {
    /// Tile positions holding the given code, in row-major scan order.
    pub fn positions_of(&self, tile: Tile) -> Vec<GridPos> {
        let code = tile.code();
        let mut out = Vec::new();
        for (z, row) in self.layout.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                if cell == code {
                    out.push(GridPos::new(x as i32, z as i32));
                }
            }
        }
        out
    }
}

/// Generate the level at `coord`, entered through side `entry`.
pub fn generate(entry: Direction, coord: LevelCoord) -> GeneratedLevel {
    if coord.is_origin() {
        return origin_level();
    }

    let mut layout = *TemplateKind::for_coord(coord).layout();
    carve_exits(&mut layout, entry, coord);

    let difficulty = coord.difficulty();
    place_spawns(&mut layout, difficulty);

    GeneratedLevel {
        layout,
        entry_point: entry_point_for(entry),
        difficulty: Some(difficulty),
    }
}

/// The fixed origin lobby, identical regardless of entry direction.
pub fn origin_level() -> GeneratedLevel {
    GeneratedLevel {
        layout: *origin_layout(),
        entry_point: GridPos::new(10, 18),
        difficulty: None,
    }
}

/// Carve the guaranteed exit opposite the entry, then roll extras.
fn carve_exits(layout: &mut Layout, entry: Direction, coord: LevelCoord) {
    carve_side(layout, entry.opposite());

    // One roll per side in a fixed order keeps the stream stable. The
    // entry side never rolls, so the side the player came through can
    // only be reopened by walking back out.
    let mut rng = DeterministicRng::for_level(coord);
    for side in Direction::ALL {
        if side == entry {
            continue;
        }
        if rng.chance(EXTRA_EXIT_CHANCE) && !side_is_carved(layout, side) {
            carve_side(layout, side);
        }
    }
}

/// The two mid-edge cells of a side, as `(z, x)` indices.
fn exit_cells(side: Direction) -> [(usize, usize); 2] {
    match side {
        Direction::Top => [(0, 9), (0, 10)],
        Direction::Bottom => [(19, 9), (19, 10)],
        Direction::Left => [(9, 0), (10, 0)],
        Direction::Right => [(9, 19), (10, 19)],
    }
}

fn carve_side(layout: &mut Layout, side: Direction) {
    let code = Tile::exit_for(side).code();
    for (z, x) in exit_cells(side) {
        layout[z][x] = code;
    }
}

fn side_is_carved(layout: &Layout, side: Direction) -> bool {
    let (z, x) = exit_cells(side)[0];
    layout[z][x] == Tile::exit_for(side).code()
}

/// Scatter NPC and puzzle spawns over shuffled floor cells.
fn place_spawns(layout: &mut Layout, difficulty: u32) {
    let npc_count = (1 + difficulty / 2).min(MAX_NPCS) as usize;
    let puzzle_count = (1 + difficulty / 3).min(MAX_PUZZLES) as usize;

    let mut candidates = spawn_candidates(layout);
    candidates.shuffle(&mut thread_rng());

    for pos in candidates.iter().take(npc_count) {
        layout[pos.z as usize][pos.x as usize] = Tile::Npc.code();
    }
    for pos in candidates.iter().skip(npc_count).take(puzzle_count) {
        layout[pos.z as usize][pos.x as usize] = Tile::Puzzle.code();
    }
}

/// Floor cells with no entrance or exit anywhere in their 3x3
/// neighborhood, in row-major scan order.
fn spawn_candidates(layout: &Layout) -> Vec<GridPos> {
    let mut spots = Vec::new();
    for z in 0..GRID_SIZE {
        for x in 0..GRID_SIZE {
            if layout[z][x] == Tile::Floor.code() && !near_transition(layout, x, z) {
                spots.push(GridPos::new(x as i32, z as i32));
            }
        }
    }
    spots
}

fn near_transition(layout: &Layout, x: usize, z: usize) -> bool {
    let range = 0..GRID_SIZE as i32;
    for dz in -1i32..=1 {
        for dx in -1i32..=1 {
            let cz = z as i32 + dz;
            let cx = x as i32 + dx;
            if range.contains(&cz)
                && range.contains(&cx)
                && is_transition_code(layout[cz as usize][cx as usize])
            {
                return true;
            }
        }
    }
    false
}

/// Spawn position just inside the side the player entered through.
fn entry_point_for(entry: Direction) -> GridPos {
    match entry {
        Direction::Top => GridPos::new(10, 1),
        Direction::Bottom => GridPos::new(10, 18),
        Direction::Left => GridPos::new(1, 10),
        Direction::Right => GridPos::new(18, 10),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Layout with spawn markers erased, for comparing geometry across
    /// generations that shuffled spawns differently.
    fn geometry_of(level: &GeneratedLevel) -> Layout {
        let mut layout = level.layout;
        for row in layout.iter_mut() {
            for cell in row.iter_mut() {
                if *cell == Tile::Npc.code() || *cell == Tile::Puzzle.code() {
                    *cell = Tile::Floor.code();
                }
            }
        }
        layout
    }

    #[test]
    fn test_origin_ignores_entry_direction() {
        let fixed = origin_level();
        for entry in Direction::ALL {
            let level = generate(entry, LevelCoord::origin());
            assert_eq!(level, fixed);
        }
        assert_eq!(fixed.entry_point, GridPos::new(10, 18));
        assert_eq!(fixed.difficulty, None);
    }

    #[test]
    fn test_forced_exit_opposite_entry() {
        // Entering (1, 0) from the left must always open the right side.
        let level = generate(Direction::Left, LevelCoord::new(1, 0));
        assert_eq!(level.layout[9][19], 5);
        assert_eq!(level.layout[10][19], 5);
    }

    #[test]
    fn test_entry_points() {
        let coord = LevelCoord::new(2, 3);
        assert_eq!(
            generate(Direction::Top, coord).entry_point,
            GridPos::new(10, 1)
        );
        assert_eq!(
            generate(Direction::Bottom, coord).entry_point,
            GridPos::new(10, 18)
        );
        assert_eq!(
            generate(Direction::Left, coord).entry_point,
            GridPos::new(1, 10)
        );
        assert_eq!(
            generate(Direction::Right, coord).entry_point,
            GridPos::new(18, 10)
        );
    }

    #[test]
    fn test_geometry_is_deterministic() {
        // Exits and walls must not depend on when or how often a level
        // is generated. Spawns are allowed to move between generations.
        for (x, y) in [(1, 0), (-2, 5), (3, -3), (7, 11)] {
            let coord = LevelCoord::new(x, y);
            let a = generate(Direction::Top, coord);
            let b = generate(Direction::Top, coord);
            assert_eq!(geometry_of(&a), geometry_of(&b));
        }
    }

    #[test]
    fn test_difficulty_scales_spawn_counts() {
        // Difficulty 20 hits both caps: 5 NPCs, 3 puzzles.
        let level = generate(Direction::Top, LevelCoord::new(10, 10));
        assert_eq!(level.difficulty, Some(20));
        assert_eq!(level.positions_of(Tile::Npc).len(), 5);
        assert_eq!(level.positions_of(Tile::Puzzle).len(), 3);

        // Difficulty 1 gets the minimum of one each.
        let level = generate(Direction::Top, LevelCoord::new(1, 0));
        assert_eq!(level.positions_of(Tile::Npc).len(), 1);
        assert_eq!(level.positions_of(Tile::Puzzle).len(), 1);
    }

    #[test]
    fn test_spawns_keep_clear_of_doorways() {
        for (x, y) in [(1, 0), (4, 4), (-6, 2), (0, -9)] {
            let level = generate(Direction::Bottom, LevelCoord::new(x, y));
            let mut spawns = level.positions_of(Tile::Npc);
            spawns.extend(level.positions_of(Tile::Puzzle));
            assert!(!spawns.is_empty());
            for pos in spawns {
                for dz in -1i32..=1 {
                    for dx in -1i32..=1 {
                        let z = pos.z + dz;
                        let x = pos.x + dx;
                        if (0..20).contains(&z) && (0..20).contains(&x) {
                            let code = level.layout[z as usize][x as usize];
                            assert!(
                                !is_transition_code(code),
                                "spawn at ({}, {}) blocks a doorway",
                                pos.x,
                                pos.z
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_difficulty_omitted_from_origin_json() {
        let origin = serde_json::to_value(origin_level()).unwrap();
        assert!(origin.get("difficulty").is_none());

        let outpost = serde_json::to_value(generate(Direction::Top, LevelCoord::new(1, 0))).unwrap();
        assert_eq!(outpost["difficulty"], 1);
        assert_eq!(outpost["entry_point"], serde_json::json!([10, 1]));
    }

    proptest! {
        #[test]
        fn prop_exits_respect_entry_side(
            x in -40i32..=40,
            y in -40i32..=40,
            dir_index in 0usize..4,
        ) {
            let coord = LevelCoord::new(x, y);
            prop_assume!(!coord.is_origin());
            let entry = Direction::ALL[dir_index];
            let level = generate(entry, coord);

            // The way back is always open.
            let forced = entry.opposite();
            for (z, cx) in exit_cells(forced) {
                prop_assert_eq!(level.layout[z][cx], Tile::exit_for(forced).code());
            }

            // The entry side never grows an exit of its own. Spawns may
            // land on its mid-edge floor cells, so only exits are ruled out.
            for (z, cx) in exit_cells(entry) {
                let tile = Tile::from_code(level.layout[z][cx]);
                prop_assert!(!tile.is_some_and(Tile::is_exit));
            }
        }

        #[test]
        fn prop_layout_has_only_known_codes(x in -25i32..=25, y in -25i32..=25) {
            let level = generate(Direction::Bottom, LevelCoord::new(x, y));
            for row in &level.layout {
                for &code in row {
                    prop_assert!(Tile::from_code(code).is_some(), "unknown code {}", code);
                }
            }
        }
    }
}
