//! Session State Definitions
//!
//! One player's world-state snapshot. The whole struct round-trips
//! through JSON for the save/restore endpoint, so field names here are
//! wire format. Uses BTreeMap/BTreeSet for deterministic iteration order.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::coord::{GridPos, LevelCoord};
use crate::puzzle::engine::SkillKind;
use crate::world::door::DoorId;
use crate::world::generator::GeneratedLevel;

// =============================================================================
// INVENTORY
// =============================================================================

/// Skill levels raised by puzzle rewards. Fresh sessions start at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillLevels {
    /// Raised by terminal puzzles.
    pub hacking: u32,
    /// Raised by logic puzzles.
    pub networking: u32,
    /// Raised by encryption puzzles.
    pub cryptography: u32,
}

impl Default for SkillLevels {
    fn default() -> Self {
        Self {
            hacking: 1,
            networking: 1,
            cryptography: 1,
        }
    }
}

impl SkillLevels {
    /// Read one skill's level.
    pub fn get(&self, skill: SkillKind) -> u32 {
        match skill {
            SkillKind::Hacking => self.hacking,
            SkillKind::Networking => self.networking,
            SkillKind::Cryptography => self.cryptography,
        }
    }

    /// Raise one skill by `amount`.
    pub fn bump(&mut self, skill: SkillKind, amount: u32) {
        match skill {
            SkillKind::Hacking => self.hacking += amount,
            SkillKind::Networking => self.networking += amount,
            SkillKind::Cryptography => self.cryptography += amount,
        }
    }
}

/// What the player carries across levels.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    /// Opaque key ids granted by pattern puzzles.
    pub access_keys: Vec<String>,
    /// Reserved slot in the save format; nothing grants tools yet.
    pub tools: Vec<String>,
    /// Skill table.
    pub skill_levels: SkillLevels,
}

// =============================================================================
// PUZZLE AND CONVERSATION RECORDS
// =============================================================================

/// Tracks one puzzle the player has interacted with.
///
/// Created lazily on the first answer check; the content itself is
/// re-derived from the id, never stored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleRecord {
    /// Kind string as the client reported it.
    pub kind: String,
    /// Set once the player solves it.
    pub completed: bool,
}

/// One user/assistant exchange with an NPC.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// What the player said.
    pub user: String,
    /// What the NPC answered.
    pub assistant: String,
}

// =============================================================================
// CLIENT-FACING STATE DELTAS
// =============================================================================

/// Door and privilege changes piggybacked on terminal responses.
///
/// The field casing is mixed because the browser client reads these
/// exact names.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStateUpdates {
    /// Unlocked door keys, rendered as `door_..` strings.
    #[serde(rename = "unlockedDoors", skip_serializing_if = "Option::is_none")]
    pub unlocked_doors: Option<BTreeMap<String, bool>>,
    /// Whether the admin override has been activated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_unlock_doors: Option<bool>,
}

// =============================================================================
// GAME STATE
// =============================================================================

/// One session's authoritative world state.
///
/// Exclusively owned by a [`SessionStore`](crate::session::store::SessionStore);
/// the relay hub never holds a copy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    /// Level the player currently occupies.
    pub current_level: LevelCoord,

    /// Tile position within that level.
    pub player_position: GridPos,

    /// Keys, tools, and skills.
    #[serde(rename = "player_inventory")]
    pub inventory: Inventory,

    /// Generated levels cached by `x_y` key. The origin level is fixed
    /// and never stored here.
    pub visited_levels: BTreeMap<String, GeneratedLevel>,

    /// Ids of puzzles solved this session.
    pub completed_puzzles: BTreeSet<String>,

    /// Per-id puzzle records, created on first check.
    pub puzzles: BTreeMap<String, PuzzleRecord>,

    /// Per-NPC transcripts, replayed as dialogue context.
    pub npc_conversations: BTreeMap<String, Vec<ConversationTurn>>,

    /// Doors opened this session, keyed by door id.
    #[serde(rename = "unlockedDoors")]
    pub unlocked_doors: BTreeMap<DoorId, bool>,

    /// Terminal `override --auth=sysadmin` privilege.
    pub can_unlock_doors: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            current_level: LevelCoord::origin(),
            player_position: GridPos::new(10, 18),
            inventory: Inventory::default(),
            visited_levels: BTreeMap::new(),
            completed_puzzles: BTreeSet::new(),
            puzzles: BTreeMap::new(),
            npc_conversations: BTreeMap::new(),
            unlocked_doors: BTreeMap::new(),
            can_unlock_doors: false,
        }
    }
}

impl GameState {
    /// Whether a door has been unlocked this session.
    pub fn is_door_unlocked(&self, door: &DoorId) -> bool {
        self.unlocked_doors.get(door).copied().unwrap_or(false)
    }

    /// Mark a door unlocked.
    pub fn unlock_door(&mut self, door: DoorId) {
        self.unlocked_doors.insert(door, true);
    }

    /// Door and privilege deltas for the client.
    ///
    /// `None` when there is nothing to report, which keeps the field off
    /// the wire entirely for unprivileged sessions.
    pub fn updates_snapshot(&self) -> Option<GameStateUpdates> {
        let unlocked_doors = if self.unlocked_doors.is_empty() {
            None
        } else {
            Some(
                self.unlocked_doors
                    .iter()
                    .map(|(door, open)| (door.to_string(), *open))
                    .collect(),
            )
        };
        let can_unlock_doors = self.can_unlock_doors.then_some(true);

        if unlocked_doors.is_none() && can_unlock_doors.is_none() {
            None
        } else {
            Some(GameStateUpdates {
                unlocked_doors,
                can_unlock_doors,
            })
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coord::DoorSide;
    use crate::world::door::DoorKey;

    #[test]
    fn test_fresh_session_defaults() {
        let state = GameState::default();
        assert_eq!(state.current_level, LevelCoord::origin());
        assert_eq!(state.player_position, GridPos::new(10, 18));
        assert_eq!(state.inventory.skill_levels.hacking, 1);
        assert_eq!(state.inventory.skill_levels.networking, 1);
        assert_eq!(state.inventory.skill_levels.cryptography, 1);
        assert!(state.inventory.access_keys.is_empty());
        assert!(!state.can_unlock_doors);
        assert!(state.updates_snapshot().is_none());
    }

    #[test]
    fn test_skill_bump() {
        let mut skills = SkillLevels::default();
        skills.bump(SkillKind::Cryptography, 2);
        assert_eq!(skills.get(SkillKind::Cryptography), 3);
        assert_eq!(skills.get(SkillKind::Hacking), 1);
    }

    #[test]
    fn test_doors_default_locked() {
        let state = GameState::default();
        let door = DoorId::Cardinal(DoorKey::new(LevelCoord::origin(), DoorSide::North));
        assert!(!state.is_door_unlocked(&door));
    }

    #[test]
    fn test_updates_snapshot_after_unlock() {
        let mut state = GameState::default();
        state.unlock_door(DoorId::Cardinal(DoorKey::new(
            LevelCoord::new(2, 3),
            DoorSide::North,
        )));
        state.can_unlock_doors = true;

        let updates = state.updates_snapshot().unwrap();
        assert_eq!(updates.can_unlock_doors, Some(true));
        let doors = updates.unlocked_doors.unwrap();
        assert_eq!(doors.get("door_2_3_north"), Some(&true));
    }

    #[test]
    fn test_privilege_alone_is_reported() {
        let mut state = GameState::default();
        state.can_unlock_doors = true;

        let updates = state.updates_snapshot().unwrap();
        assert!(updates.unlocked_doors.is_none());
        assert_eq!(updates.can_unlock_doors, Some(true));
    }

    #[test]
    fn test_state_uses_wire_field_names() {
        let state = GameState::default();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["current_level"], serde_json::json!([0, 0]));
        assert_eq!(json["player_position"], serde_json::json!([10, 18]));
        assert_eq!(json["player_inventory"]["skill_levels"]["hacking"], 1);
        assert!(json["unlockedDoors"].is_object());
    }

    #[test]
    fn test_state_roundtrip_preserves_doors_and_puzzles() {
        let mut state = GameState::default();
        state.unlock_door(DoorId::Tile { x: 9, y: 19 });
        state.completed_puzzles.insert("puzzle_1_0_4_7".to_string());
        state.puzzles.insert(
            "puzzle_1_0_4_7".to_string(),
            PuzzleRecord {
                kind: "logic".to_string(),
                completed: true,
            },
        );

        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
        assert!(back.is_door_unlocked(&DoorId::Tile { x: 9, y: 19 }));
    }

    #[test]
    fn test_partial_snapshot_fills_defaults() {
        let json = r#"{
            "current_level": [1, -2],
            "player_position": [5, 5],
            "player_inventory": {"access_keys": ["security_1234"]}
        }"#;
        let state: GameState = serde_json::from_str(json).unwrap();
        assert_eq!(state.current_level, LevelCoord::new(1, -2));
        assert_eq!(state.inventory.access_keys, vec!["security_1234".to_string()]);
        assert_eq!(state.inventory.skill_levels.hacking, 1);
        assert!(state.visited_levels.is_empty());
        assert!(!state.can_unlock_doors);
    }
}
