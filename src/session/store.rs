//! Session Store
//!
//! Owns one [`GameState`] and exposes the operations the endpoint layer
//! dispatches into it. Each browser session gets exactly one store; the
//! relay hub never touches it.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::coord::{Direction, GridPos, LevelCoord};
use crate::puzzle::catalog::PuzzleKind;
use crate::puzzle::engine::{self, CheckOutcome, Reward};
use crate::session::state::{ConversationTurn, GameState, GameStateUpdates, PuzzleRecord};
use crate::session::terminal;
use crate::world::door::DoorId;
use crate::world::generator::{self, GeneratedLevel};

/// Why a save snapshot was rejected.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Snapshot lacks a required top-level field.
    #[error("Invalid game state")]
    MissingFields,
    /// Snapshot fields do not deserialize into session state.
    #[error("Invalid game state")]
    Malformed(#[from] serde_json::Error),
}

/// Owns one player's session state.
#[derive(Debug, Default)]
pub struct SessionStore {
    state: GameState,
}

impl SessionStore {
    /// Create a store with fresh-session defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt an existing state, e.g. one restored from a save snapshot.
    pub fn from_state(state: GameState) -> Self {
        Self { state }
    }

    /// Read access to the owned state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Fetch the level at `coord`, generating and caching on first visit.
    ///
    /// Cache wins: a revisit returns the stored level verbatim, entry
    /// point included, even when the player arrives from a different
    /// side. The origin level is fixed and served without caching.
    pub fn generate_or_fetch_level(
        &mut self,
        entry: Direction,
        coord: LevelCoord,
    ) -> GeneratedLevel {
        if coord.is_origin() {
            return generator::origin_level();
        }

        let key = coord.cache_key();
        if let Some(cached) = self.state.visited_levels.get(&key) {
            debug!(level = %key, "level cache hit");
            return cached.clone();
        }

        let level = generator::generate(entry, coord);
        debug!(
            level = %key,
            entry = entry.as_str(),
            difficulty = coord.difficulty(),
            "generated level"
        );
        self.state.visited_levels.insert(key, level.clone());
        level
    }

    /// Check a puzzle answer, applying the reward on first solve.
    ///
    /// The per-id record is created lazily; a completed puzzle reports
    /// success again without paying out twice.
    pub fn check_puzzle(&mut self, kind: &str, puzzle_id: &str, answer: &str) -> CheckOutcome {
        self.state
            .puzzles
            .entry(puzzle_id.to_string())
            .or_insert_with(|| PuzzleRecord {
                kind: kind.to_string(),
                completed: false,
            });

        if self.state.completed_puzzles.contains(puzzle_id) {
            return CheckOutcome {
                correct: true,
                reward: None,
                message: "You have already completed this puzzle.".to_string(),
            };
        }

        let outcome = engine::check(PuzzleKind::parse(kind), puzzle_id, answer);
        if outcome.correct {
            self.state.completed_puzzles.insert(puzzle_id.to_string());
            if let Some(record) = self.state.puzzles.get_mut(puzzle_id) {
                record.completed = true;
            }
            if let Some(reward) = &outcome.reward {
                self.apply_reward(reward);
            }
            info!(puzzle = puzzle_id, kind, "puzzle solved");
        }
        outcome
    }

    fn apply_reward(&mut self, reward: &Reward) {
        match reward {
            Reward::Key { key_id, .. } => {
                self.state.inventory.access_keys.push(key_id.clone());
            }
            Reward::Skill { skill, amount, .. } => {
                self.state.inventory.skill_levels.bump(*skill, *amount);
            }
        }
    }

    /// Run one admin-terminal command.
    ///
    /// Returns the response text plus any door/privilege deltas the
    /// client needs to mirror.
    pub fn terminal_command(&mut self, command: &str) -> (String, Option<GameStateUpdates>) {
        let response = terminal::execute(&mut self.state, command);
        (response, self.state.updates_snapshot())
    }

    /// Full transcript for one NPC, oldest first.
    pub fn conversation_history(&self, npc_id: &str) -> &[ConversationTurn] {
        self.state
            .npc_conversations
            .get(npc_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Append one exchange to an NPC's transcript.
    pub fn record_conversation_turn(&mut self, npc_id: &str, user: &str, assistant: &str) {
        self.state
            .npc_conversations
            .entry(npc_id.to_string())
            .or_default()
            .push(ConversationTurn {
                user: user.to_string(),
                assistant: assistant.to_string(),
            });
    }

    /// Mark a door unlocked.
    pub fn unlock_door(&mut self, door: DoorId) {
        self.state.unlock_door(door);
    }

    /// Whether a door has been unlocked this session.
    pub fn is_door_unlocked(&self, door: &DoorId) -> bool {
        self.state.is_door_unlocked(door)
    }

    /// Record a level transition.
    pub fn set_location(&mut self, level: LevelCoord, position: GridPos) {
        self.state.current_level = level;
        self.state.player_position = position;
    }

    /// Replace the session state with a client snapshot.
    ///
    /// Accepts only snapshots carrying at least the current level, player
    /// position, and inventory; anything else in the snapshot falls back
    /// to defaults.
    pub fn save_game(&mut self, snapshot: &Value) -> Result<(), SaveError> {
        let complete = snapshot.get("current_level").is_some()
            && snapshot.get("player_position").is_some()
            && snapshot.get("player_inventory").is_some();
        if !complete {
            return Err(SaveError::MissingFields);
        }

        self.state = serde_json::from_value(snapshot.clone())?;
        info!(
            level = %self.state.current_level.cache_key(),
            "session state restored from snapshot"
        );
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::catalog::definition_for;
    use serde_json::json;

    #[test]
    fn test_cache_wins_over_entry_direction() {
        let mut store = SessionStore::new();
        let coord = LevelCoord::new(1, 0);

        let first = store.generate_or_fetch_level(Direction::Left, coord);
        let second = store.generate_or_fetch_level(Direction::Top, coord);

        assert_eq!(first.layout, second.layout);
        assert_eq!(first.entry_point, second.entry_point);
        assert_eq!(store.state().visited_levels.len(), 1);
    }

    #[test]
    fn test_origin_is_never_cached() {
        let mut store = SessionStore::new();
        let first = store.generate_or_fetch_level(Direction::Bottom, LevelCoord::origin());
        let second = store.generate_or_fetch_level(Direction::Left, LevelCoord::origin());

        assert_eq!(first, second);
        assert_eq!(first, generator::origin_level());
        assert!(store.state().visited_levels.is_empty());
    }

    #[test]
    fn test_correct_answer_completes_and_rewards_once() {
        let mut store = SessionStore::new();
        let id = "puzzle_2_0_7_11";
        let solution = definition_for(PuzzleKind::Logic, id).solution;

        let first = store.check_puzzle("logic", id, solution);
        assert!(first.correct);
        assert!(first.reward.is_some());
        assert_eq!(store.state().inventory.skill_levels.networking, 2);
        assert!(store.state().completed_puzzles.contains(id));
        assert!(store.state().puzzles[id].completed);

        let again = store.check_puzzle("logic", id, "whatever");
        assert!(again.correct);
        assert!(again.reward.is_none());
        assert_eq!(again.message, "You have already completed this puzzle.");
        assert_eq!(store.state().inventory.skill_levels.networking, 2);
    }

    #[test]
    fn test_wrong_answer_leaves_state_untouched() {
        let mut store = SessionStore::new();
        let outcome = store.check_puzzle("logic", "puzzle_0_1_3_3", "not the answer");

        assert!(!outcome.correct);
        assert!(outcome.reward.is_none());
        assert!(store.state().completed_puzzles.is_empty());
        // The record itself is still created for the session.
        assert!(store.state().puzzles.contains_key("puzzle_0_1_3_3"));
        assert!(!store.state().puzzles["puzzle_0_1_3_3"].completed);
    }

    #[test]
    fn test_regex_solve_grants_access_key() {
        let mut store = SessionStore::new();
        let id = "puzzle_1_1_5_5";
        let pattern = definition_for(PuzzleKind::Regex, id)
            .example_solution
            .unwrap();

        let outcome = store.check_puzzle("regex", id, pattern);
        assert!(outcome.correct);
        assert_eq!(store.state().inventory.access_keys.len(), 1);
        assert!(store.state().inventory.access_keys[0].starts_with("security_"));
    }

    #[test]
    fn test_unknown_kind_never_completes() {
        let mut store = SessionStore::new();
        let outcome = store.check_puzzle("riddle", "puzzle_0_0_2_2", "42");
        assert!(!outcome.correct);
        assert_eq!(store.state().puzzles["puzzle_0_0_2_2"].kind, "riddle");
        assert!(store.state().completed_puzzles.is_empty());
    }

    #[test]
    fn test_terminal_override_reports_privilege() {
        let mut store = SessionStore::new();
        let (_, updates) = store.terminal_command("status");
        assert!(updates.is_none());

        let (response, updates) = store.terminal_command("override --auth=sysadmin");
        assert!(response.contains("OVERRIDE ACCEPTED"));
        assert_eq!(updates.unwrap().can_unlock_doors, Some(true));

        let (_, updates) = store.terminal_command("unlock north");
        let updates = updates.unwrap();
        let doors = updates.unlocked_doors.unwrap();
        assert_eq!(doors.get("door_0_0_north"), Some(&true));
    }

    #[test]
    fn test_conversation_transcript_order() {
        let mut store = SessionStore::new();
        store.record_conversation_turn("npc_3", "hello?", "SYSADMIN_42> What do you want.");
        store.record_conversation_turn("npc_3", "the password", "SYSADMIN_42> Absolutely not.");

        let history = store.conversation_history("npc_3");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].user, "hello?");
        assert_eq!(history[1].assistant, "SYSADMIN_42> Absolutely not.");
        assert!(store.conversation_history("npc_9").is_empty());
    }

    #[test]
    fn test_save_game_requires_core_fields() {
        let mut store = SessionStore::new();
        let err = store
            .save_game(&json!({"current_level": [1, 1]}))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid game state");

        let err = store.save_game(&json!("not an object")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid game state");
    }

    #[test]
    fn test_save_game_replaces_state() {
        let mut store = SessionStore::new();
        store
            .save_game(&json!({
                "current_level": [3, -1],
                "player_position": [4, 9],
                "player_inventory": {
                    "access_keys": ["security_7777"],
                    "tools": [],
                    "skill_levels": {"hacking": 2, "networking": 1, "cryptography": 1}
                },
                "completed_puzzles": ["puzzle_3_-1_5_5"]
            }))
            .unwrap();

        let state = store.state();
        assert_eq!(state.current_level, LevelCoord::new(3, -1));
        assert_eq!(state.player_position, GridPos::new(4, 9));
        assert_eq!(state.inventory.skill_levels.hacking, 2);
        assert!(state.completed_puzzles.contains("puzzle_3_-1_5_5"));
        assert!(!state.can_unlock_doors);
    }
}
