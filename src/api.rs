//! Endpoint API
//!
//! Typed request/response dispatch behind the browser client's four
//! endpoint actions. The HTTP transport itself lives outside this crate;
//! this module owns everything between a decoded request payload and the
//! response payload: input validation, session mutation, and the
//! dialogue round-trip.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::coord::{Direction, LevelCoord};
use crate::dialogue::client::{respond, DialogueBackend};
use crate::dialogue::persona::Persona;
use crate::puzzle::engine::CheckOutcome;
use crate::session::state::GameStateUpdates;
use crate::session::store::SessionStore;
use crate::world::generator::GeneratedLevel;

// =============================================================================
// REQUESTS
// =============================================================================

/// A client request, tagged by its `action` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ApiRequest {
    /// Fetch or generate the level at some coordinates.
    GenerateLevel {
        /// Side of the new level the player appears on.
        #[serde(default)]
        entry_direction: Option<String>,
        /// `[x, y]` pair; absent means the origin.
        #[serde(default)]
        level_coords: Option<Value>,
    },
    /// Check a puzzle answer.
    CheckPuzzle {
        /// Puzzle kind name.
        #[serde(default)]
        puzzle_type: String,
        /// Stable puzzle id.
        #[serde(default)]
        puzzle_id: String,
        /// The player's answer text.
        #[serde(default)]
        answer: String,
    },
    /// Talk to an NPC, or the admin terminal via type `terminal`.
    NpcConversation {
        /// Persona name; unknown names get a random persona.
        #[serde(default = "default_npc_type")]
        npc_type: String,
        /// The player's message or terminal command.
        #[serde(default)]
        message: String,
        /// Transcript key for this NPC.
        #[serde(default = "default_npc_id")]
        npc_id: String,
    },
    /// Replace the session with a client snapshot.
    SaveGame {
        /// The snapshot, as an object or a JSON-encoded string.
        #[serde(default)]
        game_state: Option<Value>,
    },
}

fn default_npc_type() -> String {
    "unknown".to_string()
}

fn default_npc_id() -> String {
    "0".to_string()
}

impl ApiRequest {
    /// Parse a raw request body.
    pub fn from_json(json: &str) -> Result<ApiRequest, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

/// Response payloads for the four actions.
///
/// Serialized untagged: each response is its bare payload object, the
/// shape the browser client already consumes.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ApiResponse {
    /// Level payload.
    Level(GeneratedLevel),
    /// Puzzle check payload.
    Puzzle(CheckOutcome),
    /// NPC or terminal reply.
    Npc(NpcReply),
    /// Save acknowledgment.
    Save(SaveStatus),
    /// Structured failure.
    Error(ApiError),
}

impl ApiResponse {
    /// Serialize for the transport layer.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Structured error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Human-readable reason.
    pub error: String,
}

/// NPC conversation reply.
#[derive(Debug, Clone, Serialize)]
pub struct NpcReply {
    /// The NPC's line or the terminal output.
    pub response: String,
    /// Resolved persona name, or `terminal`.
    pub npc_type: String,
    /// Door/privilege deltas from terminal commands.
    #[serde(rename = "gameStateUpdates", skip_serializing_if = "Option::is_none")]
    pub game_state_updates: Option<GameStateUpdates>,
}

/// Save acknowledgment.
#[derive(Debug, Clone, Serialize)]
pub struct SaveStatus {
    /// Whether the snapshot was accepted.
    pub status: SaveResult,
    /// Rejection reason, absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Save outcome tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveResult {
    /// Snapshot accepted and adopted.
    Success,
    /// Snapshot rejected.
    Error,
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Dispatch one raw request payload against a session.
///
/// Unrecognized or untagged payloads produce the structured error
/// payload, never a hard failure.
pub async fn handle(
    store: &mut SessionStore,
    dialogue: &dyn DialogueBackend,
    raw: &Value,
) -> ApiResponse {
    match serde_json::from_value::<ApiRequest>(raw.clone()) {
        Ok(request) => dispatch(store, dialogue, request).await,
        Err(_) => ApiResponse::Error(ApiError {
            error: "Unknown action".to_string(),
        }),
    }
}

/// Dispatch a typed request against a session.
pub async fn dispatch(
    store: &mut SessionStore,
    dialogue: &dyn DialogueBackend,
    request: ApiRequest,
) -> ApiResponse {
    match request {
        ApiRequest::GenerateLevel {
            entry_direction,
            level_coords,
        } => generate_level(store, entry_direction.as_deref(), level_coords.as_ref()),
        ApiRequest::CheckPuzzle {
            puzzle_type,
            puzzle_id,
            answer,
        } => ApiResponse::Puzzle(store.check_puzzle(&puzzle_type, &puzzle_id, &answer)),
        ApiRequest::NpcConversation {
            npc_type,
            message,
            npc_id,
        } => npc_conversation(store, dialogue, &npc_type, &message, &npc_id).await,
        ApiRequest::SaveGame { game_state } => save_game(store, game_state.as_ref()),
    }
}

fn generate_level(
    store: &mut SessionStore,
    entry_direction: Option<&str>,
    level_coords: Option<&Value>,
) -> ApiResponse {
    let coord = match level_coords {
        None => LevelCoord::origin(),
        Some(value) => match parse_coords(value) {
            Some(coord) => coord,
            None => {
                return ApiResponse::Error(ApiError {
                    error: "Invalid level coordinates".to_string(),
                })
            }
        },
    };

    let entry = entry_direction
        .and_then(Direction::parse)
        .unwrap_or(Direction::Bottom);

    ApiResponse::Level(store.generate_or_fetch_level(entry, coord))
}

/// Parse a `[x, y]` pair. Numeric strings are tolerated and fractions
/// truncate toward zero; the pair itself may arrive JSON-encoded inside
/// a string, a leftover of the form-field transport.
fn parse_coords(value: &Value) -> Option<LevelCoord> {
    if let Value::String(text) = value {
        let inner: Value = serde_json::from_str(text).ok()?;
        return parse_coords(&inner);
    }

    let entries = value.as_array()?;
    if entries.len() != 2 {
        return None;
    }
    Some(LevelCoord::new(
        parse_coord_entry(&entries[0])?,
        parse_coord_entry(&entries[1])?,
    ))
}

fn parse_coord_entry(value: &Value) -> Option<i32> {
    if let Some(int) = value.as_i64() {
        return i32::try_from(int).ok();
    }
    if let Some(float) = value.as_f64() {
        return Some(float as i32);
    }
    value
        .as_str()?
        .trim()
        .parse::<f64>()
        .ok()
        .map(|float| float as i32)
}

async fn npc_conversation(
    store: &mut SessionStore,
    dialogue: &dyn DialogueBackend,
    npc_type: &str,
    message: &str,
    npc_id: &str,
) -> ApiResponse {
    // Terminal props parse locally and never keep a transcript.
    if npc_type == "terminal" {
        let (response, updates) = store.terminal_command(message);
        return ApiResponse::Npc(NpcReply {
            response,
            npc_type: "terminal".to_string(),
            game_state_updates: updates,
        });
    }

    let persona = Persona::resolve(npc_type);
    let history = store.conversation_history(npc_id).to_vec();
    let response = respond(dialogue, persona, &history, message).await;
    store.record_conversation_turn(npc_id, message, &response);

    ApiResponse::Npc(NpcReply {
        response,
        npc_type: persona.as_str().to_string(),
        game_state_updates: None,
    })
}

fn save_game(store: &mut SessionStore, snapshot: Option<&Value>) -> ApiResponse {
    let snapshot = match snapshot {
        Some(snapshot) => snapshot,
        None => {
            return ApiResponse::Save(SaveStatus {
                status: SaveResult::Error,
                message: Some("No game state provided".to_string()),
            })
        }
    };

    // Form-era clients send the snapshot as a JSON string field.
    let decoded;
    let snapshot = if let Value::String(text) = snapshot {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => {
                decoded = value;
                &decoded
            }
            Err(_) => {
                return ApiResponse::Save(SaveStatus {
                    status: SaveResult::Error,
                    message: Some("Invalid game state".to_string()),
                })
            }
        }
    } else {
        snapshot
    };

    match store.save_game(snapshot) {
        Ok(()) => ApiResponse::Save(SaveStatus {
            status: SaveResult::Success,
            message: None,
        }),
        Err(err) => ApiResponse::Save(SaveStatus {
            status: SaveResult::Error,
            message: Some(err.to_string()),
        }),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::client::DialogueError;
    use crate::session::state::ConversationTurn;
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoBackend;

    #[async_trait]
    impl DialogueBackend for EchoBackend {
        async fn complete(
            &self,
            persona: Persona,
            history: &[ConversationTurn],
            message: &str,
        ) -> Result<String, DialogueError> {
            Ok(format!(
                "{}:{}:{}",
                persona.as_str(),
                history.len(),
                message
            ))
        }
    }

    struct DownBackend;

    #[async_trait]
    impl DialogueBackend for DownBackend {
        async fn complete(
            &self,
            _persona: Persona,
            _history: &[ConversationTurn],
            _message: &str,
        ) -> Result<String, DialogueError> {
            Err(DialogueError::EmptyCompletion)
        }
    }

    #[tokio::test]
    async fn test_generate_level_defaults_to_origin() {
        let mut store = SessionStore::new();
        let response = handle(&mut store, &EchoBackend, &json!({"action": "generate_level"})).await;
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["entry_point"], json!([10, 18]));
        assert!(json.get("difficulty").is_none());
    }

    #[tokio::test]
    async fn test_generate_level_rejects_malformed_coords() {
        let mut store = SessionStore::new();
        for bad in [
            json!({"action": "generate_level", "level_coords": [1]}),
            json!({"action": "generate_level", "level_coords": ["a", "b"]}),
            json!({"action": "generate_level", "level_coords": {"x": 1, "y": 2}}),
        ] {
            let response = handle(&mut store, &EchoBackend, &bad).await;
            let json = serde_json::to_value(&response).unwrap();
            assert_eq!(json["error"], "Invalid level coordinates");
        }
    }

    #[tokio::test]
    async fn test_generate_level_tolerates_string_forms() {
        let mut store = SessionStore::new();
        let response = handle(
            &mut store,
            &EchoBackend,
            &json!({
                "action": "generate_level",
                "entry_direction": "diagonal",
                "level_coords": "[2, -1.7]"
            }),
        )
        .await;
        let json = serde_json::to_value(&response).unwrap();
        // -1.7 truncates toward zero; difficulty is |2| + |-1|.
        assert_eq!(json["difficulty"], 3);
        // Invalid direction falls back to bottom.
        assert_eq!(json["entry_point"], json!([10, 18]));
    }

    #[tokio::test]
    async fn test_check_puzzle_roundtrip() {
        let mut store = SessionStore::new();
        let response = handle(
            &mut store,
            &EchoBackend,
            &json!({
                "action": "check_puzzle",
                "puzzle_type": "logic",
                "puzzle_id": "puzzle_5_5_9_9",
                "answer": "definitely wrong"
            }),
        )
        .await;
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["correct"], false);
        assert!(json["reward"].is_null());
        assert!(json["message"].is_string());
    }

    #[tokio::test]
    async fn test_terminal_conversation_carries_updates() {
        let mut store = SessionStore::new();
        let response = handle(
            &mut store,
            &EchoBackend,
            &json!({
                "action": "npc_conversation",
                "npc_type": "terminal",
                "message": "override --auth=sysadmin",
                "npc_id": "term_1"
            }),
        )
        .await;
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["npc_type"], "terminal");
        assert!(json["response"]
            .as_str()
            .unwrap()
            .contains("OVERRIDE ACCEPTED"));
        assert_eq!(json["gameStateUpdates"]["can_unlock_doors"], true);
        // Terminal exchanges are not recorded as NPC transcripts.
        assert!(store.conversation_history("term_1").is_empty());
    }

    #[tokio::test]
    async fn test_npc_conversation_replays_history() {
        let mut store = SessionStore::new();
        let request = json!({
            "action": "npc_conversation",
            "npc_type": "sysadmin",
            "message": "hello",
            "npc_id": "npc_7"
        });

        let first = handle(&mut store, &EchoBackend, &request).await;
        let first = serde_json::to_value(&first).unwrap();
        assert_eq!(first["response"], "sysadmin:0:hello");
        assert_eq!(first["npc_type"], "sysadmin");
        assert!(first.get("gameStateUpdates").is_none());

        let second = handle(&mut store, &EchoBackend, &request).await;
        let second = serde_json::to_value(&second).unwrap();
        assert_eq!(second["response"], "sysadmin:1:hello");
        assert_eq!(store.conversation_history("npc_7").len(), 2);
    }

    #[tokio::test]
    async fn test_npc_conversation_falls_back_and_still_records() {
        let mut store = SessionStore::new();
        let response = handle(
            &mut store,
            &DownBackend,
            &json!({
                "action": "npc_conversation",
                "npc_type": "hacker",
                "message": "you there?",
                "npc_id": "npc_2"
            }),
        )
        .await;
        let json = serde_json::to_value(&response).unwrap();
        let line = json["response"].as_str().unwrap();
        assert!(line.starts_with("GH0ST_1N_M4CH1NE>"));

        let history = store.conversation_history("npc_2");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].assistant, line);
    }

    #[tokio::test]
    async fn test_unknown_npc_type_resolves_to_known_persona() {
        let mut store = SessionStore::new();
        let response = handle(
            &mut store,
            &EchoBackend,
            &json!({
                "action": "npc_conversation",
                "message": "who is this?",
                "npc_id": "npc_x"
            }),
        )
        .await;
        let json = serde_json::to_value(&response).unwrap();
        let resolved = json["npc_type"].as_str().unwrap();
        assert!(Persona::parse(resolved).is_some());
    }

    #[tokio::test]
    async fn test_save_game_statuses() {
        let mut store = SessionStore::new();

        let response = handle(&mut store, &EchoBackend, &json!({"action": "save_game"})).await;
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "No game state provided");

        let response = handle(
            &mut store,
            &EchoBackend,
            &json!({"action": "save_game", "game_state": {"current_level": [0, 0]}}),
        )
        .await;
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Invalid game state");

        let snapshot = json!({
            "current_level": [1, 1],
            "player_position": [3, 3],
            "player_inventory": {}
        });
        let response = handle(
            &mut store,
            &EchoBackend,
            &json!({"action": "save_game", "game_state": snapshot.to_string()}),
        )
        .await;
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "success");
        assert!(json.get("message").is_none());
        assert_eq!(store.state().current_level, LevelCoord::new(1, 1));
    }

    #[tokio::test]
    async fn test_unknown_action() {
        let mut store = SessionStore::new();
        for raw in [json!({"action": "reboot"}), json!({"hello": "world"})] {
            let response = handle(&mut store, &EchoBackend, &raw).await;
            let json = serde_json::to_value(&response).unwrap();
            assert_eq!(json["error"], "Unknown action");
        }
    }

    #[test]
    fn test_request_from_json() {
        let request =
            ApiRequest::from_json(r#"{"action":"check_puzzle","puzzle_type":"regex"}"#).unwrap();
        match request {
            ApiRequest::CheckPuzzle {
                puzzle_type,
                puzzle_id,
                answer,
            } => {
                assert_eq!(puzzle_type, "regex");
                assert!(puzzle_id.is_empty());
                assert!(answer.is_empty());
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }
}
