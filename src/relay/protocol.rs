//! Relay Messages
//!
//! Wire format for the realtime hub over WebSocket. Everything travels
//! as plain JSON text frames tagged by a `type` field. The hub forwards
//! events between clients on the same level and never validates payloads
//! beyond the level used for fan-out; per-session correctness comes from
//! each client's own endpoint checks.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::coord::{GridPos, LevelCoord};

// =============================================================================
// CLIENT IDENTITY
// =============================================================================

/// Connection identity, minted by the hub at accept time and announced
/// to the client in the `connected` hello.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub Uuid);

impl ClientId {
    /// Mint a fresh id.
    pub fn random() -> Self {
        ClientId(Uuid::new_v4())
    }

    /// On-screen handle: `AGENT_` plus the first six characters of the
    /// id, the form peers render over each other's avatars.
    pub fn display_name(&self) -> String {
        let hex = self.0.simple().to_string();
        format!("AGENT_{}", &hex[..6])
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One roster entry: a peer's last announced whereabouts.
///
/// `level` is `None` until the peer's first `change_level`; `position`
/// is only meaningful alongside a level, so receivers filter on the
/// level before reading it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeerState {
    /// The peer's connection id.
    pub id: ClientId,
    /// Last announced level, if any.
    pub level: Option<LevelCoord>,
    /// Last announced tile position within that level.
    pub position: GridPos,
    /// Last announced facing, radians about the vertical axis.
    pub rotation: f32,
}

// =============================================================================
// CLIENT -> HUB EVENTS
// =============================================================================

/// Events sent from a client to the hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Announce arrival on a level. The hub updates the sender's record
    /// and tells peers already on that level.
    ChangeLevel {
        /// Destination level.
        level: LevelCoord,
        /// Spawn tile within it.
        position: GridPos,
    },

    /// Position heartbeat, sent on a fixed cadence whether or not the
    /// player moved.
    UpdatePosition {
        /// Current tile.
        position: GridPos,
        /// Current facing, radians.
        rotation: f32,
        /// Level the position belongs to.
        level: LevelCoord,
    },

    /// Assert a puzzle as solved so peers can mirror it.
    CompletePuzzle {
        /// Stable puzzle id.
        puzzle_id: String,
        /// Level the puzzle lives on.
        level: LevelCoord,
    },

    /// Assert a door as unlocked so peers can mirror it.
    UnlockDoor {
        /// Door or exit-group id string.
        door_id: String,
        /// Level the door lives on.
        level: LevelCoord,
    },

    /// Chat line for everyone on the same level.
    SendChatMessage {
        /// The line itself.
        message: String,
        /// Level scope for delivery.
        level: LevelCoord,
    },
}

// =============================================================================
// HUB -> CLIENT EVENTS
// =============================================================================

/// Events sent from the hub to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Hello carrying the id the hub minted for this connection.
    Connected {
        /// The receiver's own id.
        id: ClientId,
    },

    /// Current roster, sent once after the hello. Includes the receiver
    /// itself; clients filter out their own id.
    Players {
        /// Every connected client's last known whereabouts.
        players: Vec<PeerState>,
    },

    /// A peer announced itself on the receiver's level.
    PlayerJoined {
        /// The arriving peer.
        player: PeerState,
    },

    /// A peer on the receiver's level moved.
    PlayerMoved {
        /// Which peer.
        id: ClientId,
        /// New tile.
        position: GridPos,
        /// New facing, radians.
        rotation: f32,
    },

    /// A client disconnected. Sent to everyone; receivers that never saw
    /// the peer simply ignore it.
    PlayerLeft {
        /// The departed client.
        id: ClientId,
    },

    /// A peer asserted a door unlock.
    DoorUnlocked {
        /// Door or exit-group id string.
        door_id: String,
        /// Level the door lives on.
        level: LevelCoord,
    },

    /// A peer asserted a puzzle completion.
    PuzzleCompleted {
        /// Stable puzzle id.
        puzzle_id: String,
        /// Level the puzzle lives on.
        level: LevelCoord,
    },

    /// Chat line from a peer on the same level.
    ChatMessage {
        /// Sender id; receivers derive the display handle from it.
        from: ClientId,
        /// The line itself.
        message: String,
    },
}

// =============================================================================
// SERIALIZATION HELPERS
// =============================================================================

impl ClientEvent {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerEvent {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_json_roundtrip() {
        let event = ClientEvent::UpdatePosition {
            position: GridPos::new(7, 12),
            rotation: 1.5,
            level: LevelCoord::new(2, -1),
        };

        let json = event.to_json().unwrap();
        let parsed = ClientEvent::from_json(&json).unwrap();

        if let ClientEvent::UpdatePosition {
            position, level, ..
        } = parsed
        {
            assert_eq!(position, GridPos::new(7, 12));
            assert_eq!(level, LevelCoord::new(2, -1));
        } else {
            panic!("Wrong event type");
        }
    }

    #[test]
    fn test_server_event_json_roundtrip() {
        let id = ClientId::random();
        let event = ServerEvent::ChatMessage {
            from: id,
            message: "anyone else in this sector?".to_string(),
        };

        let json = event.to_json().unwrap();
        let parsed = ServerEvent::from_json(&json).unwrap();

        if let ServerEvent::ChatMessage { from, message } = parsed {
            assert_eq!(from, id);
            assert_eq!(message, "anyone else in this sector?");
        } else {
            panic!("Wrong event type");
        }
    }

    #[test]
    fn test_event_tags_are_snake_case() {
        let level = LevelCoord::origin();
        let position = GridPos::new(10, 18);
        let cases = vec![
            (
                ClientEvent::ChangeLevel { level, position }.to_json().unwrap(),
                "change_level",
            ),
            (
                ClientEvent::CompletePuzzle {
                    puzzle_id: "puzzle_1_0_4_4".to_string(),
                    level,
                }
                .to_json()
                .unwrap(),
                "complete_puzzle",
            ),
            (
                ClientEvent::UnlockDoor {
                    door_id: "door_1_0_north".to_string(),
                    level,
                }
                .to_json()
                .unwrap(),
                "unlock_door",
            ),
            (
                ClientEvent::SendChatMessage {
                    message: "hi".to_string(),
                    level,
                }
                .to_json()
                .unwrap(),
                "send_chat_message",
            ),
            (
                ServerEvent::PlayerLeft {
                    id: ClientId::random(),
                }
                .to_json()
                .unwrap(),
                "player_left",
            ),
            (
                ServerEvent::PuzzleCompleted {
                    puzzle_id: "puzzle_1_0_4_4".to_string(),
                    level,
                }
                .to_json()
                .unwrap(),
                "puzzle_completed",
            ),
        ];

        for (json, tag) in cases {
            assert!(json.contains(tag), "{json} missing tag {tag}");
        }
    }

    #[test]
    fn test_client_id_serializes_transparent() {
        let id = ClientId::random();
        let json = serde_json::to_string(&id).unwrap();
        // A bare JSON string, not an object.
        assert!(json.starts_with('"') && json.ends_with('"'));

        let back: ClientId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_display_name_shape() {
        let id = ClientId::random();
        let name = id.display_name();
        assert_eq!(name.len(), "AGENT_".len() + 6);
        assert!(name.starts_with("AGENT_"));
        assert!(name["AGENT_".len()..]
            .chars()
            .all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_roster_entry_before_first_level() {
        let event = ServerEvent::Players {
            players: vec![PeerState {
                id: ClientId::random(),
                level: None,
                position: GridPos::new(0, 0),
                rotation: 0.0,
            }],
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "players");
        assert!(json["players"][0]["level"].is_null());
        assert_eq!(json["players"][0]["position"], serde_json::json!([0, 0]));
    }

    #[test]
    fn test_level_coord_rides_as_pair() {
        let event = ClientEvent::UnlockDoor {
            door_id: "exit_2_3_9_0".to_string(),
            level: LevelCoord::new(2, 3),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["level"], serde_json::json!([2, 3]));
        assert_eq!(json["door_id"], "exit_2_3_9_0");
    }
}
