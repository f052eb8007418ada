//! Relay Layer
//!
//! WebSocket hub for realtime presence between agents. This layer is
//! **advisory** - it mirrors assertions between clients and never owns
//! game state; each session's own endpoint checks stay authoritative.

pub mod hub;
pub mod protocol;

pub use hub::{HubConfig, HubError, RelayHub};
pub use protocol::{ClientEvent, ClientId, PeerState, ServerEvent};
