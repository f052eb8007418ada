//! Client Module
//!
//! The world as one player sees it: their authoritative session merged
//! with the level on screen and the presence overlay mirrored from the
//! relay hub.
//!
//! ## Module Structure
//!
//! - `view`: door locks, exit flow, peers, and notices in one place
//! - `net`: the hub connection and the pump between it and the view

pub mod net;
pub mod view;

pub use net::{pump, NetError, RelayConnection, HEARTBEAT_INTERVAL};
pub use view::{ChatLine, ExitOutcome, PeerPresence, WorldView, LOCKED_MESSAGE};
