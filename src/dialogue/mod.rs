//! Dialogue Module
//!
//! NPC conversations backed by an external chat-completion service,
//! with canned in-character fallbacks so an outage never breaks the
//! fiction.
//!
//! ## Module Structure
//!
//! - `persona`: the five NPC archetypes, their prompts and canned lines
//! - `client`: outbound HTTP client, retry policy, and the backend trait

pub mod client;
pub mod persona;

pub use client::{respond, ChatCompletionsClient, DialogueBackend, DialogueConfig, DialogueError};
pub use persona::Persona;
