//! Dialogue Client
//!
//! Outbound chat-completion client for NPC conversations. The whole
//! transcript is replayed as context on every call, and every failure
//! mode lands on a canned persona line so the player only ever sees
//! in-character text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::dialogue::persona::Persona;
use crate::session::state::ConversationTurn;

/// Configuration for the outbound dialogue service.
#[derive(Debug, Clone)]
pub struct DialogueConfig {
    /// Bearer token. Empty means no service configured; every call
    /// falls straight through to the canned responses.
    pub api_key: String,
    /// Chat-completions endpoint URL.
    pub base_url: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Retries after the first failed attempt.
    pub retries: u32,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            request_timeout: Duration::from_secs(30),
            retries: 2,
        }
    }
}

impl DialogueConfig {
    /// Read the API key from `GROQ_API_KEY`, leaving the client in
    /// fallback-only mode when it is unset.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("GROQ_API_KEY").unwrap_or_default(),
            ..Self::default()
        }
    }
}

/// Why a dialogue completion failed.
#[derive(Debug, Error)]
pub enum DialogueError {
    /// No API key configured.
    #[error("dialogue API key not configured")]
    MissingApiKey,
    /// Transport-level failure, including timeouts.
    #[error("dialogue request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Service answered with a non-success status.
    #[error("dialogue service returned status {0}")]
    BadStatus(StatusCode),
    /// Body parsed but carried no completion.
    #[error("dialogue service returned no completion")]
    EmptyCompletion,
}

/// Produces NPC lines. The HTTP client implements this; tests inject
/// scripted stand-ins.
#[async_trait]
pub trait DialogueBackend: Send + Sync {
    /// Produce the persona's next line given the replayed transcript
    /// and the player's new message.
    async fn complete(
        &self,
        persona: Persona,
        history: &[ConversationTurn],
        message: &str,
    ) -> Result<String, DialogueError>;
}

/// Ask the backend for the persona's next line, falling back to a
/// canned response on any failure.
pub async fn respond(
    backend: &dyn DialogueBackend,
    persona: Persona,
    history: &[ConversationTurn],
    message: &str,
) -> String {
    match backend.complete(persona, history, message).await {
        Ok(line) => line,
        Err(err) => {
            warn!(persona = persona.as_str(), error = %err, "dialogue fallback engaged");
            persona.fallback_line().to_string()
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// HTTP chat-completions client with retry and backoff.
pub struct ChatCompletionsClient {
    config: DialogueConfig,
    http: Client,
}

impl ChatCompletionsClient {
    /// Create a client for the configured service.
    pub fn new(config: DialogueConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn build_messages<'a>(
        &'a self,
        persona: Persona,
        history: &'a [ConversationTurn],
        message: &'a str,
    ) -> Vec<ChatMessage<'a>> {
        let mut messages = Vec::with_capacity(history.len() * 2 + 2);
        messages.push(ChatMessage {
            role: "system",
            content: persona.system_prompt(),
        });
        for turn in history {
            messages.push(ChatMessage {
                role: "user",
                content: &turn.user,
            });
            messages.push(ChatMessage {
                role: "assistant",
                content: &turn.assistant,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: message,
        });
        messages
    }

    async fn request_once(&self, body: &ChatRequest<'_>) -> Result<String, DialogueError> {
        let response = self
            .http
            .post(&self.config.base_url)
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.request_timeout)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DialogueError::BadStatus(status));
        }

        let completion: ChatResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(DialogueError::EmptyCompletion)
    }
}

#[async_trait]
impl DialogueBackend for ChatCompletionsClient {
    async fn complete(
        &self,
        persona: Persona,
        history: &[ConversationTurn],
        message: &str,
    ) -> Result<String, DialogueError> {
        if self.config.api_key.is_empty() {
            return Err(DialogueError::MissingApiKey);
        }

        let body = ChatRequest {
            model: &self.config.model,
            messages: self.build_messages(persona, history, message),
            temperature: 0.7,
            top_p: 0.9,
            max_tokens: 300,
        };

        let mut last_error = DialogueError::EmptyCompletion;
        for attempt in 0..=self.config.retries {
            if attempt > 0 {
                // Backoff grows 500ms per failed attempt.
                tokio::time::sleep(Duration::from_millis(u64::from(attempt) * 500)).await;
            }
            match self.request_once(&body).await {
                Ok(content) => {
                    debug!(
                        persona = persona.as_str(),
                        attempt, "dialogue completion received"
                    );
                    return Ok(content);
                }
                Err(err) => {
                    warn!(
                        persona = persona.as_str(),
                        attempt,
                        error = %err,
                        "dialogue request failed"
                    );
                    last_error = err;
                }
            }
        }
        Err(last_error)
    }
}

// =============================================================================
// TESTS
// =============================================================================
