//! CompletionBackend trait: the abstraction over the text-generation service.
//!
//! A backend receives a fixed system instruction plus one assembled prompt
//! and returns the concatenated text of the reply. Exactly one upstream call
//! per `complete()`; callers never retry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CompletionError;

/// A single completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Fixed system instruction for the persona and its rules.
    pub system_instruction: String,

    /// The assembled prompt, sent as the sole user turn.
    pub prompt: String,

    /// Temperature (low values keep replies close to the curriculum).
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Cap on generated tokens.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_output_tokens() -> u32 {
    2048
}

impl CompletionRequest {
    pub fn new(system_instruction: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            prompt: prompt.into(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }

    pub fn with_generation(mut self, temperature: f32, max_output_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_output_tokens = max_output_tokens;
        self
    }
}

/// The core CompletionBackend trait.
///
/// The pipeline calls `complete()` without knowing which service is behind it.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// A human-readable name for this backend (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Send the request and return the raw reply text.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<String, CompletionError>;
}
