//! AI client seam.
//!
//! [`TextGenerator`] is the only boundary the study pipeline talks to; the
//! hosted provider lives behind [`GeminiClient`] and tests substitute stubs.

mod gemini;

pub use gemini::GeminiClient;

use crate::error::StudyError;

/// Raw text returned by the model for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiResponse {
    pub raw_text: String,
}

impl AiResponse {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
        }
    }
}

/// Sends one prompt, returns one completion. Blocking; never retries.
#[cfg_attr(test, mockall::automock)]
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str, max_output_tokens: u32) -> Result<AiResponse, StudyError>;
}
