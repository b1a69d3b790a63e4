//! Extraction endpoint client abstraction.

mod gemini;

pub use gemini::{GeminiClient, GeminiConfig};

use async_trait::async_trait;

use crate::classify::MimeType;
use crate::error::ExtractionError;

/// What the model reads alongside the prompt.
#[derive(Debug, Clone)]
pub enum ExtractionPayload {
    /// Raw document bytes for a multimodal model.
    Vision { mime: MimeType, data_base64: String },
    /// Text already embedded in the prompt; nothing is attached.
    Text,
}

impl ExtractionPayload {
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Vision { .. } => "vision",
            Self::Text => "text",
        }
    }
}

/// A generative model that turns a document and a prompt into reply text.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// One request, no retries. Returns the raw reply text.
    async fn generate(
        &self,
        payload: &ExtractionPayload,
        prompt: &str,
    ) -> Result<String, ExtractionError>;
}
