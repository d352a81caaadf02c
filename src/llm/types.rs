//! Provider-neutral message types and errors.
//!
//! Both providers translate to and from these shapes, so the analysis
//! service never sees a vendor wire format.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("invalid LLM config: {0}")]
    Config(String),

    /// `var` is either `LLM_API_KEY_ENV` itself or the variable it names.
    #[error("missing API key: {var} is not set")]
    MissingApiKey { var: String },

    /// Connection, timeout, or body read failure.
    #[error("provider unreachable: {0}")]
    Transport(String),

    #[error("provider answered {status}")]
    Status { status: u16, body: String },

    /// The provider answered 200 with a body we cannot read.
    #[error("unreadable provider reply: {0}")]
    Decode(String),

    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

impl crate::error::ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "E_LLM_CONFIG",
            Self::MissingApiKey { .. } => "E_LLM_MISSING_KEY",
            Self::Transport(_) => "E_LLM_TRANSPORT",
            Self::Status { .. } => "E_LLM_STATUS",
            Self::Decode(_) => "E_LLM_DECODE",
            Self::ClientBuild(_) => "E_LLM_CLIENT_BUILD",
        }
    }

    /// Transport failures, rate limits, and provider-side errors (including
    /// Anthropic's 529 overload) are worth another try.
    fn retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

// =============================================================================
// CONTENT
// =============================================================================

/// Base64 image payload, in the Anthropic `source` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSource {
    #[serde(rename = "type")]
    pub source_type: String,
    pub media_type: String,
    pub data: String,
}

impl ImageSource {
    pub fn base64(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self { source_type: "base64".into(), media_type: media_type.into(), data: data.into() }
    }

    /// The payload as a `data:` URL, for providers that take image URLs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },

    /// An inline page image for a vision-capable model.
    Image { source: ImageSource },

    /// Thinking, tool use, or anything newer; dropped by the parsers.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: Content,
}

impl Message {
    pub fn user(blocks: Vec<ContentBlock>) -> Self {
        Self { role: "user".into(), content: Content::Blocks(blocks) }
    }
}

/// One completed model turn, normalized across providers.
///
/// `stop_reason` uses Anthropic's vocabulary (`end_turn`, `max_tokens`).
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: Vec<ContentBlock>,
    pub model: String,
    pub stop_reason: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl ChatResponse {
    /// Concatenated text of every text block.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for block in &self.content {
            if let ContentBlock::Text { text } = block {
                out.push_str(text);
            }
        }
        out
    }

    /// Whether the model ran out of output budget mid-answer.
    #[must_use]
    pub fn truncated(&self) -> bool {
        self.stop_reason == "max_tokens"
    }
}

// =============================================================================
// CHAT TRAIT
// =============================================================================

/// A single-turn chat with a vision-capable model. Mocked in tests.
#[async_trait::async_trait]
pub trait LlmChat: Send + Sync {
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the provider cannot be reached, refuses the
    /// request, or answers with something unreadable.
    async fn chat(&self, max_tokens: u32, system: &str, messages: &[Message]) -> Result<ChatResponse, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
