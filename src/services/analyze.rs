//! Page analysis: page image → vision LLM → ordered bubble suggestions.
//!
//! DESIGN
//! ======
//! The model is asked to act as a manga editor and letterer and to answer with
//! a bare JSON array of suggestions. Its reply is untrusted text: it goes
//! through `lettering::suggest::parse_suggestions`, the same ingestion path
//! the editor uses, so clamping and ordering rules live in one place.

use lettering::suggest::{SceneSuggestion, SuggestionError, parse_suggestions};
use lettering::view::{PageImage, is_supported_mime};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::llm::LlmChat;
use crate::llm::types::{ContentBlock, ImageSource, LlmError, Message};

pub const SYSTEM_PROMPT: &str = "You are a manga editor-in-chief and lettering specialist. \
You bring pages to life with speech balloons and narration boxes, placed the way a professional letterer would. \
You always answer with a single JSON array and nothing else.";

pub const INSTRUCTIONS: &str = r#"Letter this page.

GUIDELINES:
1. IF THERE ARE CHARACTERS: identify who is speaking and write dialogue that fits their expression. The tailAngle must point at the speaker.
2. IF THERE IS NO CLEAR DIALOGUE: read the mood of the image and write a poetic, epic or descriptive narration (inner monologue) that helps tell what is happening in the scene. Example: in an empty forest, "The silence here is deafening... something is watching."
3. PLACEMENT: put balloons in empty areas (negative space) so they do not cover important details of the art.
4. READING ORDER: number readingOrder following the Japanese convention (right to left, top to bottom).

Return a strict JSON array of objects with:
- panelNumber: panel number.
- description: short note on why this line or narration goes here.
- suggestedDialogue: the balloon text.
- position: {x, y} as percentages of the page (0-100).
- tailAngle: angle in degrees (0-360, 0 points up, clockwise). For narration, point at the center of the panel.
- tailLength: tail length in pixels (40-100).
- fontSize: suggested font size (12-20).
- bubbleScale: suggested balloon width as a percentage of the page (20-60).
- bubbleType: optional, one of speech, thought, scream, narrative, whisper.
- readingOrder: sequential reading order."#;

// =============================================================================
// TYPES
// =============================================================================

/// Request body for `POST /api/pages/analyze`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Base64 payload or full `data:` URL.
    pub image: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub suggestions: Vec<SceneSuggestion>,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error("page image exceeds the upload limit")]
    PayloadTooLarge,
    #[error("image is empty")]
    EmptyImage,
    #[error("unsupported image type: {0}")]
    UnsupportedMime(String),
    #[error("LLM not configured")]
    LlmNotConfigured,
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Suggestions(#[from] SuggestionError),
}

impl crate::error::ErrorCode for AnalyzeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "E_BAD_REQUEST",
            Self::PayloadTooLarge => "E_PAYLOAD_TOO_LARGE",
            Self::EmptyImage => "E_EMPTY_IMAGE",
            Self::UnsupportedMime(_) => "E_UNSUPPORTED_MIME",
            Self::LlmNotConfigured => "E_LLM_NOT_CONFIGURED",
            Self::Llm(_) => "E_LLM_ERROR",
            Self::Suggestions(_) => "E_MALFORMED_SUGGESTIONS",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Llm(e) if e.retryable())
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Ask the model for bubble suggestions on one page.
///
/// Returns suggestions sorted by reading order. An empty list is a valid
/// answer and means the editor starts in manual mode.
///
/// # Errors
///
/// Input errors ([`AnalyzeError::EmptyImage`], [`AnalyzeError::UnsupportedMime`])
/// are detected before any network call. Provider failures surface as
/// [`AnalyzeError::Llm`] and unusable replies as [`AnalyzeError::Suggestions`].
pub async fn analyze_page(
    llm: &dyn LlmChat,
    max_tokens: u32,
    image: &str,
    mime_type: &str,
) -> Result<Vec<SceneSuggestion>, AnalyzeError> {
    let mime = mime_type.trim().to_ascii_lowercase();
    if !is_supported_mime(&mime) {
        return Err(AnalyzeError::UnsupportedMime(mime_type.to_string()));
    }

    let page = PageImage::new(image.trim(), mime.as_str());
    let payload = page.base64_payload();
    if payload.is_empty() {
        return Err(AnalyzeError::EmptyImage);
    }
    info!(mime = %mime, payload_len = payload.len(), "analyze: page received");

    let messages = [Message::user(vec![
        ContentBlock::Image { source: ImageSource::base64(mime.as_str(), payload) },
        ContentBlock::Text { text: INSTRUCTIONS.to_string() },
    ])];
    let response = llm.chat(max_tokens, SYSTEM_PROMPT, &messages).await?;
    info!(
        model = %response.model,
        stop_reason = %response.stop_reason,
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "analyze: llm response"
    );
    if response.truncated() {
        warn!(max_tokens, "analyze: reply hit the token limit");
    }

    let suggestions = parse_suggestions(&response.text()).inspect_err(|e| {
        warn!(error = %e, "analyze: unusable llm reply");
    })?;
    info!(count = suggestions.len(), "analyze: suggestions ready");
    Ok(suggestions)
}

#[cfg(test)]
#[path = "analyze_test.rs"]
mod tests;
