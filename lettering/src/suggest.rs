//! Suggestion-service wire types and ingestion.
//!
//! The suggestion service looks at an uploaded page and proposes bubbles.
//! Its output is untrusted: every suggestion becomes a `PartialBubble` and goes
//! through the model's normal clamping path, and anything unparseable is
//! reported as a non-fatal [`SuggestionError`].

#[cfg(test)]
#[path = "suggest_test.rs"]
mod suggest_test;

use serde::{Deserialize, Serialize};

use crate::model::{PartialBubble, Position, angle_from_f64, clamp_font_size};
use crate::shape::ShapeKind;

/// Errors from the suggestion collaborator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SuggestionError {
    /// The service could not be reached or refused the request.
    #[error("suggestion service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with something that is not a suggestion list.
    #[error("malformed suggestions: {0}")]
    Malformed(String),
}

/// One suggested bubble, as produced by the suggestion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSuggestion {
    #[serde(default)]
    pub panel_number: u32,
    /// Why the service placed this bubble here.
    #[serde(default)]
    pub description: String,
    pub suggested_dialogue: String,
    pub position: Position,
    #[serde(default)]
    pub tail_angle: f64,
    #[serde(default)]
    pub tail_length: f64,
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub bubble_scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bubble_type: Option<ShapeKind>,
    pub reading_order: i64,
}

impl SceneSuggestion {
    /// Convert into a partial descriptor for the model to clamp and store.
    #[must_use]
    pub fn into_partial(self) -> PartialBubble {
        PartialBubble {
            text: Some(self.suggested_dialogue),
            position: Some(self.position),
            scale: self.bubble_scale,
            shape_kind: self.bubble_type,
            font_size: self.font_size.map(clamp_font_size),
            tail_angle: Some(angle_from_f64(self.tail_angle)),
            tail_length: Some(self.tail_length),
            show_tail: None,
            z_order: None,
            reading_order: Some(self.reading_order),
            panel: (self.panel_number > 0).then_some(self.panel_number),
            note: (!self.description.is_empty()).then_some(self.description),
        }
    }
}

/// Parse a suggestion list from service or model output.
///
/// Accepts a bare JSON array, an array wrapped in a Markdown code fence, or an
/// object carrying the array under `suggestions`. The result is sorted by
/// reading order.
///
/// # Errors
///
/// Returns [`SuggestionError::Malformed`] when no suggestion array can be read.
pub fn parse_suggestions(text: &str) -> Result<Vec<SceneSuggestion>, SuggestionError> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| SuggestionError::Malformed(e.to_string()))?;
    let array = match value {
        serde_json::Value::Array(_) => value,
        serde_json::Value::Object(mut map) => map
            .remove("suggestions")
            .ok_or_else(|| SuggestionError::Malformed("object has no suggestions field".into()))?,
        other => return Err(SuggestionError::Malformed(format!("expected an array, got {other}"))),
    };

    let mut suggestions: Vec<SceneSuggestion> =
        serde_json::from_value(array).map_err(|e| SuggestionError::Malformed(e.to_string()))?;
    suggestions.sort_by_key(|s| s.reading_order);
    Ok(suggestions)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag line, then the closing fence.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
