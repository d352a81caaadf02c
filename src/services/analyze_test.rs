use lettering::shape::ShapeKind;

use super::*;
use crate::error::ErrorCode;
use crate::llm::types::Content;
use crate::state::test_helpers::{MockLlm, text_response};

const REPLY: &str = r#"```json
[
  { "panelNumber": 1, "description": "Rival enters", "suggestedDialogue": "You're late.",
    "position": { "x": 30, "y": 15 }, "tailAngle": 135, "tailLength": 60,
    "fontSize": 16, "bubbleScale": 30, "readingOrder": 2 },
  { "panelNumber": 1, "description": "Scene setter", "suggestedDialogue": "Tokyo, midnight.",
    "position": { "x": 85, "y": 5 }, "tailAngle": 180, "tailLength": 40,
    "fontSize": 14, "bubbleScale": 25, "bubbleType": "narrative", "readingOrder": 1 }
]
```"#;

// =========================================================================
// happy path
// =========================================================================

#[tokio::test]
async fn suggestions_sorted_by_reading_order() {
    let llm = MockLlm::replying(REPLY);
    let suggestions = analyze_page(&llm, 4096, "data:image/png;base64,iVBORw0KGgo=", "image/png")
        .await
        .unwrap();
    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0].suggested_dialogue, "Tokyo, midnight.");
    assert_eq!(suggestions[0].bubble_type, Some(ShapeKind::Narrative));
    assert_eq!(suggestions[1].reading_order, 2);
}

#[tokio::test]
async fn sends_image_then_instructions() {
    let llm = MockLlm::replying("[]");
    analyze_page(&llm, 1234, "data:image/jpeg;base64,/9j/4AAQ", "image/jpeg")
        .await
        .unwrap();

    let calls = llm.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (max_tokens, system, messages) = &calls[0];
    assert_eq!(*max_tokens, 1234);
    assert!(system.contains("lettering specialist"));
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, "user");
    let Content::Blocks(blocks) = &messages[0].content else {
        panic!("expected blocks");
    };
    assert!(matches!(
        &blocks[0],
        ContentBlock::Image { source } if source.data == "/9j/4AAQ" && source.media_type == "image/jpeg"
    ));
    assert!(matches!(&blocks[1], ContentBlock::Text { text } if text.contains("readingOrder")));
}

#[tokio::test]
async fn bare_base64_is_sent_as_is() {
    let llm = MockLlm::replying("[]");
    analyze_page(&llm, 10, "UklGRg==", "image/webp").await.unwrap();
    let calls = llm.calls.lock().unwrap();
    let Content::Blocks(blocks) = &calls[0].2[0].content else {
        panic!("expected blocks");
    };
    assert!(matches!(&blocks[0], ContentBlock::Image { source } if source.data == "UklGRg=="));
}

#[tokio::test]
async fn mime_is_normalized() {
    let llm = MockLlm::replying("[]");
    analyze_page(&llm, 10, "R0lG", " IMAGE/GIF ").await.unwrap();
    let calls = llm.calls.lock().unwrap();
    let Content::Blocks(blocks) = &calls[0].2[0].content else {
        panic!("expected blocks");
    };
    assert!(matches!(&blocks[0], ContentBlock::Image { source } if source.media_type == "image/gif"));
}

#[tokio::test]
async fn empty_reply_means_no_suggestions() {
    let llm = MockLlm::replying("");
    let suggestions = analyze_page(&llm, 10, "iVBO", "image/png").await.unwrap();
    assert!(suggestions.is_empty());
}

// =========================================================================
// failures
// =========================================================================

#[tokio::test]
async fn unsupported_mime_skips_llm() {
    let llm = MockLlm::replying(REPLY);
    let err = analyze_page(&llm, 10, "JVBERi0=", "application/pdf").await.unwrap_err();
    assert!(matches!(err, AnalyzeError::UnsupportedMime(ref m) if m == "application/pdf"));
    assert_eq!(err.error_code(), "E_UNSUPPORTED_MIME");
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn empty_image_skips_llm() {
    let llm = MockLlm::replying(REPLY);
    for image in ["", "   ", "data:image/png;base64,"] {
        let err = analyze_page(&llm, 10, image, "image/png").await.unwrap_err();
        assert!(matches!(err, AnalyzeError::EmptyImage), "{image:?}");
    }
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn llm_failure_propagates() {
    let llm = MockLlm::new(vec![Err(LlmError::Status { status: 529, body: "overloaded".into() })]);
    let err = analyze_page(&llm, 10, "iVBO", "image/png").await.unwrap_err();
    assert!(matches!(err, AnalyzeError::Llm(_)));
    assert_eq!(err.error_code(), "E_LLM_ERROR");
    assert!(err.retryable());
}

#[tokio::test]
async fn prose_reply_is_malformed() {
    let llm = MockLlm::new(vec![Ok(text_response("Sorry, I can't see any panels."))]);
    let err = analyze_page(&llm, 10, "iVBO", "image/png").await.unwrap_err();
    assert!(matches!(err, AnalyzeError::Suggestions(SuggestionError::Malformed(_))));
    assert_eq!(err.error_code(), "E_MALFORMED_SUGGESTIONS");
    assert!(!err.retryable());
}

#[test]
fn error_codes_cover_input_errors() {
    assert_eq!(AnalyzeError::BadRequest("x".into()).error_code(), "E_BAD_REQUEST");
    assert_eq!(AnalyzeError::EmptyImage.error_code(), "E_EMPTY_IMAGE");
    assert_eq!(AnalyzeError::LlmNotConfigured.error_code(), "E_LLM_NOT_CONFIGURED");
    assert_eq!(AnalyzeError::LlmNotConfigured.to_string(), "LLM not configured");
}

#[test]
fn instructions_carry_lettering_rules() {
    assert!(INSTRUCTIONS.contains("negative space"));
    assert!(INSTRUCTIONS.contains("right to left, top to bottom"));
    assert!(INSTRUCTIONS.contains("point at the center of the panel"));
}
