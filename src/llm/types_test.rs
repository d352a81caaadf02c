use super::*;
use crate::error::ErrorCode;

// =============================================================================
// LlmError codes
// =============================================================================

#[test]
fn error_codes_are_stable() {
    let cases = [
        (LlmError::Config("bad".into()), "E_LLM_CONFIG"),
        (LlmError::MissingApiKey { var: "KEY".into() }, "E_LLM_MISSING_KEY"),
        (LlmError::Transport("timeout".into()), "E_LLM_TRANSPORT"),
        (LlmError::Status { status: 500, body: "oops".into() }, "E_LLM_STATUS"),
        (LlmError::Decode("json".into()), "E_LLM_DECODE"),
        (LlmError::ClientBuild("tls".into()), "E_LLM_CLIENT_BUILD"),
    ];
    for (err, code) in cases {
        assert_eq!(err.error_code(), code, "{err}");
    }
}

#[test]
fn retryable_transport_and_server_errors() {
    assert!(LlmError::Transport("conn refused".into()).retryable());
    assert!(LlmError::Status { status: 429, body: String::new() }.retryable());
    assert!(LlmError::Status { status: 503, body: String::new() }.retryable());
    assert!(LlmError::Status { status: 529, body: String::new() }.retryable());
}

#[test]
fn not_retryable_client_errors() {
    assert!(!LlmError::Status { status: 400, body: String::new() }.retryable());
    assert!(!LlmError::Status { status: 401, body: String::new() }.retryable());
    assert!(!LlmError::Decode("x".into()).retryable());
    assert!(!LlmError::MissingApiKey { var: "K".into() }.retryable());
}

#[test]
fn error_display() {
    let err = LlmError::MissingApiKey { var: "ANTHROPIC_API_KEY".into() };
    assert_eq!(err.to_string(), "missing API key: ANTHROPIC_API_KEY is not set");
    let err = LlmError::Status { status: 502, body: "gateway".into() };
    assert_eq!(err.to_string(), "provider answered 502");
}

// =============================================================================
// Content blocks
// =============================================================================

#[test]
fn image_block_serializes_as_base64_source() {
    let block = ContentBlock::Image { source: ImageSource::base64("image/png", "AAAA") };
    let json = serde_json::to_value(&block).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "type": "image",
            "source": { "type": "base64", "media_type": "image/png", "data": "AAAA" }
        })
    );
}

#[test]
fn image_source_data_url() {
    assert_eq!(ImageSource::base64("image/jpeg", "QUJD").data_url(), "data:image/jpeg;base64,QUJD");
}

#[test]
fn unknown_block_deserializes() {
    let block: ContentBlock = serde_json::from_str(r#"{"type":"thinking","thinking":"hmm"}"#).unwrap();
    assert!(matches!(block, ContentBlock::Unknown));
}

#[test]
fn user_message_has_blocks() {
    let msg = Message::user(vec![ContentBlock::Text { text: "hi".into() }]);
    assert_eq!(msg.role, "user");
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["content"][0]["type"], "text");
}

#[test]
fn text_content_serializes_as_string() {
    let msg = Message { role: "user".into(), content: Content::Text("plain".into()) };
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["content"], "plain");
}

// =============================================================================
// ChatResponse::text
// =============================================================================

#[test]
fn response_text_joins_text_blocks() {
    let resp = ChatResponse {
        content: vec![
            ContentBlock::Text { text: "[".into() },
            ContentBlock::Unknown,
            ContentBlock::Text { text: "]".into() },
        ],
        model: "m".into(),
        stop_reason: "end_turn".into(),
        input_tokens: 1,
        output_tokens: 1,
    };
    assert_eq!(resp.text(), "[]");
}

#[test]
fn truncated_on_max_tokens() {
    let mut resp = ChatResponse {
        content: Vec::new(),
        model: String::new(),
        stop_reason: "max_tokens".into(),
        input_tokens: 0,
        output_tokens: 4096,
    };
    assert!(resp.truncated());
    resp.stop_reason = "end_turn".into();
    assert!(!resp.truncated());
}

#[test]
fn response_text_empty_without_text_blocks() {
    let resp = ChatResponse {
        content: Vec::new(),
        model: String::new(),
        stop_reason: String::new(),
        input_tokens: 0,
        output_tokens: 0,
    };
    assert!(resp.text().is_empty());
}
