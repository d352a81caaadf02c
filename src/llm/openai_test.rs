use super::*;
use crate::llm::types::ImageSource;

// ===== reply decoding =====

#[test]
fn cc_parse_text_response() {
    let json = serde_json::json!({
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": "```json\n[]\n```" },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5 }
    })
    .to_string();
    let resp = decode_completion(&json).unwrap();
    assert_eq!(resp.content.len(), 1);
    assert_eq!(resp.text(), "```json\n[]\n```");
    assert_eq!(resp.stop_reason, "end_turn");
    assert_eq!(resp.input_tokens, 10);
    assert_eq!(resp.output_tokens, 5);
    assert_eq!(resp.model, "gpt-4o");
}

#[test]
fn cc_parse_length_finish() {
    let json = serde_json::json!({
        "model": "gpt-4o",
        "choices": [{ "message": { "content": "[{" }, "finish_reason": "length" }]
    })
    .to_string();
    let resp = decode_completion(&json).unwrap();
    assert_eq!(resp.stop_reason, "max_tokens");
    assert_eq!(resp.input_tokens, 0);
}

#[test]
fn cc_parse_null_content_is_empty() {
    let json = serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": null }, "finish_reason": "stop" }]
    })
    .to_string();
    let resp = decode_completion(&json).unwrap();
    assert!(resp.content.is_empty());
}

#[test]
fn cc_parse_missing_choices() {
    let json = serde_json::json!({ "model": "gpt-4o", "choices": [] }).to_string();
    assert!(matches!(decode_completion(&json), Err(LlmError::Decode(_))));
}

#[test]
fn cc_parse_invalid_json() {
    assert!(matches!(decode_completion("<html>"), Err(LlmError::Decode(_))));
}

// ===== request building =====

#[test]
fn system_prompt_leads() {
    let msgs = to_wire_messages("be terse", &[]);
    assert_eq!(msgs.len(), 1);
    let json = serde_json::to_value(&msgs[0]).unwrap();
    assert_eq!(json, serde_json::json!({ "role": "system", "content": "be terse" }));
}

#[test]
fn blank_system_prompt_omitted() {
    let messages = [Message { role: "user".into(), content: Content::Text("hi".into()) }];
    let msgs = to_wire_messages("  ", &messages);
    assert_eq!(msgs.len(), 1);
    assert_eq!(msgs[0].role, "user");
}

#[test]
fn image_becomes_data_url_part() {
    let messages = [Message::user(vec![
        ContentBlock::Image { source: ImageSource::base64("image/png", "iVBO") },
        ContentBlock::Text { text: "Letter this page.".into() },
    ])];
    let msgs = to_wire_messages("sys", &messages);
    assert_eq!(msgs.len(), 2);
    let json = serde_json::to_value(&msgs[1]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "role": "user",
            "content": [
                { "type": "image_url", "image_url": { "url": "data:image/png;base64,iVBO" } },
                { "type": "text", "text": "Letter this page." }
            ]
        })
    );
}

#[test]
fn message_with_only_unknown_blocks_dropped() {
    let messages = [Message::user(vec![ContentBlock::Unknown])];
    assert!(to_wire_messages("", &messages).is_empty());
}
