//! OpenAI-compatible Chat Completions (`{base}/chat/completions`).
//!
//! Images travel as `image_url` parts carrying a `data:` URL, which every
//! OpenAI-compatible vision endpoint accepts. Only the first choice is read.

use serde::{Deserialize, Serialize};

use super::types::{ChatResponse, Content, ContentBlock, LlmError, Message};

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl OpenAiClient {
    pub fn new(http: reqwest::Client, api_key: String, base_url: &str) -> Self {
        let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        Self { http, api_key, endpoint }
    }

    pub async fn chat(
        &self,
        model: &str,
        max_tokens: u32,
        system: &str,
        messages: &[Message],
    ) -> Result<ChatResponse, LlmError> {
        let wire = to_wire_messages(system, messages);
        let request = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest { model, max_tokens, messages: &wire });
        let body = super::send_for_text(request).await?;
        decode_completion(&body)
    }
}

// =============================================================================
// REQUEST
// =============================================================================

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [WireMessage],
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: WireContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireContent {
    Text(String),
    Parts(Vec<WirePart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WirePart {
    Text { text: String },
    ImageUrl { image_url: WireImageUrl },
}

#[derive(Debug, Serialize)]
struct WireImageUrl {
    url: String,
}

fn to_wire_part(block: &ContentBlock) -> Option<WirePart> {
    match block {
        ContentBlock::Text { text } => Some(WirePart::Text { text: text.clone() }),
        ContentBlock::Image { source } => Some(WirePart::ImageUrl { image_url: WireImageUrl { url: source.data_url() } }),
        ContentBlock::Unknown => None,
    }
}

/// System prompt first, then each message; messages left with no
/// sendable parts are dropped.
fn to_wire_messages(system: &str, messages: &[Message]) -> Vec<WireMessage> {
    let system = (!system.trim().is_empty())
        .then(|| WireMessage { role: "system".into(), content: WireContent::Text(system.to_string()) });

    let rest = messages.iter().filter_map(|message| {
        let content = match &message.content {
            Content::Text(text) => WireContent::Text(text.clone()),
            Content::Blocks(blocks) => {
                let parts: Vec<WirePart> = blocks.iter().filter_map(to_wire_part).collect();
                if parts.is_empty() {
                    return None;
                }
                WireContent::Parts(parts)
            }
        };
        Some(WireMessage { role: message.role.clone(), content })
    });

    system.into_iter().chain(rest).collect()
}

// =============================================================================
// REPLY
// =============================================================================

#[derive(Deserialize)]
struct CompletionReply {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Default)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

pub(crate) fn decode_completion(body: &str) -> Result<ChatResponse, LlmError> {
    let reply: CompletionReply = serde_json::from_str(body).map_err(|e| LlmError::Decode(e.to_string()))?;
    let Some(choice) = reply.choices.into_iter().next() else {
        return Err(LlmError::Decode("no choices in completion".into()));
    };

    let content = choice
        .message
        .and_then(|m| m.content)
        .filter(|text| !text.is_empty())
        .map(|text| vec![ContentBlock::Text { text }])
        .unwrap_or_default();
    let stop_reason = match choice.finish_reason.as_deref() {
        Some("length") => "max_tokens",
        _ => "end_turn",
    };
    let usage = reply.usage.unwrap_or_default();

    Ok(ChatResponse {
        content,
        model: reply.model,
        stop_reason: stop_reason.into(),
        input_tokens: usage.prompt_tokens,
        output_tokens: usage.completion_tokens,
    })
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
