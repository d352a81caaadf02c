//! Anthropic Messages API (`/v1/messages`).
//!
//! The neutral [`Message`] type already matches Anthropic's wire shape, image
//! blocks included, so requests serialize straight through.

use super::types::{ChatResponse, ContentBlock, LlmError, Message};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
}

impl AnthropicClient {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self { http, api_key }
    }

    pub async fn chat(
        &self,
        model: &str,
        max_tokens: u32,
        system: &str,
        messages: &[Message],
    ) -> Result<ChatResponse, LlmError> {
        let request = self
            .http
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&MessagesRequest { model, max_tokens, system, messages });
        let body = super::send_for_text(request).await?;
        decode_reply(&body)
    }
}

#[derive(serde::Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [Message],
}

#[derive(serde::Deserialize)]
struct MessagesReply {
    content: Vec<ContentBlock>,
    model: String,
    #[serde(default)]
    stop_reason: Option<String>,
    usage: TokenUsage,
}

#[derive(serde::Deserialize)]
struct TokenUsage {
    input_tokens: u64,
    output_tokens: u64,
}

fn decode_reply(body: &str) -> Result<ChatResponse, LlmError> {
    let reply: MessagesReply = serde_json::from_str(body).map_err(|e| LlmError::Decode(e.to_string()))?;
    let mut content = reply.content;
    content.retain(|block| !matches!(block, ContentBlock::Unknown));

    Ok(ChatResponse {
        content,
        model: reply.model,
        stop_reason: reply.stop_reason.unwrap_or_else(|| "end_turn".into()),
        input_tokens: reply.usage.input_tokens,
        output_tokens: reply.usage.output_tokens,
    })
}

#[cfg(test)]
#[path = "anthropic_test.rs"]
mod tests;
