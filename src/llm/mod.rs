//! LLM: vision-model adapter behind page analysis.
//!
//! DESIGN
//! ======
//! Configuration comes from environment variables. `LlmClient` holds one of
//! two provider clients, picked by `LLM_PROVIDER`; handlers only see the
//! [`LlmChat`] trait so tests can substitute a mock. Both providers share the
//! HTTP client setup and status handling below.

pub mod anthropic;
pub mod config;
pub mod openai;
pub mod types;

use std::time::Duration;

use config::{LlmConfig, LlmProviderKind, LlmTimeouts};
pub use types::LlmChat;
use types::{ChatResponse, LlmError, Message};

// =============================================================================
// SHARED HTTP
// =============================================================================

fn http_client(timeouts: LlmTimeouts) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeouts.request_secs))
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .build()
        .map_err(|e| LlmError::ClientBuild(e.to_string()))
}

/// Send a prepared request and return the body of a 2xx reply.
async fn send_for_text(request: reqwest::RequestBuilder) -> Result<String, LlmError> {
    let response = request
        .send()
        .await
        .map_err(|e| LlmError::Transport(e.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| LlmError::Transport(e.to_string()))?;
    if !status.is_success() {
        return Err(LlmError::Status { status: status.as_u16(), body });
    }
    Ok(body)
}

// =============================================================================
// CLIENT
// =============================================================================

/// The configured provider plus the model every request targets.
pub struct LlmClient {
    provider: Provider,
    model: String,
}

enum Provider {
    Anthropic(anthropic::AnthropicClient),
    OpenAi(openai::OpenAiClient),
}

impl LlmClient {
    /// # Errors
    ///
    /// Fails when the environment names no usable key or the HTTP client
    /// cannot be built.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_config(LlmConfig::from_env()?)
    }

    /// # Errors
    ///
    /// Returns [`LlmError::ClientBuild`] if the HTTP client cannot be built.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let http = http_client(config.timeouts)?;
        let provider = match config.provider {
            LlmProviderKind::Anthropic => Provider::Anthropic(anthropic::AnthropicClient::new(http, config.api_key)),
            LlmProviderKind::OpenAi => {
                Provider::OpenAi(openai::OpenAiClient::new(http, config.api_key, &config.openai_base_url))
            }
        };
        Ok(Self { provider, model: config.model })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl LlmChat for LlmClient {
    async fn chat(&self, max_tokens: u32, system: &str, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        match &self.provider {
            Provider::Anthropic(c) => c.chat(&self.model, max_tokens, system, messages).await,
            Provider::OpenAi(c) => c.chat(&self.model, max_tokens, system, messages).await,
        }
    }
}
