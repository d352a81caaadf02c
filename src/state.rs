//! Shared application state.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::llm::LlmChat;

/// State handed to every request handler.
///
/// `llm` is `None` when no provider is configured; analysis requests then
/// fail with 503 and the editor falls back to manual lettering.
#[derive(Clone)]
pub struct AppState {
    pub llm: Option<Arc<dyn LlmChat>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Option<Arc<dyn LlmChat>>, config: ServerConfig) -> Self {
        Self { llm, config: Arc::new(config) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Mutex;

    use super::*;
    use crate::llm::types::{ChatResponse, ContentBlock, LlmError, Message};

    /// Scripted LLM: pops one reply per call and records what it was sent.
    pub struct MockLlm {
        replies: Mutex<Vec<Result<ChatResponse, LlmError>>>,
        pub calls: Mutex<Vec<(u32, String, Vec<Message>)>>,
    }

    impl MockLlm {
        pub fn new(replies: Vec<Result<ChatResponse, LlmError>>) -> Self {
            Self { replies: Mutex::new(replies), calls: Mutex::new(Vec::new()) }
        }

        /// A mock whose single reply is `text`.
        pub fn replying(text: &str) -> Self {
            Self::new(vec![Ok(text_response(text))])
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl LlmChat for MockLlm {
        async fn chat(&self, max_tokens: u32, system: &str, messages: &[Message]) -> Result<ChatResponse, LlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((max_tokens, system.to_string(), messages.to_vec()));
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() { Ok(text_response("[]")) } else { replies.remove(0) }
        }
    }

    #[must_use]
    pub fn text_response(text: &str) -> ChatResponse {
        ChatResponse {
            content: vec![ContentBlock::Text { text: text.into() }],
            model: "mock".into(),
            stop_reason: "end_turn".into(),
            input_tokens: 10,
            output_tokens: 5,
        }
    }

    #[must_use]
    pub fn test_app_state() -> AppState {
        AppState::new(None, ServerConfig::default())
    }

    #[must_use]
    pub fn test_app_state_with_llm(llm: Arc<dyn LlmChat>) -> AppState {
        AppState::new(Some(llm), ServerConfig::default())
    }
}
