//! Provider selection and credentials, read from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `LLM_PROVIDER` | `anthropic` (or `openai`) |
//! | `LLM_API_KEY_ENV` | required; names the variable holding the key |
//! | `LLM_MODEL` | per provider |
//! | `LLM_OPENAI_BASE_URL` | `https://api.openai.com/v1` |
//! | `LLM_REQUEST_TIMEOUT_SECS` | 120 |
//! | `LLM_CONNECT_TIMEOUT_SECS` | 10 |

use std::str::FromStr;

use super::types::LlmError;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const REQUEST_TIMEOUT_SECS: u64 = 120;
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProviderKind {
    #[default]
    Anthropic,
    OpenAi,
}

impl LlmProviderKind {
    /// Vision-capable model used when `LLM_MODEL` is unset.
    #[must_use]
    pub fn default_model(self) -> &'static str {
        match self {
            Self::Anthropic => "claude-sonnet-4-5-20250929",
            Self::OpenAi => "gpt-4o",
        }
    }
}

impl FromStr for LlmProviderKind {
    type Err = LlmError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAi),
            other => Err(LlmError::Config(format!("unknown LLM_PROVIDER {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for LlmTimeouts {
    fn default() -> Self {
        Self { request_secs: REQUEST_TIMEOUT_SECS, connect_secs: CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub provider: LlmProviderKind,
    pub api_key: String,
    pub model: String,
    pub openai_base_url: String,
    pub timeouts: LlmTimeouts,
}

impl LlmConfig {
    /// # Errors
    ///
    /// Returns [`LlmError::MissingApiKey`] or [`LlmError::Config`].
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`LlmConfig::from_env`] over an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingApiKey`] or [`LlmError::Config`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LlmError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = get("LLM_PROVIDER").map_or(Ok(LlmProviderKind::default()), |raw| raw.parse())?;

        let key_var = get("LLM_API_KEY_ENV").ok_or_else(|| LlmError::MissingApiKey { var: "LLM_API_KEY_ENV".into() })?;
        let api_key = get(&key_var).ok_or(LlmError::MissingApiKey { var: key_var })?;

        let secs = |key: &str, default: u64| get(key).and_then(|v| v.trim().parse().ok()).unwrap_or(default);

        Ok(Self {
            provider,
            api_key,
            model: get("LLM_MODEL").unwrap_or_else(|| provider.default_model().to_string()),
            openai_base_url: get("LLM_OPENAI_BASE_URL")
                .map_or_else(|| OPENAI_BASE_URL.to_string(), |url| url.trim_end_matches('/').to_string()),
            timeouts: LlmTimeouts {
                request_secs: secs("LLM_REQUEST_TIMEOUT_SECS", REQUEST_TIMEOUT_SECS),
                connect_secs: secs("LLM_CONNECT_TIMEOUT_SECS", CONNECT_TIMEOUT_SECS),
            },
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
