//! Provider-neutral request and response types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LlmError;

// =============================================================================
// Provider
// =============================================================================

/// Hosted (or local) LLM backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
    Ollama,
}

impl LlmProvider {
    /// Model used when none is configured.
    pub fn default_model(self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "gpt-4o",
            LlmProvider::Anthropic => "claude-3-haiku-20240307",
            LlmProvider::Ollama => "llama3.1",
        }
    }

    /// API root used when no base URL override is configured.
    pub fn default_base_url(self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "https://api.openai.com/v1",
            LlmProvider::Anthropic => "https://api.anthropic.com/v1",
            LlmProvider::Ollama => "http://localhost:11434",
        }
    }

    /// Whether calls to this provider need an API key.
    pub fn requires_api_key(self) -> bool {
        !matches!(self, LlmProvider::Ollama)
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::OpenAi => write!(f, "openai"),
            LlmProvider::Anthropic => write!(f, "anthropic"),
            LlmProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl FromStr for LlmProvider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "anthropic" => Ok(LlmProvider::Anthropic),
            "ollama" => Ok(LlmProvider::Ollama),
            other => Err(LlmError::Config(format!(
                "Unsupported LLM provider: {}",
                other
            ))),
        }
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Connection and sampling settings for one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmConfig {
    /// Config with the provider's default model and the usual sampling defaults.
    pub fn new(provider: LlmProvider) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            api_key: None,
            base_url: None,
            temperature: 0.7,
            max_tokens: 2048,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
            .trim_end_matches('/')
    }

    /// API key, or a configuration error if the provider needs one.
    pub fn require_api_key(&self) -> Result<&str, LlmError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                LlmError::Config(format!("{} API key not configured", self.provider))
            })
    }
}

/// Partial update applied at runtime (admin provider switch).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmConfigUpdate {
    pub provider: Option<LlmProvider>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl LlmConfig {
    /// Merge an update into this config.
    ///
    /// Switching provider without naming a model resets the model to the new
    /// provider's default.
    pub fn apply(&mut self, update: LlmConfigUpdate) {
        if let Some(provider) = update.provider {
            if provider != self.provider && update.model.is_none() {
                self.model = provider.default_model().to_string();
            }
            self.provider = provider;
        }
        if let Some(model) = update.model {
            self.model = model;
        }
        if update.api_key.is_some() {
            self.api_key = update.api_key;
        }
        if update.base_url.is_some() {
            self.base_url = update.base_url;
        }
        if let Some(temperature) = update.temperature {
            self.temperature = temperature;
        }
        if let Some(max_tokens) = update.max_tokens {
            self.max_tokens = max_tokens;
        }
    }
}

// =============================================================================
// Messages
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Token usage statistics, normalised across providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }
}

/// Completion result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub usage: Option<Usage>,
    pub model: String,
    pub provider: LlmProvider,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parses_case_insensitively() {
        assert_eq!("OpenAI".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAi);
        assert_eq!(" ollama ".parse::<LlmProvider>().unwrap(), LlmProvider::Ollama);
        assert!("gemini".parse::<LlmProvider>().is_err());
    }

    #[test]
    fn provider_serializes_lowercase() {
        let json = serde_json::to_string(&LlmProvider::OpenAi).unwrap();
        assert_eq!(json, "\"openai\"");
        let parsed: LlmProvider = serde_json::from_str("\"anthropic\"").unwrap();
        assert_eq!(parsed, LlmProvider::Anthropic);
    }

    #[test]
    fn switching_provider_resets_model() {
        let mut config = LlmConfig::new(LlmProvider::OpenAi);
        config.apply(LlmConfigUpdate {
            provider: Some(LlmProvider::Anthropic),
            ..Default::default()
        });
        assert_eq!(config.model, "claude-3-haiku-20240307");

        config.apply(LlmConfigUpdate {
            provider: Some(LlmProvider::Ollama),
            model: Some("qwen2.5".into()),
            ..Default::default()
        });
        assert_eq!(config.provider, LlmProvider::Ollama);
        assert_eq!(config.model, "qwen2.5");
    }

    #[test]
    fn base_url_strips_trailing_slash() {
        let config = LlmConfig::new(LlmProvider::Ollama).with_base_url("http://gpu-box:11434/");
        assert_eq!(config.base_url(), "http://gpu-box:11434");
        assert_eq!(
            LlmConfig::new(LlmProvider::OpenAi).base_url(),
            "https://api.openai.com/v1"
        );
    }

    #[test]
    fn missing_api_key_is_config_error() {
        let config = LlmConfig::new(LlmProvider::Anthropic).with_api_key("");
        assert!(matches!(config.require_api_key(), Err(LlmError::Config(_))));
    }

    #[test]
    fn api_key_is_never_serialized() {
        let config = LlmConfig::new(LlmProvider::OpenAi).with_api_key("sk-secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
    }
}
