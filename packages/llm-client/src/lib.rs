//! Provider-agnostic LLM REST client
//!
//! One client, three backends: OpenAI chat completions, the Anthropic
//! messages API and a local Ollama server. The active provider lives behind a
//! lock so it can be switched at runtime without rebuilding the client.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm_client::{LlmClient, LlmConfig, LlmProvider, Message};
//!
//! let client = LlmClient::new(
//!     LlmConfig::new(LlmProvider::Anthropic).with_api_key(key),
//! );
//!
//! let response = client
//!     .generate(&[Message::user("Which booster helps with dark spots?")], Some(system))
//!     .await?;
//! println!("{}", response.text);
//! ```

pub mod error;
pub mod providers;
pub mod types;

pub use error::{LlmError, Result};
pub use types::*;

use reqwest::Client;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// HTTP client for the configured provider.
pub struct LlmClient {
    http_client: Client,
    config: RwLock<LlmConfig>,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            config: RwLock::new(config),
        }
    }

    /// Snapshot of the current configuration.
    pub async fn config(&self) -> LlmConfig {
        self.config.read().await.clone()
    }

    /// Apply a partial update (e.g. switch provider or model).
    pub async fn update_config(&self, update: LlmConfigUpdate) -> LlmConfig {
        let mut config = self.config.write().await;
        config.apply(update);
        config.clone()
    }

    /// Generate a reply. `system_prompt` overrides any system-role message.
    pub async fn generate(
        &self,
        messages: &[Message],
        system_prompt: Option<&str>,
    ) -> Result<LlmResponse> {
        let config = self.config().await;
        let start = std::time::Instant::now();

        let response = match config.provider {
            LlmProvider::OpenAi => {
                providers::openai::generate(&self.http_client, &config, messages, system_prompt)
                    .await
            }
            LlmProvider::Anthropic => {
                providers::anthropic::generate(&self.http_client, &config, messages, system_prompt)
                    .await
            }
            LlmProvider::Ollama => {
                providers::ollama::generate(&self.http_client, &config, messages, system_prompt)
                    .await
            }
        }?;

        debug!(
            provider = %config.provider,
            model = %config.model,
            duration_ms = start.elapsed().as_millis(),
            output_tokens = response.usage.map(|u| u.output_tokens).unwrap_or(0),
            "LLM completion"
        );

        Ok(response)
    }

    /// Single-turn convenience wrapper returning only the text.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let response = self.generate(&[Message::user(prompt)], None).await?;
        Ok(response.text)
    }
}
