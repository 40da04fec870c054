// Trait definitions for dependency injection
//
// Infrastructure traits only; business logic lives in domain functions that
// take these traits as arguments.
//
// Naming convention: Base* for trait names

use anyhow::Result;
use async_trait::async_trait;
use llm_client::{LlmConfig, LlmConfigUpdate, LlmResponse, Message};

// =============================================================================
// LLM Trait (provider-agnostic chat completion)
// =============================================================================

#[async_trait]
pub trait BaseLlm: Send + Sync {
    /// Generate a reply to a conversation.
    ///
    /// `system_prompt` is sent the way the active provider expects it
    /// (prepended message, separate field, or flattened prompt).
    async fn generate(
        &self,
        messages: &[Message],
        system_prompt: Option<&str>,
    ) -> Result<LlmResponse>;

    /// Single user turn, text only
    async fn complete(&self, prompt: &str) -> Result<String> {
        let response = self.generate(&[Message::user(prompt)], None).await?;
        Ok(response.text)
    }

    /// Active provider/model settings (API key is never serialized)
    async fn current_config(&self) -> LlmConfig;

    /// Switch provider/model/sampling at runtime
    async fn update_config(&self, update: LlmConfigUpdate) -> LlmConfig;
}
