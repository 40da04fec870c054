// Mock implementations for testing
//
// Injected into ServerDeps by unit and integration tests in place of the
// real LLM adapter.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use llm_client::{
    LlmConfig, LlmConfigUpdate, LlmProvider, LlmResponse, Message, Usage,
};
use sqlx::PgPool;
use std::sync::{Arc, Mutex};

use super::{BaseLlm, ServerDeps};
use crate::domains::auth::JwtService;

/// A single recorded call to the mock.
#[derive(Debug, Clone)]
pub struct LlmCall {
    pub messages: Vec<Message>,
    pub system_prompt: Option<String>,
}

impl LlmCall {
    /// Content of the last user turn.
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == llm_client::Role::User)
            .map(|m| m.content.as_str())
    }
}

// =============================================================================
// Mock LLM
// =============================================================================

pub struct MockLlm {
    responses: Arc<Mutex<Vec<String>>>,
    calls: Arc<Mutex<Vec<LlmCall>>>,
    config: Mutex<LlmConfig>,
    fail: bool,
}

impl MockLlm {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            config: Mutex::new(LlmConfig::new(LlmProvider::Ollama)),
            fail: false,
        }
    }

    /// Mock whose every call returns an error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Queue a text response (served FIFO)
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(response.into());
        self
    }

    pub fn calls(&self) -> Vec<LlmCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<LlmCall> {
        self.calls.lock().unwrap().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockLlm {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseLlm for MockLlm {
    async fn generate(
        &self,
        messages: &[Message],
        system_prompt: Option<&str>,
    ) -> Result<LlmResponse> {
        self.calls.lock().unwrap().push(LlmCall {
            messages: messages.to_vec(),
            system_prompt: system_prompt.map(String::from),
        });

        if self.fail {
            return Err(anyhow!("mock LLM failure"));
        }

        let text = {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                "Mock LLM response".to_string()
            } else {
                responses.remove(0)
            }
        };

        let config = self.config.lock().unwrap().clone();
        Ok(LlmResponse {
            text,
            usage: Some(Usage::new(0, 0)),
            model: config.model,
            provider: config.provider,
        })
    }

    async fn current_config(&self) -> LlmConfig {
        self.config.lock().unwrap().clone()
    }

    async fn update_config(&self, update: LlmConfigUpdate) -> LlmConfig {
        let mut config = self.config.lock().unwrap();
        config.apply(update);
        config.clone()
    }
}

/// ServerDeps wired with a mock LLM and a fixed JWT secret.
pub fn test_server_deps(db_pool: PgPool, llm: Arc<MockLlm>) -> ServerDeps {
    ServerDeps::new(
        db_pool,
        llm,
        Arc::new(JwtService::new("test_secret_key", "test_issuer".to_string())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    #[test]
    fn queued_responses_are_served_in_order() {
        let llm = MockLlm::new().with_response("first").with_response("second");

        assert_eq!(block_on(llm.complete("a")).unwrap(), "first");
        assert_eq!(block_on(llm.complete("b")).unwrap(), "second");
        assert_eq!(block_on(llm.complete("c")).unwrap(), "Mock LLM response");
        assert_eq!(llm.call_count(), 3);
        assert_eq!(llm.last_call().unwrap().last_user_message(), Some("c"));
    }

    #[test]
    fn failing_mock_still_records_the_call() {
        let llm = MockLlm::failing();

        assert!(block_on(llm.generate(&[Message::user("hi")], Some("system"))).is_err());
        assert_eq!(llm.calls()[0].system_prompt.as_deref(), Some("system"));
    }
}
