//! Server dependencies (using traits for testability)
//!
//! Central container handed to every domain action. External services sit
//! behind `Base*` traits so tests can swap in mocks.

use anyhow::Result;
use async_trait::async_trait;
use llm_client::{LlmClient, LlmConfig, LlmConfigUpdate, LlmResponse, Message};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domains::auth::JwtService;
use crate::kernel::BaseLlm;

// =============================================================================
// LlmClient Adapter (implements BaseLlm trait)
// =============================================================================

/// Wrapper around LlmClient that implements BaseLlm
pub struct LlmAdapter(pub Arc<LlmClient>);

impl LlmAdapter {
    pub fn new(client: Arc<LlmClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseLlm for LlmAdapter {
    async fn generate(
        &self,
        messages: &[Message],
        system_prompt: Option<&str>,
    ) -> Result<LlmResponse> {
        self.0
            .generate(messages, system_prompt)
            .await
            .map_err(Into::into)
    }

    async fn current_config(&self) -> LlmConfig {
        self.0.config().await
    }

    async fn update_config(&self, update: LlmConfigUpdate) -> LlmConfig {
        self.0.update_config(update).await
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// Chat completions for the sales assistant and maintenance jobs
    pub llm: Arc<dyn BaseLlm>,
    pub jwt_service: Arc<JwtService>,
}

impl ServerDeps {
    pub fn new(db_pool: PgPool, llm: Arc<dyn BaseLlm>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            db_pool,
            llm,
            jwt_service,
        }
    }
}
