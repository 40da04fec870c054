//! `/api/llm-config` - runtime provider switch (admin)
//!
//! API keys are never accepted from the request; they come from the
//! environment of the running server.

use axum::{extract::Extension, Json};
use llm_client::{LlmConfigUpdate, LlmProvider};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::config::provider_api_key;
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;
use crate::server::middleware::{require_admin, AuthUser};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmSettingsRequest {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub ollama_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl LlmSettingsRequest {
    /// Validate and turn into a config update, pulling the key from the environment.
    fn into_update(
        self,
        key_for: impl Fn(LlmProvider) -> Option<String>,
    ) -> Result<LlmConfigUpdate, ApiError> {
        let (Some(provider), Some(model)) = (
            self.provider.filter(|p| !p.trim().is_empty()),
            self.model.filter(|m| !m.trim().is_empty()),
        ) else {
            return Err(ApiError::bad_request("Provider and model are required"));
        };

        let provider: LlmProvider = provider
            .parse()
            .map_err(|e: llm_client::LlmError| ApiError::bad_request(e.to_string()))?;

        let api_key = key_for(provider);
        if provider.requires_api_key() && api_key.is_none() {
            return Err(ApiError::bad_request(format!(
                "{} API key not configured",
                provider
            )));
        }

        let base_url = match provider {
            LlmProvider::Ollama => Some(
                self.ollama_url
                    .filter(|u| !u.trim().is_empty())
                    .unwrap_or_else(|| provider.default_base_url().to_string()),
            ),
            _ => Some(provider.default_base_url().to_string()),
        };

        Ok(LlmConfigUpdate {
            provider: Some(provider),
            model: Some(model),
            api_key,
            base_url,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        })
    }
}

/// GET /api/llm-config
pub async fn get_llm_config_handler(
    Extension(state): Extension<AxumAppState>,
    auth_user: Option<Extension<AuthUser>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(auth_user.as_deref())?;

    let config = state.server_deps.llm.current_config().await;
    Ok(Json(json!({ "success": true, "config": config })))
}

/// POST /api/llm-config
pub async fn update_llm_config_handler(
    Extension(state): Extension<AxumAppState>,
    auth_user: Option<Extension<AuthUser>>,
    Json(body): Json<LlmSettingsRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = require_admin(auth_user.as_deref())?;

    let update = body.into_update(provider_api_key)?;
    let config = state.server_deps.llm.update_config(update).await;

    info!(user_id = %user.user_id, provider = %config.provider, model = %config.model, "LLM configuration updated");
    Ok(Json(json!({
        "success": true,
        "message": "LLM configuration updated successfully",
        "config": config,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(provider: &str, model: &str) -> LlmSettingsRequest {
        LlmSettingsRequest {
            provider: Some(provider.to_string()),
            model: Some(model.to_string()),
            ollama_url: None,
            temperature: None,
            max_tokens: None,
        }
    }

    #[test]
    fn provider_and_model_are_required() {
        let err = LlmSettingsRequest {
            model: None,
            ..request("openai", "gpt-4o")
        }
        .into_update(|_| Some("sk".into()))
        .unwrap_err();
        assert_eq!(err.message, "Provider and model are required");
    }

    #[test]
    fn hosted_provider_needs_a_configured_key() {
        let err = request("anthropic", "claude-3-haiku-20240307")
            .into_update(|_| None)
            .unwrap_err();
        assert_eq!(err.message, "anthropic API key not configured");
    }

    #[test]
    fn ollama_defaults_its_url() {
        let update = request("ollama", "llama3.1").into_update(|_| None).unwrap();
        assert_eq!(update.provider, Some(LlmProvider::Ollama));
        assert_eq!(update.base_url.as_deref(), Some("http://localhost:11434"));
        assert!(update.api_key.is_none());
    }

    #[test]
    fn unknown_provider_is_rejected() {
        assert!(request("bard", "x").into_update(|_| None).is_err());
    }
}
