//! Anthropic messages API.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{LlmError, Result};
use crate::types::{LlmConfig, LlmProvider, LlmResponse, Message, Role, Usage};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
pub(crate) struct MessageRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<&'a str>,
    pub messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
    usage: UsageRaw,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageRaw {
    input_tokens: u32,
    output_tokens: u32,
}

/// Build the request body.
///
/// Anthropic takes the system prompt as a separate field; system-role
/// messages are stripped from the turn list. Without an explicit system
/// prompt the first system-role message is used instead.
pub(crate) fn build_request<'a>(
    config: &'a LlmConfig,
    messages: &'a [Message],
    system_prompt: Option<&'a str>,
) -> MessageRequest<'a> {
    let system = system_prompt.or_else(|| {
        messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
    });

    MessageRequest {
        model: &config.model,
        max_tokens: config.max_tokens,
        temperature: config.temperature,
        system,
        messages: messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| WireMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .collect(),
    }
}

pub(crate) async fn generate(
    http: &Client,
    config: &LlmConfig,
    messages: &[Message],
    system_prompt: Option<&str>,
) -> Result<LlmResponse> {
    let api_key = config.require_api_key()?;
    let request = build_request(config, messages, system_prompt);

    let response = http
        .post(format!("{}/messages", config.base_url()))
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .json(&request)
        .send()
        .await
        .map_err(|e| {
            warn!(error = %e, "Anthropic request failed");
            LlmError::Network(e.to_string())
        })?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        warn!(status = %status, error = %error_text, "Anthropic API error");
        return Err(LlmError::Api {
            provider: LlmProvider::Anthropic.to_string(),
            status: status.as_u16(),
            message: error_text,
        });
    }

    let raw: MessageResponse = response
        .json()
        .await
        .map_err(|e| LlmError::Parse(e.to_string()))?;

    let text = raw
        .content
        .into_iter()
        .find(|b| b.block_type == "text")
        .and_then(|b| b.text)
        .unwrap_or_default();

    Ok(LlmResponse {
        text,
        usage: Some(Usage::new(raw.usage.input_tokens, raw.usage.output_tokens)),
        model: config.model.clone(),
        provider: LlmProvider::Anthropic,
    })
}
