//! OpenAI chat completions.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{LlmError, Result};
use crate::types::{LlmConfig, LlmProvider, LlmResponse, Message, Usage};

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage<'a>>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    choices: Vec<ChatChoice>,
    usage: Option<UsageRaw>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageRaw,
}

#[derive(Debug, Deserialize)]
struct ChatMessageRaw {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageRaw {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// Newer reasoning models reject `max_tokens`.
fn uses_max_completion_tokens(model: &str) -> bool {
    model.starts_with("o1") || model.starts_with("o3") || model.starts_with("gpt-5")
}

/// Build the request body; the system prompt goes first as a system message.
pub(crate) fn build_request<'a>(
    config: &'a LlmConfig,
    messages: &'a [Message],
    system_prompt: Option<&'a str>,
) -> ChatRequest<'a> {
    let mut wire = Vec::with_capacity(messages.len() + 1);
    if let Some(system) = system_prompt {
        wire.push(WireMessage {
            role: "system",
            content: system,
        });
    }
    wire.extend(messages.iter().map(|m| WireMessage {
        role: m.role.as_str(),
        content: &m.content,
    }));

    let (max_tokens, max_completion_tokens) = if uses_max_completion_tokens(&config.model) {
        (None, Some(config.max_tokens))
    } else {
        (Some(config.max_tokens), None)
    };

    ChatRequest {
        model: &config.model,
        messages: wire,
        temperature: config.temperature,
        max_tokens,
        max_completion_tokens,
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
        .post(format!("{}/chat/completions", config.base_url()))
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await
        .map_err(|e| {
            warn!(error = %e, "OpenAI request failed");
            LlmError::Network(e.to_string())
        })?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        warn!(status = %status, error = %error_text, "OpenAI API error");
        return Err(LlmError::Api {
            provider: LlmProvider::OpenAi.to_string(),
            status: status.as_u16(),
            message: error_text,
        });
    }

    let raw: ChatResponseRaw = response
        .json()
        .await
        .map_err(|e| LlmError::Parse(e.to_string()))?;

    let text = raw
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default();

    Ok(LlmResponse {
        text,
        usage: raw
            .usage
            .map(|u| Usage::new(u.prompt_tokens, u.completion_tokens)),
        model: config.model.clone(),
        provider: LlmProvider::OpenAi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_is_prepended() {
        let config = LlmConfig::new(LlmProvider::OpenAi);
        let messages = vec![Message::user("Hello"), Message::assistant("Hi!")];
        let request = build_request(&config, &messages, Some("Be brief"));

        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[0].content, "Be brief");
        assert_eq!(request.messages[2].role, "assistant");
        assert_eq!(request.max_tokens, Some(2048));
        assert_eq!(request.max_completion_tokens, None);
    }

    #[test]
    fn reasoning_models_use_max_completion_tokens() {
        let config = LlmConfig::new(LlmProvider::OpenAi).with_model("gpt-5-mini");
        let request = build_request(&config, &[], None);
        assert_eq!(request.max_tokens, None);
        assert_eq!(request.max_completion_tokens, Some(2048));
    }
}
