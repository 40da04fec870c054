//! Ollama `/api/generate` (local models).

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{LlmError, Result};
use crate::types::{LlmConfig, LlmProvider, LlmResponse, Message, Role, Usage};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

/// Flatten the conversation into a single prompt.
///
/// The system text comes first, then one `User:`/`Assistant:` line per turn,
/// separated by blank lines. Empty parts are dropped.
pub(crate) fn build_prompt(messages: &[Message], system_prompt: Option<&str>) -> String {
    let system = system_prompt
        .or_else(|| {
            messages
                .iter()
                .find(|m| m.role == Role::System)
                .map(|m| m.content.as_str())
        })
        .unwrap_or("");

    std::iter::once(system.to_string())
        .chain(
            messages
                .iter()
                .filter(|m| m.role != Role::System)
                .map(|m| {
                    let speaker = if m.role == Role::User { "User" } else { "Assistant" };
                    format!("{}: {}", speaker, m.content)
                }),
        )
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub(crate) async fn generate(
    http: &Client,
    config: &LlmConfig,
    messages: &[Message],
    system_prompt: Option<&str>,
) -> Result<LlmResponse> {
    let request = GenerateRequest {
        model: &config.model,
        prompt: build_prompt(messages, system_prompt),
        stream: false,
        options: GenerateOptions {
            temperature: config.temperature,
            num_predict: config.max_tokens,
        },
    };

    let response = http
        .post(format!("{}/api/generate", config.base_url()))
        .json(&request)
        .send()
        .await
        .map_err(|e| {
            warn!(error = %e, "Ollama request failed");
            LlmError::Network(e.to_string())
        })?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(LlmError::Api {
            provider: LlmProvider::Ollama.to_string(),
            status: status.as_u16(),
            message: error_text,
        });
    }

    let raw: GenerateResponse = response
        .json()
        .await
        .map_err(|e| LlmError::Parse(e.to_string()))?;

    Ok(LlmResponse {
        text: raw.response.map(|r| r.trim().to_string()).unwrap_or_default(),
        usage: Some(Usage::new(
            raw.prompt_eval_count.unwrap_or(0),
            raw.eval_count.unwrap_or(0),
        )),
        model: config.model.clone(),
        provider: LlmProvider::Ollama,
    })
}
