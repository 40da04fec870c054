use anyhow::{Context, Result};
use dotenvy::dotenv;
use llm_client::{LlmConfig, LlmProvider};
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub llm: LlmConfig,
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "skincoach".to_string()),
            llm: llm_config_from_env()?,
            allowed_origins: parse_origins(&env::var("ALLOWED_ORIGINS").unwrap_or_default()),
        })
    }
}

/// Build the LLM configuration for the selected provider.
///
/// Only the selected provider's API key is read.
pub fn llm_config_from_env() -> Result<LlmConfig> {
    let provider: LlmProvider = env::var("LLM_PROVIDER")
        .unwrap_or_else(|_| "openai".to_string())
        .parse()
        .context("LLM_PROVIDER must be one of openai, anthropic, ollama")?;

    let mut config = LlmConfig::new(provider);

    if let Ok(model) = env::var("LLM_MODEL") {
        config = config.with_model(model);
    }
    if let Ok(temperature) = env::var("LLM_TEMPERATURE") {
        config = config.with_temperature(
            temperature
                .parse()
                .context("LLM_TEMPERATURE must be a number")?,
        );
    }
    if let Ok(max_tokens) = env::var("LLM_MAX_TOKENS") {
        config = config.with_max_tokens(
            max_tokens
                .parse()
                .context("LLM_MAX_TOKENS must be a positive integer")?,
        );
    }

    if let Some(key) = provider_api_key(provider) {
        config = config.with_api_key(key);
    }
    if provider == LlmProvider::Ollama {
        if let Ok(url) = env::var("OLLAMA_BASE_URL") {
            config = config.with_base_url(url);
        }
    }

    Ok(config)
}

/// API key for a provider, read from the environment.
///
/// Keys never come from request bodies; the runtime provider switch calls
/// this too.
pub fn provider_api_key(provider: LlmProvider) -> Option<String> {
    let var = match provider {
        LlmProvider::OpenAi => "OPENAI_API_KEY",
        LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
        LlmProvider::Ollama => return None,
    };
    env::var(var).ok().filter(|k| !k.trim().is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
