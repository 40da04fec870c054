//! Per-provider wire formats.

pub mod anthropic;
pub mod ollama;
pub mod openai;
