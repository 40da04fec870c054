// Skincare Commerce Backend - API Core
//
// Multi-tenant catalog, quiz-driven customer profiles, the booster
// recommendation engine and the LLM-backed sales assistant.
//
// Domains live under domains/*; HTTP (REST + admin GraphQL) under server/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
