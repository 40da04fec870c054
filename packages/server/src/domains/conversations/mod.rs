//! Conversation review over stored chat sessions (admin)

pub mod actions;
pub mod analyzer;
pub mod data;
pub mod models;

pub use analyzer::{ConversationAnalysis, FlagLevel};
pub use models::*;
