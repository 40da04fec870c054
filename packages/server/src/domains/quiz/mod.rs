//! Quiz domain - questionnaire, customer profiles and selected concerns

pub mod actions;
pub mod answers;
pub mod config;
pub mod error;
pub mod models;

pub use answers::{ConcernInput, QuizAnswers};
pub use error::QuizError;
pub use models::*;
