use thiserror::Error;

use crate::common::OptionId;

/// Quiz validation and lookup failures
#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Profile not found")]
    ProfileNotFound,

    #[error("Invalid concern id: {0}")]
    InvalidConcernId(String),

    #[error("Unknown concern: {0}")]
    UnknownConcern(OptionId),

    #[error("Severity must be between 1 and 5, got {0}")]
    InvalidSeverity(i32),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
