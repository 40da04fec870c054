use thiserror::Error;

use super::validation::ALLOWED_MEDIA_TYPES;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("No file provided")]
    NoFile,

    #[error("File type not allowed. Allowed types: {}", ALLOWED_MEDIA_TYPES.join(", "))]
    TypeNotAllowed(String),

    #[error("File size exceeds 50MB limit")]
    TooLarge,

    #[error("File is empty")]
    EmptyFile,

    #[error("File URL is required")]
    UrlRequired,

    #[error("Media file not found")]
    NotFound,

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
