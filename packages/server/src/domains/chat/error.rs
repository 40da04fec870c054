use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Message is required")]
    EmptyMessage,

    #[error("Chat session not found")]
    SessionNotFound,

    #[error("Business unit not found")]
    BusinessUnitNotFound,

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
