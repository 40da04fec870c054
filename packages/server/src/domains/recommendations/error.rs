use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecommendationError {
    #[error("Profile not found")]
    ProfileNotFound,

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
