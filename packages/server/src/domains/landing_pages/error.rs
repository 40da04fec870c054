use thiserror::Error;

#[derive(Error, Debug)]
pub enum LandingPageError {
    #[error("Business unit not found")]
    BusinessUnitNotFound,

    #[error("Landing page not found")]
    NotFound,

    #[error("Source locale not found")]
    SourceLocaleNotFound,

    #[error("Locale already exists")]
    LocaleExists,

    #[error("Slug already in use: {0}")]
    SlugTaken(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
