//! Landing pages - per-locale storefront pages with draft/publish

pub mod actions;
pub mod error;
pub mod locale;
pub mod models;

pub use error::LandingPageError;
pub use locale::{choose_locale, Locale, LocaleMatch};
pub use models::*;
