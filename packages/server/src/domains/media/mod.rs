//! Media library - metadata for images and videos used on storefront pages

pub mod actions;
pub mod data;
pub mod error;
pub mod models;
pub mod validation;

pub use error::MediaError;
pub use models::*;
