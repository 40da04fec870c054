pub mod actions;
pub mod error;
pub mod models;

pub use error::ChatError;
pub use models::*;
