// HTTP routes
pub mod chat;
pub mod graphql;
pub mod health;
pub mod landing_pages;
pub mod llm_config;
pub mod quiz;
pub mod recommendations;

pub use chat::*;
pub use graphql::*;
pub use health::*;
pub use landing_pages::*;
pub use llm_config::*;
pub use quiz::*;
pub use recommendations::*;
