//! Knowledge domain - facts, house guidelines and training lessons that
//! ground the assistant, plus the prompt builder that assembles them

pub mod data;
pub mod models;
pub mod prompt;
pub mod retrieval;

pub use models::*;
pub use retrieval::relevant_entries;
