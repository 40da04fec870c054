//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{LlmAdapter, ServerDeps};
pub use test_dependencies::MockLlm;
pub use traits::*;
