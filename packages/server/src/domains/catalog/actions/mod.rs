//! Catalog actions
//!
//! Self-contained operations used by the admin GraphQL surface and the
//! maintenance binaries. Authorization happens at the edge.

pub mod addons;
pub mod assign_concerns;
pub mod attributes;

pub use addons::*;
pub use assign_concerns::*;
pub use attributes::*;
