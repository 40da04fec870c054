//! Business units (tenants). Every catalog, profile and knowledge row
//! belongs to exactly one.

pub mod data;
pub mod models;

pub use models::BusinessUnit;
