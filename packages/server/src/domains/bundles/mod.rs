//! Bundles domain - curated, priced product groupings managed by admins

pub mod data;
pub mod models;

pub use models::*;
