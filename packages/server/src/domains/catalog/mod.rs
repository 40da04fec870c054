//! Catalog domain - products, categories, attributes and booster matching
//!
//! Boosters are add-on products (product type `is_addon`, or
//! `metadata.is_addon`). Concerns are options of the tenant's
//! `skin_concerns` attribute; shared concerns drive booster suggestions,
//! automatic base → booster matching and, downstream, recommendations.

pub mod actions;
pub mod addon_scoring;
pub mod concern_assignment;
pub mod data;
pub mod models;

pub use models::*;
