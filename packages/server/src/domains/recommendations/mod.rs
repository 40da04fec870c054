//! Recommendations domain
//!
//! Turns a quiz profile's concerns into bundle offers:
//!
//! 1. boosters tagged with the customer's concerns are scored
//!    (3 × severity, doubled for priorities) and the best ten kept,
//! 2. base products paired with those boosters are grouped and the best
//!    six form the full routine,
//! 3. the routine is sliced into 6/3/1-month and single-product bundles,
//!    each discounted by its tier.

pub mod actions;
pub mod engine;
pub mod error;
pub mod models;
pub mod pricing;
pub mod scoring;

pub use actions::*;
pub use engine::RecommendationSet;
pub use error::RecommendationError;
pub use models::CustomerRecommendation;
