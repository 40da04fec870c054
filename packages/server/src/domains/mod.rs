// Business domains
pub mod auth;
pub mod bundles;
pub mod business_units;
pub mod catalog;
pub mod chat;
pub mod conversations;
pub mod knowledge;
pub mod landing_pages;
pub mod media;
pub mod quiz;
pub mod recommendations;
