use chrono::{DateTime, Utc};
use juniper::{GraphQLInputObject, GraphQLObject};

use super::models::ProductBundle;
use crate::domains::catalog::data::money_to_f64;

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "A curated, priced product bundle")]
pub struct BundleData {
    pub id: String,
    pub business_unit_id: String,
    pub name: String,
    pub handle: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub bundle_type: String,
    /// Line items as a JSON string
    pub products: String,
    pub discount_type: String,
    pub discount_value: f64,
    pub original_price: f64,
    pub final_price: f64,
    pub savings: f64,
    pub subscription_duration: Option<i32>,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductBundle> for BundleData {
    fn from(b: ProductBundle) -> Self {
        Self {
            id: b.id.to_string(),
            business_unit_id: b.business_unit_id.to_string(),
            name: b.name,
            handle: b.handle,
            description: b.description,
            thumbnail: b.thumbnail,
            bundle_type: b.bundle_type,
            products: b.products.to_string(),
            discount_type: b.discount_type,
            discount_value: money_to_f64(b.discount_value),
            original_price: money_to_f64(b.original_price),
            final_price: money_to_f64(b.final_price),
            savings: money_to_f64(b.savings),
            subscription_duration: b.subscription_duration,
            is_active: b.is_active,
            is_featured: b.is_featured,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

/// Create and update share one input shape; `name` is required on create.
#[derive(Debug, Clone, Default, GraphQLInputObject)]
pub struct BundleInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub bundle_type: Option<String>,
    /// JSON array of line items
    pub products: Option<String>,
    pub discount_type: Option<String>,
    pub discount_value: Option<f64>,
    pub original_price: Option<f64>,
    pub final_price: Option<f64>,
    pub savings: Option<f64>,
    pub subscription_duration: Option<i32>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}
