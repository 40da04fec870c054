//! GraphQL data types for the catalog admin surface

use chrono::{DateTime, Utc};
use juniper::{GraphQLInputObject, GraphQLObject};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::actions::{AddonMatchesView, ProductMatchCount, RegenerationReport};
use super::addon_scoring::AddonSuggestion;
use super::models::{
    AttributeValueRow, OptionWithCategory, Product, ProductAttribute, ProductCategory,
    ProductType,
};

/// Money as a GraphQL float (2 dp)
pub fn money_to_f64(value: Decimal) -> f64 {
    value.round_dp(2).to_f64().unwrap_or(0.0)
}

/// GraphQL float to money; rejects NaN/infinite input
pub fn money_from_f64(value: f64) -> anyhow::Result<Decimal> {
    Decimal::try_from(value)
        .map(|d| d.round_dp(2))
        .map_err(|_| anyhow::anyhow!("Invalid amount: {}", value))
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "A base product or booster")]
pub struct ProductData {
    pub id: String,
    pub business_unit_id: String,
    pub product_type_id: Option<String>,
    pub title: String,
    pub handle: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub status: String,
    pub price: f64,
    pub face_benefits: Option<String>,
    pub eye_benefits: Option<String>,
    pub body_benefits: Option<String>,
    pub hair_benefits: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductData {
    fn from(p: Product) -> Self {
        Self {
            id: p.id.to_string(),
            business_unit_id: p.business_unit_id.to_string(),
            product_type_id: p.product_type_id.map(|id| id.to_string()),
            title: p.title,
            handle: p.handle,
            description: p.description,
            thumbnail: p.thumbnail,
            status: p.status,
            price: money_to_f64(p.price),
            face_benefits: p.face_benefits,
            eye_benefits: p.eye_benefits,
            body_benefits: p.body_benefits,
            hair_benefits: p.hair_benefits,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct ProductTypeData {
    pub id: String,
    pub name: String,
    pub handle: String,
    pub is_addon: bool,
}

impl From<ProductType> for ProductTypeData {
    fn from(t: ProductType) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.name,
            handle: t.handle,
            is_addon: t.is_addon,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct CategoryData {
    pub id: String,
    pub name: String,
    pub handle: String,
    pub display_order: i32,
}

impl From<ProductCategory> for CategoryData {
    fn from(c: ProductCategory) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name,
            handle: c.handle,
            display_order: c.display_order,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct AttributeData {
    pub id: String,
    pub name: String,
    pub handle: String,
}

impl From<ProductAttribute> for AttributeData {
    fn from(a: ProductAttribute) -> Self {
        Self {
            id: a.id.to_string(),
            name: a.name,
            handle: a.handle,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct AttributeOptionData {
    pub id: String,
    pub name: String,
    pub handle: String,
    pub display_order: i32,
    pub category_handle: Option<String>,
}

impl From<OptionWithCategory> for AttributeOptionData {
    fn from(o: OptionWithCategory) -> Self {
        Self {
            id: o.id.to_string(),
            name: o.name,
            handle: o.handle,
            display_order: o.display_order,
            category_handle: o.category_handle,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct AttributeValueData {
    pub product_id: String,
    pub attribute_id: String,
    pub attribute_name: String,
    pub option_id: String,
    pub option_name: String,
}

impl From<AttributeValueRow> for AttributeValueData {
    fn from(v: AttributeValueRow) -> Self {
        Self {
            product_id: v.product_id.to_string(),
            attribute_id: v.attribute_id.to_string(),
            attribute_name: v.attribute_name,
            option_id: v.option_id.to_string(),
            option_name: v.option_name,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct AddonSuggestionData {
    pub id: String,
    pub title: String,
    pub thumbnail: Option<String>,
    pub score: i32,
    pub shared_concerns: Vec<String>,
}

impl From<AddonSuggestion> for AddonSuggestionData {
    fn from(s: AddonSuggestion) -> Self {
        Self {
            id: s.id.to_string(),
            title: s.title,
            thumbnail: s.thumbnail,
            score: s.score,
            shared_concerns: s.shared_concerns,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct AddonMatchesData {
    pub addon_ids: Vec<String>,
    pub suggestions: Vec<AddonSuggestionData>,
}

impl From<AddonMatchesView> for AddonMatchesData {
    fn from(v: AddonMatchesView) -> Self {
        Self {
            addon_ids: v.addon_ids.iter().map(|id| id.to_string()).collect(),
            suggestions: v.suggestions.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct ProductMatchCountData {
    pub product_id: String,
    pub title: String,
    pub match_count: i32,
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct RegenerationReportData {
    pub processed: i32,
    pub matches: i32,
    pub results: Vec<ProductMatchCountData>,
}

impl From<RegenerationReport> for RegenerationReportData {
    fn from(r: RegenerationReport) -> Self {
        Self {
            processed: r.processed,
            matches: r.matches,
            results: r
                .results
                .into_iter()
                .map(|c: ProductMatchCount| ProductMatchCountData {
                    product_id: c.product_id.to_string(),
                    title: c.title,
                    match_count: c.match_count,
                })
                .collect(),
        }
    }
}

// =============================================================================
// Inputs
// =============================================================================

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct CreateProductInput {
    pub business_unit_id: String,
    pub title: String,
    /// Defaults to the slugified title
    pub handle: Option<String>,
    pub product_type_id: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub status: Option<String>,
    pub price: Option<f64>,
    pub face_benefits: Option<String>,
    pub eye_benefits: Option<String>,
    pub body_benefits: Option<String>,
    pub hair_benefits: Option<String>,
    pub category_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, GraphQLInputObject)]
pub struct UpdateProductInput {
    pub title: Option<String>,
    pub handle: Option<String>,
    pub product_type_id: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub status: Option<String>,
    pub price: Option<f64>,
    pub face_benefits: Option<String>,
    pub eye_benefits: Option<String>,
    pub body_benefits: Option<String>,
    pub hair_benefits: Option<String>,
    pub category_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct CategoryInput {
    pub name: String,
    pub handle: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct AttributeOptionInput {
    pub name: String,
    pub handle: Option<String>,
    pub category_id: Option<String>,
    pub display_order: Option<i32>,
}
