use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use typed_builder::TypedBuilder;

use crate::common::{slugify, BundleId, BusinessUnitId};

/// How the bundle is sold
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BundleType {
    Fixed,
    Subscription,
}

impl std::fmt::Display for BundleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BundleType::Fixed => write!(f, "fixed"),
            BundleType::Subscription => write!(f, "subscription"),
        }
    }
}

impl std::str::FromStr for BundleType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fixed" => Ok(BundleType::Fixed),
            "subscription" => Ok(BundleType::Subscription),
            _ => Err(anyhow::anyhow!("Invalid bundle type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

impl std::fmt::Display for DiscountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscountType::Percentage => write!(f, "percentage"),
            DiscountType::Fixed => write!(f, "fixed"),
        }
    }
}

impl std::str::FromStr for DiscountType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "percentage" => Ok(DiscountType::Percentage),
            "fixed" => Ok(DiscountType::Fixed),
            _ => Err(anyhow::anyhow!("Invalid discount type: {}", s)),
        }
    }
}

/// ProductBundle model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductBundle {
    pub id: BundleId,
    pub business_unit_id: BusinessUnitId,
    pub name: String,
    pub handle: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub bundle_type: String,
    /// Opaque line items as entered in the admin console
    pub products: serde_json::Value,
    pub discount_type: String,
    pub discount_value: Decimal,
    pub original_price: Decimal,
    pub final_price: Decimal,
    pub savings: Decimal,
    pub subscription_duration: Option<i32>,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct CreateBundle {
    pub business_unit_id: BusinessUnitId,
    pub name: String,
    #[builder(default)]
    pub description: Option<String>,
    #[builder(default)]
    pub thumbnail: Option<String>,
    #[builder(default = BundleType::Fixed)]
    pub bundle_type: BundleType,
    #[builder(default = serde_json::json!([]))]
    pub products: serde_json::Value,
    #[builder(default = DiscountType::Percentage)]
    pub discount_type: DiscountType,
    #[builder(default)]
    pub discount_value: Decimal,
    #[builder(default)]
    pub original_price: Decimal,
    #[builder(default)]
    pub final_price: Decimal,
    #[builder(default)]
    pub savings: Decimal,
    #[builder(default)]
    pub subscription_duration: Option<i32>,
    #[builder(default = true)]
    pub is_active: bool,
    #[builder(default = false)]
    pub is_featured: bool,
}

/// Partial update; a new name also regenerates the handle.
#[derive(Debug, Clone, Default)]
pub struct UpdateBundle {
    pub name: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub bundle_type: Option<BundleType>,
    pub products: Option<serde_json::Value>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub final_price: Option<Decimal>,
    pub savings: Option<Decimal>,
    pub subscription_duration: Option<i32>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

impl ProductBundle {
    pub async fn find_by_id(id: BundleId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM product_bundles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Newest first
    pub async fn find_by_business_unit(
        business_unit_id: BusinessUnitId,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM product_bundles
            WHERE business_unit_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(business_unit_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn create(input: CreateBundle, pool: &PgPool) -> Result<Self> {
        let name = input.name.trim();
        if name.is_empty() {
            anyhow::bail!("Bundle name is required");
        }

        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO product_bundles (
                id, business_unit_id, name, handle, description, thumbnail,
                bundle_type, products, discount_type, discount_value,
                original_price, final_price, savings, subscription_duration,
                is_active, is_featured
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(BundleId::new())
        .bind(input.business_unit_id)
        .bind(name)
        .bind(slugify(name))
        .bind(input.description)
        .bind(input.thumbnail)
        .bind(input.bundle_type.to_string())
        .bind(input.products)
        .bind(input.discount_type.to_string())
        .bind(input.discount_value)
        .bind(input.original_price)
        .bind(input.final_price)
        .bind(input.savings)
        .bind(input.subscription_duration)
        .bind(input.is_active)
        .bind(input.is_featured)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(id: BundleId, input: UpdateBundle, pool: &PgPool) -> Result<Self> {
        let handle = input.name.as_deref().map(slugify);

        sqlx::query_as::<_, Self>(
            r#"
            UPDATE product_bundles SET
                name = COALESCE($2, name),
                handle = COALESCE($3, handle),
                description = COALESCE($4, description),
                thumbnail = COALESCE($5, thumbnail),
                bundle_type = COALESCE($6, bundle_type),
                products = COALESCE($7, products),
                discount_type = COALESCE($8, discount_type),
                discount_value = COALESCE($9, discount_value),
                original_price = COALESCE($10, original_price),
                final_price = COALESCE($11, final_price),
                savings = COALESCE($12, savings),
                subscription_duration = COALESCE($13, subscription_duration),
                is_active = COALESCE($14, is_active),
                is_featured = COALESCE($15, is_featured),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.name)
        .bind(handle)
        .bind(input.description)
        .bind(input.thumbnail)
        .bind(input.bundle_type.map(|t| t.to_string()))
        .bind(input.products)
        .bind(input.discount_type.map(|t| t.to_string()))
        .bind(input.discount_value)
        .bind(input.original_price)
        .bind(input.final_price)
        .bind(input.savings)
        .bind(input.subscription_duration)
        .bind(input.is_active)
        .bind(input.is_featured)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: BundleId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM product_bundles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_enums_round_trip_through_strings() {
        assert_eq!("subscription".parse::<BundleType>().unwrap(), BundleType::Subscription);
        assert_eq!(DiscountType::Fixed.to_string(), "fixed");
        assert!("bogus".parse::<DiscountType>().is_err());
    }
}
