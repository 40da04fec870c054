//! Catalog reads feeding the scorer

use anyhow::Result;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::common::{BusinessUnitId, OptionId, ProductId};
use crate::domains::catalog::{AddonMatch, ProductStatus, SKIN_CONCERNS_HANDLE};
use crate::domains::recommendations::scoring::{BaseMatch, BoosterHit, ProductCard};

/// One `skin_concerns` attribute value joined with its product
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BoosterHitRow {
    pub product_id: ProductId,
    pub option_id: OptionId,
    pub title: String,
    pub thumbnail: Option<String>,
    pub price: Decimal,
    pub status: String,
}

impl From<BoosterHitRow> for BoosterHit {
    fn from(row: BoosterHitRow) -> Self {
        BoosterHit {
            booster: ProductCard {
                id: row.product_id,
                published: row.status == ProductStatus::Published.to_string(),
                title: row.title,
                thumbnail: row.thumbnail,
                price: row.price,
            },
            option_id: row.option_id,
        }
    }
}

impl BoosterHitRow {
    /// Products tagged with any of `concern_ids` under the tenant's
    /// `skin_concerns` attribute, in tagging order. Without a business unit
    /// every tenant's attribute is searched.
    pub async fn find_for_concerns(
        business_unit_id: Option<BusinessUnitId>,
        concern_ids: &[OptionId],
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT v.product_id, v.option_id, p.title, p.thumbnail, p.price, p.status
            FROM product_attribute_values v
            JOIN product_attributes a ON a.id = v.attribute_id
            JOIN products p ON p.id = v.product_id
            WHERE a.handle = $1
              AND ($2::uuid IS NULL OR a.business_unit_id = $2)
              AND v.option_id = ANY($3)
              AND p.deleted_at IS NULL
            ORDER BY v.created_at, v.id
            "#,
        )
        .bind(SKIN_CONCERNS_HANDLE)
        .bind(business_unit_id)
        .bind(concern_ids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}

/// Base products paired with any of `booster_ids`, in display order.
pub async fn find_base_matches(booster_ids: &[ProductId], pool: &PgPool) -> Result<Vec<BaseMatch>> {
    let rows = AddonMatch::find_for_addons(booster_ids, pool).await?;

    Ok(rows
        .into_iter()
        .map(|row| BaseMatch {
            addon_product_id: row.addon_product_id,
            base: ProductCard {
                id: row.base.id,
                published: row.base.is_published(),
                title: row.base.title,
                thumbnail: row.base.thumbnail,
                price: row.base.price,
            },
        })
        .collect())
}
