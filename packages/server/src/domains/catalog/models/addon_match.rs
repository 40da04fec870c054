use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashSet;

use super::{Product, IS_ADDON_SQL};
use crate::common::{AttributeId, OptionId, ProductId};
use crate::domains::catalog::addon_scoring::SharedConcernRow;

/// First occurrence of each id, in input order.
fn unique_in_order(ids: &[ProductId]) -> Vec<ProductId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Base product → booster pairing shown as "goes well with".
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AddonMatch {
    pub product_id: ProductId,
    pub addon_product_id: ProductId,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

/// A match row joined with its base product.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AddonMatchWithBase {
    pub addon_product_id: ProductId,
    pub match_order: i32,
    #[sqlx(flatten)]
    pub base: Product,
}

impl AddonMatch {
    /// Matched add-on ids for a product, in display order.
    pub async fn addon_ids_for_product(
        product_id: ProductId,
        pool: &PgPool,
    ) -> Result<Vec<ProductId>> {
        sqlx::query_scalar::<_, ProductId>(
            r#"
            SELECT addon_product_id FROM product_addon_matches
            WHERE product_id = $1
            ORDER BY display_order
            "#,
        )
        .bind(product_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Replace a product's matches; `display_order` is the position in
    /// `addon_ids` after repeats are dropped. Returns how many were stored.
    pub async fn replace(
        product_id: ProductId,
        addon_ids: &[ProductId],
        pool: &PgPool,
    ) -> Result<usize> {
        let addon_ids = unique_in_order(addon_ids);
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM product_addon_matches WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        for (index, addon_id) in addon_ids.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO product_addon_matches (product_id, addon_product_id, display_order)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(product_id)
            .bind(addon_id)
            .bind(index as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(addon_ids.len())
    }

    /// Matches whose add-on is one of `addon_ids`, joined with the (non-deleted)
    /// base product, ordered by display order.
    pub async fn find_for_addons(
        addon_ids: &[ProductId],
        pool: &PgPool,
    ) -> Result<Vec<AddonMatchWithBase>> {
        sqlx::query_as::<_, AddonMatchWithBase>(
            r#"
            SELECT m.addon_product_id, m.display_order AS match_order, p.*
            FROM product_addon_matches m
            JOIN products p ON p.id = m.product_id
            WHERE m.addon_product_id = ANY($1)
              AND p.deleted_at IS NULL
            ORDER BY m.display_order, m.created_at
            "#,
        )
        .bind(addon_ids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Published boosters (other than `product_id`) tagged with any of
    /// `option_ids` under `attribute_id`; one row per mapping.
    pub async fn shared_concern_rows(
        product_id: ProductId,
        attribute_id: AttributeId,
        option_ids: &[OptionId],
        pool: &PgPool,
    ) -> Result<Vec<SharedConcernRow>> {
        let sql = format!(
            r#"
            SELECT v.product_id AS addon_id, p.title, p.thumbnail, v.option_id
            FROM product_attribute_values v
            JOIN products p ON p.id = v.product_id
            LEFT JOIN product_types pt ON pt.id = p.product_type_id
            WHERE v.attribute_id = $1
              AND v.option_id = ANY($2)
              AND v.product_id <> $3
              AND p.status = 'published'
              AND p.deleted_at IS NULL
              AND {is_addon}
            ORDER BY v.created_at, v.id
            "#,
            is_addon = IS_ADDON_SQL
        );
        sqlx::query_as::<_, SharedConcernRow>(&sql)
            .bind(attribute_id)
            .bind(option_ids)
            .bind(product_id)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }
}
