use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{BusinessUnitId, CategoryId, ProductId};

/// Body area a product or concern belongs to (`face`, `eye`, `body`, `scalp`).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductCategory {
    pub id: CategoryId,
    pub business_unit_id: BusinessUnitId,
    pub name: String,
    pub handle: String,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Category used when a product or concern has none.
pub const DEFAULT_CATEGORY: &str = "face";

impl ProductCategory {
    pub async fn find_by_id(id: CategoryId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM product_categories WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_business_unit(
        business_unit_id: BusinessUnitId,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM product_categories
            WHERE business_unit_id = $1
            ORDER BY display_order, name
            "#,
        )
        .bind(business_unit_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn create(
        business_unit_id: BusinessUnitId,
        name: &str,
        handle: &str,
        display_order: i32,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO product_categories (id, business_unit_id, name, handle, display_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(CategoryId::new())
        .bind(business_unit_id)
        .bind(name)
        .bind(handle)
        .bind(display_order)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(
        id: CategoryId,
        name: Option<&str>,
        handle: Option<&str>,
        display_order: Option<i32>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE product_categories SET
                name = COALESCE($2, name),
                handle = COALESCE($3, handle),
                display_order = COALESCE($4, display_order)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(handle)
        .bind(display_order)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: CategoryId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM product_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Replace the categories a product is listed under (order preserved).
    pub async fn set_for_product(
        product_id: ProductId,
        category_ids: &[CategoryId],
        pool: &PgPool,
    ) -> Result<()> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM product_category_mapping WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        for (index, category_id) in category_ids.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO product_category_mapping (product_id, category_id, display_order)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(product_id)
            .bind(category_id)
            .bind(index as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Handles of a product's categories, in mapping order.
    pub async fn handles_for_product(product_id: ProductId, pool: &PgPool) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT c.handle
            FROM product_category_mapping m
            JOIN product_categories c ON c.id = m.category_id
            WHERE m.product_id = $1
            ORDER BY m.display_order, c.display_order
            "#,
        )
        .bind(product_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
