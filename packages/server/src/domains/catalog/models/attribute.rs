use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{AttributeId, BusinessUnitId, CategoryId, OptionId, ProductId};

/// Handle of the attribute whose options are customer concerns.
pub const SKIN_CONCERNS_HANDLE: &str = "skin_concerns";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductAttribute {
    pub id: AttributeId,
    pub business_unit_id: BusinessUnitId,
    pub name: String,
    pub handle: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttributeOption {
    pub id: OptionId,
    pub attribute_id: AttributeId,
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub handle: String,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Option joined with its category handle.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OptionWithCategory {
    pub id: OptionId,
    pub name: String,
    pub handle: String,
    pub display_order: i32,
    pub category_handle: Option<String>,
}

/// A product tagged with an attribute option, as listed for the admin UI.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttributeValueRow {
    pub product_id: ProductId,
    pub attribute_id: AttributeId,
    pub attribute_name: String,
    pub option_id: OptionId,
    pub option_name: String,
}

/// Bare product → concern mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct ConcernMapping {
    pub product_id: ProductId,
    pub option_id: OptionId,
}

impl ProductAttribute {
    pub async fn find_by_handle(
        business_unit_id: BusinessUnitId,
        handle: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM product_attributes WHERE business_unit_id = $1 AND handle = $2",
        )
        .bind(business_unit_id)
        .bind(handle)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// The tenant's `skin_concerns` attribute, if configured.
    pub async fn skin_concerns(
        business_unit_id: BusinessUnitId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        Self::find_by_handle(business_unit_id, SKIN_CONCERNS_HANDLE, pool).await
    }

    pub async fn find_by_business_unit(
        business_unit_id: BusinessUnitId,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM product_attributes WHERE business_unit_id = $1 ORDER BY name",
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
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO product_attributes (id, business_unit_id, name, handle)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(AttributeId::new())
        .bind(business_unit_id)
        .bind(name)
        .bind(handle)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: AttributeId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM product_attributes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

impl AttributeOption {
    pub async fn find_by_id(id: OptionId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM product_attribute_options WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Options of an attribute with their category handles, in display order.
    pub async fn find_for_attribute(
        attribute_id: AttributeId,
        pool: &PgPool,
    ) -> Result<Vec<OptionWithCategory>> {
        sqlx::query_as::<_, OptionWithCategory>(
            r#"
            SELECT o.id, o.name, o.handle, o.display_order, c.handle AS category_handle
            FROM product_attribute_options o
            LEFT JOIN product_categories c ON c.id = o.category_id
            WHERE o.attribute_id = $1
            ORDER BY o.display_order, o.name
            "#,
        )
        .bind(attribute_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_with_category(
        ids: &[OptionId],
        pool: &PgPool,
    ) -> Result<Vec<OptionWithCategory>> {
        sqlx::query_as::<_, OptionWithCategory>(
            r#"
            SELECT o.id, o.name, o.handle, o.display_order, c.handle AS category_handle
            FROM product_attribute_options o
            LEFT JOIN product_categories c ON c.id = o.category_id
            WHERE o.id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Options of an attribute limited to one category.
    pub async fn find_for_category(
        attribute_id: AttributeId,
        category_id: CategoryId,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM product_attribute_options
            WHERE attribute_id = $1 AND category_id = $2
            ORDER BY display_order, name
            "#,
        )
        .bind(attribute_id)
        .bind(category_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn create(
        attribute_id: AttributeId,
        category_id: Option<CategoryId>,
        name: &str,
        handle: &str,
        display_order: i32,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO product_attribute_options (id, attribute_id, category_id, name, handle, display_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(OptionId::new())
        .bind(attribute_id)
        .bind(category_id)
        .bind(name)
        .bind(handle)
        .bind(display_order)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(
        id: OptionId,
        name: Option<&str>,
        category_id: Option<CategoryId>,
        display_order: Option<i32>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE product_attribute_options SET
                name = COALESCE($2, name),
                category_id = COALESCE($3, category_id),
                display_order = COALESCE($4, display_order)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(category_id)
        .bind(display_order)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: OptionId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM product_attribute_options WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

/// product_attribute_values access
pub struct AttributeValue;

impl AttributeValue {
    /// Replace a product's options for one attribute.
    pub async fn replace(
        product_id: ProductId,
        attribute_id: AttributeId,
        option_ids: &[OptionId],
        pool: &PgPool,
    ) -> Result<()> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "DELETE FROM product_attribute_values WHERE product_id = $1 AND attribute_id = $2",
        )
        .bind(product_id)
        .bind(attribute_id)
        .execute(&mut *tx)
        .await?;

        for option_id in option_ids {
            sqlx::query(
                r#"
                INSERT INTO product_attribute_values (id, product_id, attribute_id, option_id)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (product_id, attribute_id, option_id) DO NOTHING
                "#,
            )
            .bind(uuid::Uuid::now_v7())
            .bind(product_id)
            .bind(attribute_id)
            .bind(option_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn list_for_products(
        product_ids: &[ProductId],
        pool: &PgPool,
    ) -> Result<Vec<AttributeValueRow>> {
        sqlx::query_as::<_, AttributeValueRow>(
            r#"
            SELECT v.product_id, v.attribute_id, a.name AS attribute_name,
                   v.option_id, o.name AS option_name
            FROM product_attribute_values v
            JOIN product_attributes a ON a.id = v.attribute_id
            JOIN product_attribute_options o ON o.id = v.option_id
            WHERE v.product_id = ANY($1)
            ORDER BY a.name, o.display_order, o.name
            "#,
        )
        .bind(product_ids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Option ids a product carries for an attribute.
    pub async fn option_ids_for_product(
        product_id: ProductId,
        attribute_id: AttributeId,
        pool: &PgPool,
    ) -> Result<Vec<OptionId>> {
        sqlx::query_scalar::<_, OptionId>(
            r#"
            SELECT option_id FROM product_attribute_values
            WHERE product_id = $1 AND attribute_id = $2
            ORDER BY created_at
            "#,
        )
        .bind(product_id)
        .bind(attribute_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Every mapping for an attribute, in insertion order.
    pub async fn mappings_for_attribute(
        attribute_id: AttributeId,
        pool: &PgPool,
    ) -> Result<Vec<ConcernMapping>> {
        sqlx::query_as::<_, ConcernMapping>(
            r#"
            SELECT product_id, option_id FROM product_attribute_values
            WHERE attribute_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(attribute_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
