use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use typed_builder::TypedBuilder;

use crate::common::{BusinessUnitId, ProductId, ProductTypeId};

/// Product lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Draft,
    Published,
    Archived,
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductStatus::Draft => write!(f, "draft"),
            ProductStatus::Published => write!(f, "published"),
            ProductStatus::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "draft" => Ok(ProductStatus::Draft),
            "published" => Ok(ProductStatus::Published),
            "archived" => Ok(ProductStatus::Archived),
            _ => Err(anyhow::anyhow!("Invalid product status: {}", s)),
        }
    }
}

/// Product model - base products and boosters (add-ons) alike
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub business_unit_id: BusinessUnitId,
    pub product_type_id: Option<ProductTypeId>,
    pub title: String,
    pub handle: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub status: String,
    pub price: Decimal,

    // Free-text benefits per body area, read by the concern assignment job
    pub face_benefits: Option<String>,
    pub eye_benefits: Option<String>,
    pub body_benefits: Option<String>,
    pub hair_benefits: Option<String>,

    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Product row plus the add-on flag resolved from its type or metadata.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductWithKind {
    #[sqlx(flatten)]
    pub product: Product,
    pub is_addon: bool,
}

/// SQL expression: product `p` is an add-on if its type says so or its
/// metadata carries `"is_addon": true`.
pub(crate) const IS_ADDON_SQL: &str =
    "(COALESCE(pt.is_addon, false) OR COALESCE(p.metadata->>'is_addon', '') = 'true')";

#[derive(TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct CreateProduct {
    pub business_unit_id: BusinessUnitId,
    pub title: String,
    pub handle: String,
    #[builder(default)]
    pub product_type_id: Option<ProductTypeId>,
    #[builder(default)]
    pub description: Option<String>,
    #[builder(default)]
    pub thumbnail: Option<String>,
    #[builder(default = ProductStatus::Draft)]
    pub status: ProductStatus,
    #[builder(default)]
    pub price: Decimal,
    #[builder(default)]
    pub face_benefits: Option<String>,
    #[builder(default)]
    pub eye_benefits: Option<String>,
    #[builder(default)]
    pub body_benefits: Option<String>,
    #[builder(default)]
    pub hair_benefits: Option<String>,
    #[builder(default = serde_json::json!({}))]
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub title: Option<String>,
    pub handle: Option<String>,
    pub product_type_id: Option<ProductTypeId>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub status: Option<ProductStatus>,
    pub price: Option<Decimal>,
    pub face_benefits: Option<String>,
    pub eye_benefits: Option<String>,
    pub body_benefits: Option<String>,
    pub hair_benefits: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl Product {
    pub fn is_published(&self) -> bool {
        self.status == ProductStatus::Published.to_string()
    }

    /// Benefit text for a category handle (`scalp` reads `hair_benefits`).
    pub fn benefits_for(&self, category_handle: &str) -> Option<&str> {
        let text = match category_handle {
            "face" => self.face_benefits.as_deref(),
            "eye" => self.eye_benefits.as_deref(),
            "body" => self.body_benefits.as_deref(),
            "scalp" => self.hair_benefits.as_deref(),
            _ => None,
        };
        text.filter(|t| !t.trim().is_empty())
    }

    pub async fn find_by_id(id: ProductId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM products WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_ids(ids: &[ProductId], pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM products WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_business_unit(
        business_unit_id: BusinessUnitId,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM products
            WHERE business_unit_id = $1 AND deleted_at IS NULL
            ORDER BY title
            "#,
        )
        .bind(business_unit_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Published, non-deleted products with their add-on flag.
    ///
    /// Scoped to a business unit and/or a single product when given.
    pub async fn find_published_with_kind(
        business_unit_id: Option<BusinessUnitId>,
        product_id: Option<ProductId>,
        pool: &PgPool,
    ) -> Result<Vec<ProductWithKind>> {
        let sql = format!(
            r#"
            SELECT p.*, {is_addon} AS is_addon
            FROM products p
            LEFT JOIN product_types pt ON pt.id = p.product_type_id
            WHERE p.deleted_at IS NULL
              AND p.status = 'published'
              AND ($1::uuid IS NULL OR p.business_unit_id = $1)
              AND ($2::uuid IS NULL OR p.id = $2)
            ORDER BY p.title
            "#,
            is_addon = IS_ADDON_SQL
        );
        sqlx::query_as::<_, ProductWithKind>(&sql)
            .bind(business_unit_id)
            .bind(product_id)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Boosters of a business unit (any status, not deleted).
    pub async fn find_addons(business_unit_id: BusinessUnitId, pool: &PgPool) -> Result<Vec<Self>> {
        let sql = format!(
            r#"
            SELECT p.*
            FROM products p
            LEFT JOIN product_types pt ON pt.id = p.product_type_id
            WHERE p.business_unit_id = $1
              AND p.deleted_at IS NULL
              AND {is_addon}
            ORDER BY p.title
            "#,
            is_addon = IS_ADDON_SQL
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(business_unit_id)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn create(input: CreateProduct, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO products (
                id, business_unit_id, product_type_id, title, handle, description,
                thumbnail, status, price, face_benefits, eye_benefits, body_benefits,
                hair_benefits, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(ProductId::new())
        .bind(input.business_unit_id)
        .bind(input.product_type_id)
        .bind(input.title)
        .bind(input.handle)
        .bind(input.description)
        .bind(input.thumbnail)
        .bind(input.status.to_string())
        .bind(input.price)
        .bind(input.face_benefits)
        .bind(input.eye_benefits)
        .bind(input.body_benefits)
        .bind(input.hair_benefits)
        .bind(input.metadata)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(id: ProductId, input: UpdateProduct, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE products SET
                title = COALESCE($2, title),
                handle = COALESCE($3, handle),
                product_type_id = COALESCE($4, product_type_id),
                description = COALESCE($5, description),
                thumbnail = COALESCE($6, thumbnail),
                status = COALESCE($7, status),
                price = COALESCE($8, price),
                face_benefits = COALESCE($9, face_benefits),
                eye_benefits = COALESCE($10, eye_benefits),
                body_benefits = COALESCE($11, body_benefits),
                hair_benefits = COALESCE($12, hair_benefits),
                metadata = COALESCE($13, metadata),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.title)
        .bind(input.handle)
        .bind(input.product_type_id)
        .bind(input.description)
        .bind(input.thumbnail)
        .bind(input.status.map(|s| s.to_string()))
        .bind(input.price)
        .bind(input.face_benefits)
        .bind(input.eye_benefits)
        .bind(input.body_benefits)
        .bind(input.hair_benefits)
        .bind(input.metadata)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Soft delete; the row stays for historical recommendations.
    pub async fn soft_delete(id: ProductId, pool: &PgPool) -> Result<()> {
        sqlx::query("UPDATE products SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
