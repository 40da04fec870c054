use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{BusinessUnitId, ProductTypeId};

/// Product type; `is_addon` marks boosters.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductType {
    pub id: ProductTypeId,
    pub business_unit_id: BusinessUnitId,
    pub name: String,
    pub handle: String,
    pub is_addon: bool,
    pub created_at: DateTime<Utc>,
}

impl ProductType {
    pub async fn find_by_business_unit(
        business_unit_id: BusinessUnitId,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM product_types WHERE business_unit_id = $1 ORDER BY name",
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
        is_addon: bool,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO product_types (id, business_unit_id, name, handle, is_addon)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(ProductTypeId::new())
        .bind(business_unit_id)
        .bind(name)
        .bind(handle)
        .bind(is_addon)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
