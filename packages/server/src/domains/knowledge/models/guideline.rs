use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{BusinessUnitId, GuidelineId};

/// Guideline model - house rules for how the assistant answers
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Guideline {
    pub id: GuidelineId,
    pub business_unit_id: BusinessUnitId,
    pub category: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Guideline {
    pub async fn find_by_business_unit(
        business_unit_id: BusinessUnitId,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM guidelines WHERE business_unit_id = $1 ORDER BY created_at",
        )
        .bind(business_unit_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn create(
        business_unit_id: BusinessUnitId,
        category: &str,
        title: &str,
        content: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO guidelines (id, business_unit_id, category, title, content)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(GuidelineId::new())
        .bind(business_unit_id)
        .bind(category)
        .bind(title)
        .bind(content)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(
        id: GuidelineId,
        category: Option<&str>,
        title: Option<&str>,
        content: Option<&str>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE guidelines SET
                category = COALESCE($2, category),
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(category)
        .bind(title)
        .bind(content)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: GuidelineId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM guidelines WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
