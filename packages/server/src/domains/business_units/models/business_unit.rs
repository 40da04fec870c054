use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{BusinessUnitId, BusinessUnitRef};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BusinessUnit {
    pub id: BusinessUnitId,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

impl BusinessUnit {
    pub async fn find_by_id(id: BusinessUnitId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM business_units WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_slug(slug: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM business_units WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Resolve an id-or-slug reference to a tenant id.
    ///
    /// A UUID is trusted as-is without a round trip; a slug is looked up.
    /// Returns `None` for an unknown slug.
    pub async fn resolve(reference: &BusinessUnitRef, pool: &PgPool) -> Result<Option<BusinessUnitId>> {
        match reference {
            BusinessUnitRef::Id(id) => Ok(Some(*id)),
            BusinessUnitRef::Slug(slug) => {
                Ok(Self::find_by_slug(slug, pool).await?.map(|bu| bu.id))
            }
        }
    }

    pub async fn create(name: &str, slug: &str, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO business_units (id, name, slug) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(BusinessUnitId::new())
        .bind(name)
        .bind(slug)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM business_units ORDER BY name")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }
}
