use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use typed_builder::TypedBuilder;

use crate::common::{BusinessUnitId, KnowledgeEntryId};

pub const DEFAULT_KNOWLEDGE_CATEGORY: &str = "general";

/// KnowledgeEntry model - a fact the assistant may quote
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct KnowledgeEntry {
    pub id: KnowledgeEntryId,
    pub business_unit_id: BusinessUnitId,
    pub category: String,
    pub topic: Option<String>,
    pub content: String,
    pub keywords: Vec<String>,
    pub confidence: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct CreateKnowledgeEntry {
    pub business_unit_id: BusinessUnitId,
    pub content: String,
    #[builder(default = DEFAULT_KNOWLEDGE_CATEGORY.to_string())]
    pub category: String,
    #[builder(default)]
    pub topic: Option<String>,
    #[builder(default)]
    pub keywords: Vec<String>,
    #[builder(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateKnowledgeEntry {
    pub category: Option<String>,
    pub topic: Option<String>,
    pub content: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub confidence: Option<f64>,
}

impl KnowledgeEntry {
    pub async fn find_by_id(id: KnowledgeEntryId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM knowledge_entries WHERE id = $1")
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
            SELECT * FROM knowledge_entries
            WHERE business_unit_id = $1
            ORDER BY category, created_at
            "#,
        )
        .bind(business_unit_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn create(input: CreateKnowledgeEntry, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO knowledge_entries (id, business_unit_id, category, topic, content, keywords, confidence)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(KnowledgeEntryId::new())
        .bind(input.business_unit_id)
        .bind(input.category)
        .bind(input.topic)
        .bind(input.content)
        .bind(input.keywords)
        .bind(input.confidence)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(
        id: KnowledgeEntryId,
        input: UpdateKnowledgeEntry,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE knowledge_entries SET
                category = COALESCE($2, category),
                topic = COALESCE($3, topic),
                content = COALESCE($4, content),
                keywords = COALESCE($5, keywords),
                confidence = COALESCE($6, confidence),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.category)
        .bind(input.topic)
        .bind(input.content)
        .bind(input.keywords)
        .bind(input.confidence)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: KnowledgeEntryId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM knowledge_entries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
