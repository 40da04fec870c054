use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ProfileId, RecommendationId};

/// Offers stay valid for a week
pub const RECOMMENDATION_TTL_DAYS: i64 = 7;
pub const FULL_ROUTINE_TYPE: &str = "full_routine";
pub const PENDING_STATUS: &str = "pending";

/// CustomerRecommendation model - a persisted offer
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CustomerRecommendation {
    pub id: RecommendationId,
    pub profile_id: ProfileId,
    pub recommendation_type: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub original_price: Decimal,
    pub discount_percent: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_price: Decimal,
    pub duration_months: i32,
    pub products: serde_json::Value,
    pub status: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRecommendation {
    pub profile_id: ProfileId,
    pub recommendation_type: String,
    pub title: String,
    pub description: Option<String>,
    pub original_price: Decimal,
    pub discount_percent: i32,
    pub final_price: Decimal,
    pub duration_months: i32,
    pub products: serde_json::Value,
}

impl CustomerRecommendation {
    /// Insert as pending, expiring [`RECOMMENDATION_TTL_DAYS`] from now.
    pub async fn create(input: NewRecommendation, pool: &PgPool) -> Result<Self> {
        let expires_at = Utc::now() + Duration::days(RECOMMENDATION_TTL_DAYS);

        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO customer_recommendations (
                id, profile_id, recommendation_type, title, description,
                original_price, discount_percent, final_price, duration_months,
                products, status, expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(RecommendationId::new())
        .bind(input.profile_id)
        .bind(input.recommendation_type)
        .bind(input.title)
        .bind(input.description)
        .bind(input.original_price)
        .bind(input.discount_percent)
        .bind(input.final_price)
        .bind(input.duration_months)
        .bind(input.products)
        .bind(PENDING_STATUS)
        .bind(expires_at)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Newest first
    pub async fn find_for_profile(profile_id: ProfileId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM customer_recommendations
            WHERE profile_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(profile_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
