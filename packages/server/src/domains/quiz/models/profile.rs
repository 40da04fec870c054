use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{BusinessUnitId, ProfileId};
use crate::domains::quiz::answers::QuizAnswers;

pub const DEFAULT_SOURCE: &str = "website";

/// CustomerProfile model - one per quiz taker
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CustomerProfile {
    pub id: ProfileId,
    pub business_unit_id: Option<BusinessUnitId>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub source: String,

    // Quiz answers
    pub gender: Option<String>,
    pub age_group: Option<String>,
    pub climate: Option<String>,
    pub skin_type: Option<String>,
    pub skin_tone: Option<String>,
    pub sun_exposure: Option<String>,
    pub current_routine: Option<String>,
    pub product_preference: Option<String>,
    pub monthly_budget: Option<String>,

    pub quiz_step: i32,
    pub quiz_completed: bool,
    pub quiz_completed_at: Option<DateTime<Utc>>,
    pub recommendation_generated: bool,
    pub recommendation_generated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields written when a quiz step is saved
#[derive(Debug, Clone, Default)]
pub struct ProfileProgress {
    pub quiz_step: Option<i32>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub completed: bool,
}

impl CustomerProfile {
    pub async fn find_by_id(id: ProfileId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM customer_profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Start a new quiz at step 1.
    pub async fn create(
        business_unit_id: Option<BusinessUnitId>,
        email: Option<&str>,
        name: Option<&str>,
        source: Option<&str>,
        answers: &QuizAnswers,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO customer_profiles (
                id, business_unit_id, email, name, source, quiz_step,
                gender, age_group, climate, skin_type, skin_tone, sun_exposure,
                current_routine, product_preference, monthly_budget
            )
            VALUES ($1, $2, $3, $4, $5, 1, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(ProfileId::new())
        .bind(business_unit_id)
        .bind(email)
        .bind(name)
        .bind(source.unwrap_or(DEFAULT_SOURCE))
        .bind(&answers.gender)
        .bind(&answers.age_group)
        .bind(&answers.climate)
        .bind(&answers.skin_type)
        .bind(&answers.skin_tone)
        .bind(&answers.sun_exposure)
        .bind(&answers.current_routine)
        .bind(&answers.product_preference)
        .bind(&answers.monthly_budget)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Save answers for a step; only answered fields are overwritten.
    ///
    /// Returns `None` if the profile does not exist.
    pub async fn save_progress(
        id: ProfileId,
        progress: &ProfileProgress,
        answers: &QuizAnswers,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE customer_profiles SET
                quiz_step = COALESCE($2, quiz_step),
                email = COALESCE($3, email),
                name = COALESCE($4, name),
                gender = COALESCE($5, gender),
                age_group = COALESCE($6, age_group),
                climate = COALESCE($7, climate),
                skin_type = COALESCE($8, skin_type),
                skin_tone = COALESCE($9, skin_tone),
                sun_exposure = COALESCE($10, sun_exposure),
                current_routine = COALESCE($11, current_routine),
                product_preference = COALESCE($12, product_preference),
                monthly_budget = COALESCE($13, monthly_budget),
                quiz_completed = quiz_completed OR $14,
                quiz_completed_at = CASE WHEN $14 THEN NOW() ELSE quiz_completed_at END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(progress.quiz_step)
        .bind(&progress.email)
        .bind(&progress.name)
        .bind(&answers.gender)
        .bind(&answers.age_group)
        .bind(&answers.climate)
        .bind(&answers.skin_type)
        .bind(&answers.skin_tone)
        .bind(&answers.sun_exposure)
        .bind(&answers.current_routine)
        .bind(&answers.product_preference)
        .bind(&answers.monthly_budget)
        .bind(progress.completed)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn mark_recommendation_generated(id: ProfileId, pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE customer_profiles SET
                recommendation_generated = true,
                recommendation_generated_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
