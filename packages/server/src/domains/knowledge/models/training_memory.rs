use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{BusinessUnitId, TrainingLessonId};

/// One lesson a trainer recorded during roleplay
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TrainingMemory {
    pub id: TrainingLessonId,
    pub business_unit_id: BusinessUnitId,
    pub scenario: String,
    pub lesson: String,
    pub created_at: DateTime<Utc>,
}

/// Lessons grouped by scenario, scenarios in first-recorded order
pub type LessonsByScenario = Vec<(String, Vec<String>)>;

impl TrainingMemory {
    pub async fn find_by_business_unit(
        business_unit_id: BusinessUnitId,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM training_memory WHERE business_unit_id = $1 ORDER BY created_at, id",
        )
        .bind(business_unit_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn record(
        business_unit_id: BusinessUnitId,
        scenario: &str,
        lesson: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO training_memory (id, business_unit_id, scenario, lesson)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(TrainingLessonId::new())
        .bind(business_unit_id)
        .bind(scenario)
        .bind(lesson)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: TrainingLessonId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM training_memory WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub fn group_by_scenario(rows: Vec<TrainingMemory>) -> LessonsByScenario {
        let mut grouped: LessonsByScenario = Vec::new();
        for row in rows {
            match grouped.iter_mut().find(|(scenario, _)| *scenario == row.scenario) {
                Some((_, lessons)) => lessons.push(row.lesson),
                None => grouped.push((row.scenario, vec![row.lesson])),
            }
        }
        grouped
    }
}
