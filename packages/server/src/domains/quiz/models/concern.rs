use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ConcernSelectionId, OptionId, ProfileId};
use crate::domains::catalog::{AttributeOption, DEFAULT_CATEGORY};
use crate::domains::quiz::answers::ConcernSelection;

/// CustomerConcern model - a concern picked in the quiz, with weighting
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CustomerConcern {
    pub id: ConcernSelectionId,
    pub profile_id: ProfileId,
    pub concern_id: OptionId,
    pub severity: i32,
    pub is_priority: bool,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Selection joined with its option and the option's category
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ConcernDetail {
    pub id: ConcernSelectionId,
    pub concern_id: OptionId,
    pub severity: i32,
    pub is_priority: bool,
    pub category: Option<String>,
    pub concern_name: Option<String>,
    pub concern_handle: Option<String>,
    pub option_category: Option<String>,
}

impl ConcernDetail {
    /// Selection category, else the option's category, else the default.
    pub fn resolved_category(&self) -> &str {
        self.category
            .as_deref()
            .or(self.option_category.as_deref())
            .unwrap_or(DEFAULT_CATEGORY)
    }
}

impl CustomerConcern {
    pub async fn find_for_profile(profile_id: ProfileId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM customer_concerns WHERE profile_id = $1 ORDER BY created_at, id",
        )
        .bind(profile_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn details_for_profile(
        profile_id: ProfileId,
        pool: &PgPool,
    ) -> Result<Vec<ConcernDetail>> {
        sqlx::query_as::<_, ConcernDetail>(
            r#"
            SELECT
                cc.id, cc.concern_id, cc.severity, cc.is_priority, cc.category,
                o.name AS concern_name,
                o.handle AS concern_handle,
                c.handle AS option_category
            FROM customer_concerns cc
            LEFT JOIN product_attribute_options o ON o.id = cc.concern_id
            LEFT JOIN product_categories c ON c.id = o.category_id
            WHERE cc.profile_id = $1
            ORDER BY cc.created_at, cc.id
            "#,
        )
        .bind(profile_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Category handle per known option id (option category, else `face`).
    /// Ids that match no option are absent from the map.
    pub async fn option_categories(
        ids: &[OptionId],
        pool: &PgPool,
    ) -> Result<HashMap<OptionId, String>> {
        Ok(AttributeOption::find_with_category(ids, pool)
            .await?
            .into_iter()
            .map(|o| {
                let handle = o
                    .category_handle
                    .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
                (o.id, handle)
            })
            .collect())
    }

    /// Replace a profile's concerns in one transaction, tagging each row with
    /// the category resolved by [`Self::option_categories`].
    pub async fn replace_for_profile(
        profile_id: ProfileId,
        selections: &[ConcernSelection],
        categories: &HashMap<OptionId, String>,
        pool: &PgPool,
    ) -> Result<()> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM customer_concerns WHERE profile_id = $1")
            .bind(profile_id)
            .execute(&mut *tx)
            .await?;

        for selection in selections {
            sqlx::query(
                r#"
                INSERT INTO customer_concerns (id, profile_id, concern_id, severity, is_priority, category)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(ConcernSelectionId::new())
            .bind(profile_id)
            .bind(selection.concern_id)
            .bind(selection.severity)
            .bind(selection.is_priority)
            .bind(categories.get(&selection.concern_id).cloned())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
