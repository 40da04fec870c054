use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;

use crate::common::{BusinessUnitId, LandingPageId};
use crate::domains::landing_pages::locale::Locale;

/// LandingPage model - one storefront page per business unit and locale
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LandingPage {
    pub id: LandingPageId,
    pub business_unit_id: BusinessUnitId,
    pub country: String,
    pub language_code: String,
    pub slug: Option<String>,
    pub is_active: bool,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    /// Draft body edited by admins
    pub content: serde_json::Value,
    /// Snapshot of `content` from the last publish
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_data: Option<serde_json::Value>,
    pub enable_social_login: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin save of a page's draft. `None` keeps the stored value on update.
#[derive(Debug, Clone)]
pub struct SaveLandingPage {
    pub business_unit_id: BusinessUnitId,
    pub locale: Locale,
    pub slug: Option<String>,
    pub content: Option<serde_json::Value>,
    pub enable_social_login: Option<bool>,
}

/// Body of a freshly created locale.
pub fn default_content() -> serde_json::Value {
    json!({
        "hero_type": "carousel",
        "hero_slides": [],
        "announcements": [],
        "blocks": [],
        "menu_items": [],
        "footer": {},
    })
}

impl LandingPage {
    pub fn locale(&self) -> Locale {
        Locale {
            country: self.country.clone(),
            language: self.language_code.clone(),
        }
    }

    /// The body visitors see: the published snapshot when there is one,
    /// the draft in preview. The snapshot itself is never exposed.
    pub fn rendered(mut self, preview: bool) -> Self {
        if let Some(published) = self.published_data.take() {
            if !preview {
                self.content = published;
            }
        }
        self
    }

    pub async fn find_for_locale(
        business_unit_id: BusinessUnitId,
        locale: &Locale,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM landing_pages
            WHERE business_unit_id = $1 AND country = $2 AND language_code = $3
            "#,
        )
        .bind(business_unit_id)
        .bind(&locale.country)
        .bind(&locale.language)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Active pages, ordered by country then language
    pub async fn find_active(business_unit_id: BusinessUnitId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM landing_pages
            WHERE business_unit_id = $1 AND is_active = TRUE
            ORDER BY country, language_code
            "#,
        )
        .bind(business_unit_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_business_unit(
        business_unit_id: BusinessUnitId,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM landing_pages WHERE business_unit_id = $1 ORDER BY country, language_code",
        )
        .bind(business_unit_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_slug(slug: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM landing_pages WHERE slug = $1 AND is_active = TRUE",
        )
        .bind(slug)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Whether a page other than (business unit, locale) already uses `slug`.
    pub async fn slug_taken(
        slug: &str,
        business_unit_id: BusinessUnitId,
        locale: &Locale,
        pool: &PgPool,
    ) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM landing_pages
                WHERE slug = $1
                  AND NOT (business_unit_id = $2 AND country = $3 AND language_code = $4)
            )
            "#,
        )
        .bind(slug)
        .bind(business_unit_id)
        .bind(&locale.country)
        .bind(&locale.language)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert or update the page of one locale. New pages start active.
    pub async fn upsert(input: SaveLandingPage, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO landing_pages (
                id, business_unit_id, country, language_code, slug, content, enable_social_login
            )
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, $8), COALESCE($7, FALSE))
            ON CONFLICT (business_unit_id, country, language_code) DO UPDATE SET
                slug = EXCLUDED.slug,
                content = COALESCE($6, landing_pages.content),
                enable_social_login = COALESCE($7, landing_pages.enable_social_login),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(LandingPageId::new())
        .bind(input.business_unit_id)
        .bind(&input.locale.country)
        .bind(&input.locale.language)
        .bind(input.slug)
        .bind(input.content)
        .bind(input.enable_social_login)
        .bind(default_content())
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert a new locale; `None` when the locale already exists.
    pub async fn create_locale(
        business_unit_id: BusinessUnitId,
        locale: &Locale,
        content: serde_json::Value,
        enable_social_login: bool,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO landing_pages (id, business_unit_id, country, language_code, content, enable_social_login)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (business_unit_id, country, language_code) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(LandingPageId::new())
        .bind(business_unit_id)
        .bind(&locale.country)
        .bind(&locale.language)
        .bind(content)
        .bind(enable_social_login)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Publishing snapshots the draft; unpublishing only clears the flag.
    pub async fn set_published(
        business_unit_id: BusinessUnitId,
        locale: &Locale,
        is_published: bool,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE landing_pages SET
                is_published = $4,
                published_at = CASE WHEN $4 THEN NOW() ELSE NULL END,
                published_data = CASE WHEN $4 THEN content ELSE published_data END,
                updated_at = NOW()
            WHERE business_unit_id = $1 AND country = $2 AND language_code = $3
            RETURNING *
            "#,
        )
        .bind(business_unit_id)
        .bind(&locale.country)
        .bind(&locale.language)
        .bind(is_published)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Returns false when there was nothing to delete.
    pub async fn delete_locale(
        business_unit_id: BusinessUnitId,
        locale: &Locale,
        pool: &PgPool,
    ) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM landing_pages WHERE business_unit_id = $1 AND country = $2 AND language_code = $3",
        )
        .bind(business_unit_id)
        .bind(&locale.country)
        .bind(&locale.language)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
