use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use typed_builder::TypedBuilder;

use crate::common::{BusinessUnitId, MediaFileId};

/// MediaFile model - metadata of an uploaded image or video
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MediaFile {
    pub id: MediaFileId,
    pub business_unit_id: BusinessUnitId,
    /// Stored name, `<millis>_<sanitised original>`
    pub file_name: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    /// `<business unit id>/<file_name>` in object storage
    pub storage_path: String,
    pub url: String,
    pub alt_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct CreateMediaFile {
    pub business_unit_id: BusinessUnitId,
    pub file_name: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub storage_path: String,
    pub url: String,
    #[builder(default)]
    pub alt_text: Option<String>,
}

impl MediaFile {
    pub async fn find_by_id(id: MediaFileId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM media_files WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Newest first
    pub async fn find_by_business_unit(
        business_unit_id: BusinessUnitId,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM media_files WHERE business_unit_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(business_unit_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn create(input: CreateMediaFile, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO media_files (
                id, business_unit_id, file_name, original_name, mime_type,
                size_bytes, storage_path, url, alt_text
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(MediaFileId::new())
        .bind(input.business_unit_id)
        .bind(input.file_name)
        .bind(input.original_name)
        .bind(input.mime_type)
        .bind(input.size_bytes)
        .bind(input.storage_path)
        .bind(input.url)
        .bind(input.alt_text)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// `None` when the file does not exist
    pub async fn update_details(
        id: MediaFileId,
        original_name: Option<&str>,
        alt_text: Option<&str>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE media_files SET
                original_name = COALESCE($2, original_name),
                alt_text = COALESCE($3, alt_text)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(original_name)
        .bind(alt_text)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: MediaFileId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM media_files WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
