use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;

use super::error::MediaError;
use super::models::{CreateMediaFile, MediaFile};
use super::validation::{storage_path, stored_file_name, validate_upload};
use crate::common::{BusinessUnitId, MediaFileId};

/// Metadata of a file already uploaded to object storage
#[derive(Debug, Clone, Default)]
pub struct RegisterMedia {
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub url: String,
    pub alt_text: Option<String>,
}

pub async fn list_media(business_unit_id: BusinessUnitId, pool: &PgPool) -> Result<Vec<MediaFile>> {
    MediaFile::find_by_business_unit(business_unit_id, pool).await
}

pub async fn register_media(
    business_unit_id: BusinessUnitId,
    input: RegisterMedia,
    pool: &PgPool,
) -> Result<MediaFile, MediaError> {
    validate_upload(&input.original_name, &input.mime_type, input.size_bytes)?;

    let url = input.url.trim();
    if url.is_empty() {
        return Err(MediaError::UrlRequired);
    }

    let file_name = stored_file_name(&input.original_name, Utc::now());
    let file = MediaFile::create(
        CreateMediaFile::builder()
            .business_unit_id(business_unit_id)
            .storage_path(storage_path(business_unit_id, &file_name))
            .file_name(file_name)
            .original_name(input.original_name.trim())
            .mime_type(input.mime_type.trim().to_lowercase())
            .size_bytes(input.size_bytes)
            .url(url)
            .alt_text(input.alt_text.filter(|a| !a.trim().is_empty()))
            .build(),
        pool,
    )
    .await?;

    info!(media_file_id = %file.id, path = %file.storage_path, bytes = file.size_bytes, "Media file registered");
    Ok(file)
}

pub async fn update_media(
    id: MediaFileId,
    original_name: Option<&str>,
    alt_text: Option<&str>,
    pool: &PgPool,
) -> Result<MediaFile, MediaError> {
    let original_name = original_name.map(str::trim).filter(|n| !n.is_empty());
    MediaFile::update_details(id, original_name, alt_text, pool)
        .await?
        .ok_or(MediaError::NotFound)
}

pub async fn delete_media(id: MediaFileId, pool: &PgPool) -> Result<(), MediaError> {
    if !MediaFile::delete(id, pool).await? {
        return Err(MediaError::NotFound);
    }
    info!(media_file_id = %id, "Media file deleted");
    Ok(())
}
