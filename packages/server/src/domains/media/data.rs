use chrono::{DateTime, Utc};
use juniper::{GraphQLInputObject, GraphQLObject};

use super::models::MediaFile;

#[derive(Debug, Clone, GraphQLObject)]
pub struct MediaFileData {
    pub id: String,
    pub business_unit_id: String,
    pub file_name: String,
    pub original_name: String,
    pub mime_type: String,
    /// Bytes; GraphQL Int is 32-bit and uploads are capped at 50MB
    pub size_bytes: i32,
    pub storage_path: String,
    pub url: String,
    pub alt_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<MediaFile> for MediaFileData {
    fn from(m: MediaFile) -> Self {
        Self {
            id: m.id.to_string(),
            business_unit_id: m.business_unit_id.to_string(),
            file_name: m.file_name,
            original_name: m.original_name,
            mime_type: m.mime_type,
            size_bytes: i32::try_from(m.size_bytes).unwrap_or(i32::MAX),
            storage_path: m.storage_path,
            url: m.url,
            alt_text: m.alt_text,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct MediaFileInput {
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i32,
    pub url: String,
    pub alt_text: Option<String>,
}
