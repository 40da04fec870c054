//! Upload rules for the media library. Binaries live in object storage;
//! these checks run before their metadata is recorded.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use super::error::MediaError;
use crate::common::BusinessUnitId;

pub const MAX_MEDIA_BYTES: i64 = 50 * 1024 * 1024;

pub const ALLOWED_MEDIA_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
    "video/mp4",
    "video/webm",
    "video/ogg",
    "video/quicktime",
];

lazy_static! {
    static ref UNSAFE_FILE_CHARS: Regex = Regex::new(r"[^a-zA-Z0-9.\-]").unwrap();
}

pub fn validate_upload(original_name: &str, mime_type: &str, size_bytes: i64) -> Result<(), MediaError> {
    if original_name.trim().is_empty() {
        return Err(MediaError::NoFile);
    }

    let mime_type = mime_type.trim().to_lowercase();
    if !ALLOWED_MEDIA_TYPES.contains(&mime_type.as_str()) {
        return Err(MediaError::TypeNotAllowed(mime_type));
    }

    if size_bytes <= 0 {
        return Err(MediaError::EmptyFile);
    }
    if size_bytes > MAX_MEDIA_BYTES {
        return Err(MediaError::TooLarge);
    }

    Ok(())
}

/// `<unix millis>_<name>` with anything but letters, digits, `.` and `-` replaced by `_`
pub fn stored_file_name(original_name: &str, uploaded_at: DateTime<Utc>) -> String {
    format!(
        "{}_{}",
        uploaded_at.timestamp_millis(),
        UNSAFE_FILE_CHARS.replace_all(original_name.trim(), "_")
    )
}

pub fn storage_path(business_unit_id: BusinessUnitId, file_name: &str) -> String {
    format!("{}/{}", business_unit_id, file_name)
}
