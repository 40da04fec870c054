// Common types shared across domains and the HTTP layer

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::BusinessUnitId;

lazy_static! {
    static ref UUID_REGEX: Regex = Regex::new(
        r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$"
    ).unwrap();
}

/// How a caller names a business unit: by id or by slug.
///
/// Public endpoints accept either (`?businessUnitId=skincoach` or the
/// UUID), so the string is classified before any lookup happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusinessUnitRef {
    Id(BusinessUnitId),
    Slug(String),
}

impl BusinessUnitRef {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if UUID_REGEX.is_match(raw) {
            if let Ok(id) = BusinessUnitId::parse(raw) {
                return BusinessUnitRef::Id(id);
            }
        }
        BusinessUnitRef::Slug(raw.to_string())
    }
}

/// Deletion / mutation acknowledgement returned by admin endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, juniper::GraphQLObject)]
pub struct OperationResult {
    pub success: bool,
    pub message: Option<String>,
}

impl OperationResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_strings_are_ids() {
        let id = BusinessUnitId::new();
        assert_eq!(
            BusinessUnitRef::parse(&id.to_string().to_uppercase()),
            BusinessUnitRef::Id(id)
        );
    }

    #[test]
    fn anything_else_is_a_slug() {
        assert_eq!(
            BusinessUnitRef::parse(" skincoach "),
            BusinessUnitRef::Slug("skincoach".into())
        );
        assert_eq!(
            BusinessUnitRef::parse("1234"),
            BusinessUnitRef::Slug("1234".into())
        );
    }
}
