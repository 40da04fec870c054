use chrono::{DateTime, Utc};
use juniper::GraphQLObject;

use super::models::BusinessUnit;

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "A tenant brand or store")]
pub struct BusinessUnitData {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

impl From<BusinessUnit> for BusinessUnitData {
    fn from(b: BusinessUnit) -> Self {
        Self {
            id: b.id.to_string(),
            name: b.name,
            slug: b.slug,
            created_at: b.created_at,
        }
    }
}
