// Admin GraphQL schema and context
pub mod context;
pub mod schema;

pub use context::*;
pub use schema::*;
