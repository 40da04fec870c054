use std::sync::Arc;

use juniper::{FieldError, FieldResult};
use sqlx::PgPool;

use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

/// GraphQL request context
///
/// Shared dependencies plus the caller resolved by the JWT middleware.
pub struct GraphQLContext {
    pub db_pool: PgPool,
    pub server_deps: Arc<ServerDeps>,
    pub auth_user: Option<AuthUser>,
}

impl juniper::Context for GraphQLContext {}

impl GraphQLContext {
    pub fn new(server_deps: Arc<ServerDeps>, auth_user: Option<AuthUser>) -> Self {
        Self {
            db_pool: server_deps.db_pool.clone(),
            server_deps,
            auth_user,
        }
    }

    pub fn deps(&self) -> &ServerDeps {
        &self.server_deps
    }

    /// Every admin resolver starts here.
    pub fn require_admin(&self) -> FieldResult<&AuthUser> {
        let user = self
            .auth_user
            .as_ref()
            .ok_or_else(|| FieldError::new("Authentication required", juniper::Value::null()))?;

        if !user.is_admin {
            return Err(FieldError::new("Admin access required", juniper::Value::null()));
        }

        Ok(user)
    }
}
