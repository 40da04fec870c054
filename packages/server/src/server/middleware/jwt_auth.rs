use crate::domains::auth::JwtService;
use crate::server::error::ApiError;
use axum::{middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Authenticated staff user from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub is_admin: bool,
}

/// JWT authentication middleware
///
/// Extracts JWT token from Authorization header, verifies it, and adds AuthUser to request extensions.
/// If no token or invalid token, request continues without AuthUser (public access).
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let auth_user = extract_auth_user(&request, &jwt_service);

    if let Some(user) = auth_user {
        debug!(
            "Authenticated user: {} (admin: {})",
            user.user_id, user.is_admin
        );
        request.extensions_mut().insert(user);
    } else {
        debug!("No valid authentication token");
    }

    next.run(request).await
}

/// Any authenticated staff user (roleplay training).
pub fn require_staff(user: Option<&AuthUser>) -> Result<&AuthUser, ApiError> {
    user.ok_or_else(|| ApiError::unauthorized("Authentication required"))
}

/// Admin-only REST endpoints.
pub fn require_admin(user: Option<&AuthUser>) -> Result<&AuthUser, ApiError> {
    let user = require_staff(user)?;
    if !user.is_admin {
        return Err(ApiError::forbidden("Admin access required"));
    }
    Ok(user)
}

/// Extract and verify JWT token from request
fn extract_auth_user(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Option<AuthUser> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Handle both "Bearer <token>" and raw token
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    let claims = jwt_service.verify_token(token).ok()?;

    Some(AuthUser {
        user_id: claims.user_id,
        email: claims.email,
        is_admin: claims.is_admin,
    })
}
