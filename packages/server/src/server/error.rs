//! REST error responses
//!
//! Every failure renders as `{"error": "<message>"}` with the matching
//! status code. Internal errors are logged and replaced by a generic
//! message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::domains::chat::ChatError;
use crate::domains::landing_pages::LandingPageError;
use crate::domains::quiz::QuizError;
use crate::domains::recommendations::RecommendationError;

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::BAD_REQUEST,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::NOT_FOUND,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::UNAUTHORIZED,
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::FORBIDDEN,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Log the cause, hide it from the client.
fn internal_error(context: &str, e: anyhow::Error) -> ApiError {
    error!(error = %e, "{}", context);
    ApiError::internal(context)
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        internal_error("Internal server error", e)
    }
}

impl From<QuizError> for ApiError {
    fn from(e: QuizError) -> Self {
        match e {
            QuizError::ProfileNotFound => ApiError::not_found(e.to_string()),
            QuizError::InvalidConcernId(_)
            | QuizError::UnknownConcern(_)
            | QuizError::InvalidSeverity(_) => ApiError::bad_request(e.to_string()),
            QuizError::InternalError(inner) => internal_error("Failed to save quiz", inner),
        }
    }
}

impl From<RecommendationError> for ApiError {
    fn from(e: RecommendationError) -> Self {
        match e {
            RecommendationError::ProfileNotFound => ApiError::not_found(e.to_string()),
            RecommendationError::InternalError(inner) => {
                internal_error("Failed to generate recommendations", inner)
            }
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::EmptyMessage => ApiError::bad_request(e.to_string()),
            ChatError::SessionNotFound | ChatError::BusinessUnitNotFound => {
                ApiError::not_found(e.to_string())
            }
            ChatError::InternalError(inner) => {
                internal_error("Failed to generate AI response", inner)
            }
        }
    }
}

impl From<LandingPageError> for ApiError {
    fn from(e: LandingPageError) -> Self {
        match e {
            LandingPageError::BusinessUnitNotFound
            | LandingPageError::NotFound
            | LandingPageError::SourceLocaleNotFound => ApiError::not_found(e.to_string()),
            LandingPageError::LocaleExists | LandingPageError::SlugTaken(_) => {
                ApiError::conflict(e.to_string())
            }
            LandingPageError::InternalError(inner) => {
                internal_error("Failed to load landing page", inner)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_errors_map_to_client_statuses() {
        assert_eq!(
            ApiError::from(QuizError::ProfileNotFound).status_code,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(QuizError::InvalidSeverity(9)).status_code,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = ApiError::from(RecommendationError::InternalError(anyhow::anyhow!(
            "connection refused"
        )));
        assert_eq!(err.status_code, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("connection refused"));
    }

    #[test]
    fn displays_the_client_message() {
        let err = ApiError::from(QuizError::InvalidSeverity(9));
        assert_eq!(err.to_string(), "Severity must be between 1 and 5, got 9");
        assert_eq!(ApiError::forbidden("Admin access required").to_string(), "Admin access required");
    }

    #[test]
    fn locale_clashes_are_conflicts() {
        assert_eq!(
            ApiError::from(LandingPageError::LocaleExists).status_code,
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(LandingPageError::SourceLocaleNotFound).status_code,
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn empty_chat_message_is_bad_request() {
        assert_eq!(
            ApiError::from(ChatError::EmptyMessage).status_code,
            StatusCode::BAD_REQUEST
        );
    }
}
