//! `/api/recommendations` - generate and list booster recommendations

use axum::{
    extract::{Extension, Query},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::common::ProfileId;
use crate::domains::recommendations::{generate_recommendations, list_recommendations, GenerateOutcome};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub profile_id: Option<String>,
}

fn required_profile_id(raw: Option<&str>) -> Result<ProfileId, ApiError> {
    let raw = raw
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("profileId is required"))?;
    ProfileId::parse(raw).map_err(|_| ApiError::bad_request("Invalid profileId"))
}

/// POST /api/recommendations
pub async fn generate_recommendations_handler(
    Extension(state): Extension<AxumAppState>,
    Json(body): Json<ProfileRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let profile_id = required_profile_id(body.profile_id.as_deref())?;

    let payload = match generate_recommendations(profile_id, &state.db_pool).await? {
        GenerateOutcome::NoConcerns => json!({
            "error": "No concerns selected",
            "recommendations": [],
        }),
        GenerateOutcome::Generated {
            recommendations,
            recommendation_id,
        } => json!({
            "recommendations": recommendations,
            "recommendationId": recommendation_id,
        }),
    };

    Ok(Json(payload))
}

/// GET /api/recommendations?profileId=
pub async fn list_recommendations_handler(
    Extension(state): Extension<AxumAppState>,
    Query(query): Query<ProfileRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let profile_id = required_profile_id(query.profile_id.as_deref())?;
    let recommendations = list_recommendations(profile_id, &state.db_pool).await?;
    Ok(Json(json!({ "recommendations": recommendations })))
}
