//! `/api/quiz` - public quiz endpoints (anonymous customers)

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::common::{BusinessUnitRef, ProfileId};
use crate::domains::quiz::actions::{self as quiz_actions, SaveProgress};
use crate::domains::quiz::{ConcernInput, QuizAnswers};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct QuizQuery {
    #[serde(rename = "businessUnitId", alias = "business_unit_id")]
    pub business_unit_id: Option<String>,
    #[serde(rename = "profileId")]
    pub profile_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveQuizRequest {
    pub business_unit_id: Option<String>,
    pub profile_id: Option<String>,
    pub step: Option<i32>,
    #[serde(default)]
    pub answers: QuizAnswers,
    pub email: Option<String>,
    pub name: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConcernsRequest {
    pub profile_id: Option<String>,
    pub concerns: Option<Vec<ConcernInput>>,
}

fn parse_profile_id(raw: &str) -> Result<ProfileId, ApiError> {
    ProfileId::parse(raw).map_err(|_| ApiError::bad_request("Invalid profileId"))
}

fn business_unit_ref(raw: Option<&str>) -> Option<BusinessUnitRef> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(BusinessUnitRef::parse)
}

/// GET /api/quiz - the quiz definition, or a saved profile when `profileId` is given
pub async fn get_quiz_handler(
    Extension(state): Extension<AxumAppState>,
    Query(query): Query<QuizQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if let Some(raw) = query.profile_id.as_deref().filter(|s| !s.is_empty()) {
        let profile = quiz_actions::get_profile(parse_profile_id(raw)?, &state.db_pool).await?;
        return Ok(Json(json!({ "profile": profile })));
    }

    let business_unit = business_unit_ref(query.business_unit_id.as_deref());
    let config = quiz_actions::get_config(business_unit.as_ref(), &state.db_pool).await?;
    Ok(Json(json!({ "config": config })))
}

/// POST /api/quiz - start a quiz (201) or save progress on an existing profile
pub async fn save_quiz_handler(
    Extension(state): Extension<AxumAppState>,
    Json(body): Json<SaveQuizRequest>,
) -> Result<Response, ApiError> {
    let profile_id = body
        .profile_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(parse_profile_id)
        .transpose()?;

    let saved = quiz_actions::save_progress(
        SaveProgress {
            business_unit: business_unit_ref(body.business_unit_id.as_deref()),
            profile_id,
            step: body.step,
            answers: body.answers,
            email: body.email,
            name: body.name,
            source: body.source,
        },
        &state.db_pool,
    )
    .await?;

    let status = if saved.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let payload = json!({
        "profileId": saved.profile.id,
        "profile": saved.profile,
    });
    Ok((status, Json(payload)).into_response())
}

/// PUT /api/quiz - replace a profile's concerns
pub async fn update_concerns_handler(
    Extension(state): Extension<AxumAppState>,
    Json(body): Json<UpdateConcernsRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let raw = body
        .profile_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("profileId is required"))?;
    let profile_id = parse_profile_id(raw)?;

    if let Some(concerns) = body.concerns {
        quiz_actions::replace_concerns(profile_id, &concerns, &state.db_pool).await?;
    }

    Ok(Json(json!({ "success": true })))
}
