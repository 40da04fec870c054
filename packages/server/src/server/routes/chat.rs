//! `/api/chat` - livechat sessions and roleplay training

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::common::{BusinessUnitId, BusinessUnitRef, ChatSessionId};
use crate::domains::business_units::BusinessUnit;
use crate::domains::chat::actions::{self as chat_actions, RevisionRequest, RoleplayTurn, StartSession};
use crate::domains::chat::{ChatError, ChatMode};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;
use crate::server::middleware::{require_staff, AuthUser};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    pub business_unit_id: Option<String>,
    #[serde(default)]
    pub mode: ChatMode,
    pub staff_name: Option<String>,
    pub staff_role: Option<String>,
    pub language: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default)]
    pub message: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleplayRequest {
    pub business_unit_id: String,
    #[serde(flatten)]
    pub turn: RoleplayTurn,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviseRequest {
    pub business_unit_id: String,
    #[serde(flatten)]
    pub revision: RevisionRequest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRequest {
    pub business_unit_id: String,
    #[serde(default)]
    pub scenario: String,
    #[serde(default)]
    pub lesson: String,
}

fn parse_session_id(raw: &str) -> Result<ChatSessionId, ApiError> {
    ChatSessionId::parse(raw).map_err(|_| ApiError::not_found("Chat session not found"))
}

async fn resolve_business_unit(state: &AxumAppState, raw: &str) -> Result<BusinessUnitId, ApiError> {
    BusinessUnit::resolve(&BusinessUnitRef::parse(raw), &state.db_pool)
        .await?
        .ok_or_else(|| ChatError::BusinessUnitNotFound.into())
}

fn reply_payload(reply: chat_actions::ChatReply) -> serde_json::Value {
    json!({
        "success": true,
        "response": reply.response,
        "generated": reply.generated,
        "timestamp": Utc::now().to_rfc3339(),
    })
}

/// POST /api/chat/sessions
pub async fn start_session_handler(
    Extension(state): Extension<AxumAppState>,
    Json(body): Json<StartSessionRequest>,
) -> Result<Response, ApiError> {
    let session = chat_actions::start_session(
        StartSession {
            business_unit: body
                .business_unit_id
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .map(BusinessUnitRef::parse),
            mode: body.mode,
            staff_name: body.staff_name,
            staff_role: body.staff_role,
            language: body.language,
            user_name: body.user_name,
        },
        &state.db_pool,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "session": session }))).into_response())
}

/// GET /api/chat/sessions/:id/messages
pub async fn session_messages_handler(
    Extension(state): Extension<AxumAppState>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let messages = chat_actions::history(parse_session_id(&session_id)?, &state.db_pool).await?;
    Ok(Json(json!({ "messages": messages })))
}

/// POST /api/chat/sessions/:id/messages
pub async fn send_message_handler(
    Extension(state): Extension<AxumAppState>,
    Path(session_id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let reply = chat_actions::reply(
        parse_session_id(&session_id)?,
        &body.message,
        body.image_url.as_deref().filter(|u| !u.is_empty()),
        &state.server_deps,
    )
    .await?;

    Ok(Json(reply_payload(reply)))
}

/// POST /api/chat/roleplay (staff)
pub async fn roleplay_handler(
    Extension(state): Extension<AxumAppState>,
    auth_user: Option<Extension<AuthUser>>,
    Json(body): Json<RoleplayRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_staff(auth_user.as_deref())?;

    let business_unit_id = resolve_business_unit(&state, &body.business_unit_id).await?;
    let reply = chat_actions::roleplay_reply(business_unit_id, &body.turn, &state.server_deps).await?;
    Ok(Json(reply_payload(reply)))
}

/// POST /api/chat/revise (staff)
pub async fn revise_handler(
    Extension(state): Extension<AxumAppState>,
    auth_user: Option<Extension<AuthUser>>,
    Json(body): Json<ReviseRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_staff(auth_user.as_deref())?;

    let business_unit_id = resolve_business_unit(&state, &body.business_unit_id).await?;
    let reply = chat_actions::revise(business_unit_id, &body.revision, &state.server_deps).await?;
    Ok(Json(reply_payload(reply)))
}

/// POST /api/chat/lessons (staff)
pub async fn record_lesson_handler(
    Extension(state): Extension<AxumAppState>,
    auth_user: Option<Extension<AuthUser>>,
    Json(body): Json<LessonRequest>,
) -> Result<Response, ApiError> {
    require_staff(auth_user.as_deref())?;

    let business_unit_id = resolve_business_unit(&state, &body.business_unit_id).await?;
    let lesson =
        chat_actions::record_lesson(business_unit_id, &body.scenario, &body.lesson, &state.db_pool)
            .await?;

    Ok((StatusCode::CREATED, Json(json!({ "lesson": lesson }))).into_response())
}
