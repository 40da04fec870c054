//! Conversation review - listing chat sessions and flagging the ones an
//! admin should read

use anyhow::{anyhow, Result};
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};

use super::analyzer::{build_analysis_prompt, parse_analysis, transcript, ConversationAnalysis};
use super::models::{ConversationFilter, ConversationSummary};
use crate::common::{BusinessUnitId, ChatSessionId};
use crate::domains::chat::{ChatMessage, ChatSession};
use crate::kernel::ServerDeps;

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 200;
/// Sessions analyzed per `analyze_unanalyzed` call
pub const ANALYSIS_BATCH_SIZE: i64 = 20;

#[derive(Debug, Clone, Serialize)]
pub struct ConversationPage {
    pub conversations: Vec<ConversationSummary>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisBatchReport {
    pub analyzed: usize,
    pub failed: usize,
}

/// Page numbers start at 1.
pub async fn list_conversations(
    filter: &ConversationFilter,
    page: Option<i64>,
    limit: Option<i64>,
    pool: &PgPool,
) -> Result<ConversationPage> {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let total = ConversationSummary::count(filter, pool).await?;
    let conversations =
        ConversationSummary::find_page(filter, limit, (page - 1) * limit, pool).await?;

    Ok(ConversationPage {
        conversations,
        total,
        page,
        limit,
    })
}

/// `None` when the session does not exist
pub async fn conversation_messages(
    session_id: ChatSessionId,
    pool: &PgPool,
) -> Result<Option<Vec<ChatMessage>>> {
    if ChatSession::find_by_id(session_id, pool).await?.is_none() {
        return Ok(None);
    }
    Ok(Some(ChatMessage::history(session_id, pool).await?))
}

/// Tag and flag one session, storing the result on the session.
///
/// A reply without usable JSON is stored as an unflagged analysis. A
/// provider failure stores nothing, so the session stays in the
/// unanalyzed queue.
pub async fn analyze_conversation(
    session_id: ChatSessionId,
    deps: &ServerDeps,
) -> Result<Option<ConversationAnalysis>> {
    let pool = &deps.db_pool;
    let Some(messages) = conversation_messages(session_id, pool).await? else {
        return Ok(None);
    };

    let analysis = if messages.is_empty() {
        ConversationAnalysis::default()
    } else {
        let prompt = build_analysis_prompt(&transcript(&messages));
        let response = deps
            .llm
            .complete(&prompt)
            .await
            .map_err(|e| anyhow!("Conversation analysis failed: {}", e))?;

        parse_analysis(&response).unwrap_or_else(|| {
            warn!(session_id = %session_id, "Analysis reply was not JSON, storing as unflagged");
            ConversationAnalysis::default()
        })
    };

    ConversationSummary::save_analysis(session_id, &analysis, pool).await?;
    info!(
        session_id = %session_id,
        flag_level = %analysis.flag_level,
        keywords = analysis.keywords.len(),
        "Conversation analyzed"
    );
    Ok(Some(analysis))
}

/// Analyze up to `limit` sessions that have messages but no analysis yet.
pub async fn analyze_unanalyzed(
    business_unit_id: Option<BusinessUnitId>,
    limit: Option<i64>,
    deps: &ServerDeps,
) -> Result<AnalysisBatchReport> {
    let limit = limit.unwrap_or(ANALYSIS_BATCH_SIZE).clamp(1, MAX_PAGE_SIZE);
    let ids = ConversationSummary::unanalyzed_ids(business_unit_id, limit, &deps.db_pool).await?;

    let mut report = AnalysisBatchReport::default();
    for session_id in ids {
        match analyze_conversation(session_id, deps).await {
            Ok(_) => report.analyzed += 1,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Skipping conversation");
                report.failed += 1;
            }
        }
    }

    info!(analyzed = report.analyzed, failed = report.failed, "Conversation batch analyzed");
    Ok(report)
}
