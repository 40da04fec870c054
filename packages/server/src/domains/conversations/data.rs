use chrono::{DateTime, Utc};
use juniper::GraphQLObject;

use super::actions::{AnalysisBatchReport, ConversationPage};
use super::analyzer::ConversationAnalysis;
use super::models::ConversationSummary;
use crate::domains::chat::ChatMessage;

#[derive(Debug, Clone, GraphQLObject)]
pub struct ConversationData {
    pub id: String,
    pub business_unit_id: String,
    pub mode: String,
    pub language: Option<String>,
    pub display_name: String,
    pub started_at: DateTime<Utc>,
    pub message_count: i32,
    pub last_message: Option<String>,
    pub keywords: Vec<String>,
    pub flag_level: String,
    pub flag_reason: Option<String>,
    pub analyzed_at: Option<DateTime<Utc>>,
}

impl From<ConversationSummary> for ConversationData {
    fn from(c: ConversationSummary) -> Self {
        Self {
            id: c.id.to_string(),
            business_unit_id: c.business_unit_id.to_string(),
            mode: c.mode,
            language: c.language,
            display_name: c.display_name,
            started_at: c.started_at,
            message_count: c.message_count as i32,
            last_message: c.last_message,
            keywords: c.keywords,
            flag_level: c.flag_level,
            flag_reason: c.flag_reason,
            analyzed_at: c.analyzed_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct ConversationPageData {
    pub conversations: Vec<ConversationData>,
    pub total: i32,
    pub page: i32,
    pub limit: i32,
}

impl From<ConversationPage> for ConversationPageData {
    fn from(p: ConversationPage) -> Self {
        Self {
            conversations: p.conversations.into_iter().map(ConversationData::from).collect(),
            total: p.total as i32,
            page: p.page as i32,
            limit: p.limit as i32,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct ChatMessageData {
    pub id: String,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<ChatMessage> for ChatMessageData {
    fn from(m: ChatMessage) -> Self {
        Self {
            id: m.id.to_string(),
            role: m.role,
            content: m.content,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct ConversationAnalysisData {
    pub keywords: Vec<String>,
    pub flag_level: String,
    pub flag_reason: Option<String>,
}

impl From<ConversationAnalysis> for ConversationAnalysisData {
    fn from(a: ConversationAnalysis) -> Self {
        Self {
            keywords: a.keywords,
            flag_level: a.flag_level.to_string(),
            flag_reason: a.flag_reason,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct AnalysisBatchData {
    pub analyzed: i32,
    pub failed: i32,
}

impl From<AnalysisBatchReport> for AnalysisBatchData {
    fn from(r: AnalysisBatchReport) -> Self {
        Self {
            analyzed: r.analyzed as i32,
            failed: r.failed as i32,
        }
    }
}
