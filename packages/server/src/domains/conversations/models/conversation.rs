use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::common::{BusinessUnitId, ChatSessionId};
use crate::domains::conversations::analyzer::ConversationAnalysis;

/// A chat session as listed for review
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ConversationSummary {
    pub id: ChatSessionId,
    pub business_unit_id: BusinessUnitId,
    pub mode: String,
    pub language: Option<String>,
    pub user_name: Option<String>,
    /// `user_name`, or `Guest_` plus the start of the session id
    pub display_name: String,
    pub started_at: DateTime<Utc>,
    pub message_count: i64,
    pub last_message: Option<String>,
    pub keywords: Vec<String>,
    pub flag_level: String,
    pub flag_reason: Option<String>,
    pub analyzed_at: Option<DateTime<Utc>>,
}

/// Which flags a listing includes. `Warning` also includes alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagFilter {
    #[default]
    All,
    Warning,
    Alert,
}

impl FlagFilter {
    fn levels(&self) -> Option<Vec<String>> {
        match self {
            FlagFilter::All => None,
            FlagFilter::Warning => Some(vec!["warning".into(), "alert".into()]),
            FlagFilter::Alert => Some(vec!["alert".into()]),
        }
    }
}

impl std::str::FromStr for FlagFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(FlagFilter::All),
            "warning" => Ok(FlagFilter::Warning),
            "alert" => Ok(FlagFilter::Alert),
            _ => Err(anyhow::anyhow!("Invalid flag filter: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConversationFilter {
    pub business_unit_id: Option<BusinessUnitId>,
    /// Matched against display name, last message and keywords
    pub search: Option<String>,
    pub flag: FlagFilter,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl ConversationFilter {
    /// ILIKE pattern for the search term, wildcards in the term escaped
    fn search_pattern(&self) -> Option<String> {
        let term = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let escaped = term
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        Some(format!("%{}%", escaped))
    }
}

// $1 business unit, $2 flag levels, $3 from, $4 to, $5 search pattern
const FILTERED_CONVERSATIONS: &str = r#"
    WITH conversations AS (
        SELECT
            s.id, s.business_unit_id, s.mode, s.language, s.user_name,
            COALESCE(NULLIF(BTRIM(s.user_name), ''), 'Guest_' || LEFT(s.id::text, 6)) AS display_name,
            s.created_at AS started_at,
            (SELECT COUNT(*) FROM chat_messages m WHERE m.session_id = s.id) AS message_count,
            (SELECT m.content FROM chat_messages m WHERE m.session_id = s.id
             ORDER BY m.created_at DESC, m.id DESC LIMIT 1) AS last_message,
            s.keywords, s.flag_level, s.flag_reason, s.analyzed_at
        FROM chat_sessions s
        WHERE ($1::uuid IS NULL OR s.business_unit_id = $1)
          AND ($2::text[] IS NULL OR s.flag_level = ANY($2))
          AND ($3::timestamptz IS NULL OR s.created_at >= $3)
          AND ($4::timestamptz IS NULL OR s.created_at <= $4)
    )
    SELECT {columns} FROM conversations
    WHERE $5::text IS NULL
       OR display_name ILIKE $5
       OR COALESCE(last_message, '') ILIKE $5
       OR EXISTS (SELECT 1 FROM unnest(keywords) AS k WHERE k ILIKE $5)
"#;

fn filtered(columns: &str, tail: &str) -> String {
    format!("{} {}", FILTERED_CONVERSATIONS.replace("{columns}", columns), tail)
}

impl ConversationSummary {
    pub async fn count(filter: &ConversationFilter, pool: &PgPool) -> Result<i64> {
        let sql = filtered("COUNT(*)", "");
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(filter.business_unit_id)
            .bind(filter.flag.levels())
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.search_pattern())
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Newest first
    pub async fn find_page(
        filter: &ConversationFilter,
        limit: i64,
        offset: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let sql = filtered("*", "ORDER BY started_at DESC, id DESC LIMIT $6 OFFSET $7");
        sqlx::query_as::<_, Self>(&sql)
        .bind(filter.business_unit_id)
        .bind(filter.flag.levels())
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.search_pattern())
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn save_analysis(
        session_id: ChatSessionId,
        analysis: &ConversationAnalysis,
        pool: &PgPool,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE chat_sessions SET
                keywords = $2,
                flag_level = $3,
                flag_reason = $4,
                analyzed_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(session_id)
        .bind(&analysis.keywords)
        .bind(analysis.flag_level.as_str())
        .bind(analysis.flag_reason.as_deref())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Oldest sessions with messages that were never analyzed
    pub async fn unanalyzed_ids(
        business_unit_id: Option<BusinessUnitId>,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<ChatSessionId>> {
        sqlx::query_scalar::<_, ChatSessionId>(
            r#"
            SELECT s.id FROM chat_sessions s
            WHERE s.analyzed_at IS NULL
              AND ($1::uuid IS NULL OR s.business_unit_id = $1)
              AND EXISTS (SELECT 1 FROM chat_messages m WHERE m.session_id = s.id)
            ORDER BY s.created_at, s.id
            LIMIT $2
            "#,
        )
        .bind(business_unit_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_filter_includes_alerts() {
        assert_eq!(FlagFilter::All.levels(), None);
        assert_eq!(
            "warning".parse::<FlagFilter>().unwrap().levels(),
            Some(vec!["warning".to_string(), "alert".to_string()])
        );
        assert!("urgent".parse::<FlagFilter>().is_err());
    }

    #[test]
    fn search_terms_are_escaped() {
        let filter = ConversationFilter {
            search: Some(" 50%_off ".into()),
            ..Default::default()
        };
        assert_eq!(filter.search_pattern().as_deref(), Some("%50\\%\\_off%"));

        let blank = ConversationFilter {
            search: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(blank.search_pattern(), None);
    }

    #[test]
    fn count_and_page_share_the_filter() {
        let count = filtered("COUNT(*)", "");
        let page = filtered("*", "LIMIT $6 OFFSET $7");
        assert!(count.contains("SELECT COUNT(*) FROM conversations"));
        assert!(page.contains("SELECT * FROM conversations"));
        assert!(page.ends_with("LIMIT $6 OFFSET $7"));
    }
}
