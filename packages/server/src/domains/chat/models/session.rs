use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{BusinessUnitId, ChatSessionId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    #[default]
    Livechat,
    Roleplay,
}

impl std::fmt::Display for ChatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatMode::Livechat => write!(f, "livechat"),
            ChatMode::Roleplay => write!(f, "roleplay"),
        }
    }
}

impl std::str::FromStr for ChatMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "livechat" => Ok(ChatMode::Livechat),
            "roleplay" => Ok(ChatMode::Roleplay),
            _ => Err(anyhow::anyhow!("Invalid chat mode: {}", s)),
        }
    }
}

/// ChatSession model - one conversation with the assistant
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatSession {
    pub id: ChatSessionId,
    pub business_unit_id: BusinessUnitId,
    pub mode: String,
    /// Persona the assistant speaks as
    pub staff_name: String,
    pub staff_role: String,
    pub language: Option<String>,
    pub user_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateChatSession {
    pub business_unit_id: BusinessUnitId,
    pub mode: ChatMode,
    pub staff_name: String,
    pub staff_role: String,
    pub language: Option<String>,
    pub user_name: Option<String>,
}

impl ChatSession {
    pub async fn find_by_id(id: ChatSessionId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM chat_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn create(input: CreateChatSession, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO chat_sessions (id, business_unit_id, mode, staff_name, staff_role, language, user_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(ChatSessionId::new())
        .bind(input.business_unit_id)
        .bind(input.mode.to_string())
        .bind(input.staff_name)
        .bind(input.staff_role)
        .bind(input.language)
        .bind(input.user_name)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
