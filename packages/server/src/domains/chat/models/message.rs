use anyhow::Result;
use chrono::{DateTime, Utc};
use llm_client::{Message, Role};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ChatMessageId, ChatSessionId};

/// ChatMessage model - one stored turn
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatMessage {
    pub id: ChatMessageId,
    pub session_id: ChatSessionId,
    /// `user` or `assistant`
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Store a customer turn and its reply together.
    pub async fn record_exchange(
        session_id: ChatSessionId,
        customer: &str,
        reply: &str,
        pool: &PgPool,
    ) -> Result<()> {
        let mut tx = pool.begin().await?;

        // NOW() is fixed for the whole transaction; the reply must sort after the question
        for (role, content) in [(Role::User, customer), (Role::Assistant, reply)] {
            sqlx::query(
                r#"
                INSERT INTO chat_messages (id, session_id, role, content, created_at)
                VALUES ($1, $2, $3, $4, clock_timestamp())
                "#,
            )
            .bind(ChatMessageId::new())
            .bind(session_id)
            .bind(role.as_str())
            .bind(content)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Oldest first
    pub async fn history(session_id: ChatSessionId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM chat_messages WHERE session_id = $1 ORDER BY created_at, id",
        )
        .bind(session_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub fn to_message(&self) -> Message {
        match self.role() {
            Role::User => Message::user(self.content.clone()),
            _ => Message::assistant(self.content.clone()),
        }
    }

    pub fn role(&self) -> Role {
        if self.role == Role::User.as_str() {
            Role::User
        } else {
            Role::Assistant
        }
    }
}
