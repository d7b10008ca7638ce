use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::map_sqlx_error;
use crate::domain::conversation::{Message, MessageRole};
use crate::domain::repositories::{MessageRepository, RepositoryError, RepositoryResult};

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    conversation_id: Uuid,
    role: String,
    content: String,
    metadata: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
}

impl TryFrom<MessageRow> for Message {
    type Error = RepositoryError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<MessageRole>()
            .map_err(RepositoryError::Database)?;

        Ok(Message {
            id: row.id,
            conversation_id: row.conversation_id,
            role,
            content: row.content,
            metadata: row.metadata,
            created_at: row.created_at,
        })
    }
}

/// PostgreSQL implementation of MessageRepository
pub struct PostgresMessageRepository {
    pool: PgPool,
}

impl PostgresMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn create(&self, message: &Message) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, role, content, metadata, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id)
        .bind(message.conversation_id)
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(message.metadata.clone())
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to create message", e))?;

        Ok(())
    }

    async fn find_by_conversation(&self, conversation_id: Uuid) -> RepositoryResult<Vec<Message>> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, conversation_id, role, content, metadata, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to find messages by conversation", e))?;

        rows.into_iter().map(Message::try_from).collect()
    }
}
