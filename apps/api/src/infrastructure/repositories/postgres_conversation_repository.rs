use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::map_sqlx_error;
use crate::domain::conversation::Conversation;
use crate::domain::repositories::{ConversationRepository, RepositoryError, RepositoryResult};

/// PostgreSQL implementation of ConversationRepository
pub struct PostgresConversationRepository {
    pool: PgPool,
}

impl PostgresConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ConversationRow {
    id: Uuid,
    user_id: Uuid,
    title: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ConversationRow> for Conversation {
    fn from(row: ConversationRow) -> Self {
        Conversation {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ConversationRepository for PostgresConversationRepository {
    async fn create(&self, conversation: &Conversation) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO conversations (id, user_id, title, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(conversation.id)
        .bind(conversation.user_id)
        .bind(conversation.title.as_deref())
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to create conversation", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Conversation>> {
        let row = sqlx::query_as::<_, ConversationRow>(
            r#"
            SELECT id, user_id, title, created_at, updated_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to find conversation by id", e))?;

        Ok(row.map(Conversation::from))
    }

    async fn find_by_user(&self, user_id: Uuid) -> RepositoryResult<Vec<Conversation>> {
        let rows = sqlx::query_as::<_, ConversationRow>(
            r#"
            SELECT id, user_id, title, created_at, updated_at
            FROM conversations
            WHERE user_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to find conversations by user", e))?;

        Ok(rows.into_iter().map(Conversation::from).collect())
    }

    async fn touch(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE conversations SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to touch conversation", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
