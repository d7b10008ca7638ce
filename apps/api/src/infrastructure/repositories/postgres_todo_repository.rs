use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::map_sqlx_error;
use crate::domain::repositories::{RepositoryError, RepositoryResult, TodoRepository};
use crate::domain::todo::{Priority, Todo};

const TODO_COLUMNS: &str = "id, user_id, conversation_id, title, completed, priority, \
                            due_date, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct TodoRow {
    id: Uuid,
    user_id: Uuid,
    conversation_id: Option<Uuid>,
    title: String,
    completed: bool,
    priority: i16,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TodoRow> for Todo {
    type Error = RepositoryError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let priority = Priority::new(i64::from(row.priority)).map_err(RepositoryError::Database)?;

        Ok(Todo::from_persistence(
            row.id,
            row.user_id,
            row.conversation_id,
            row.title,
            row.completed,
            priority,
            row.due_date,
            row.created_at,
            row.updated_at,
        ))
    }
}

/// PostgreSQL implementation of TodoRepository
pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn into_todos(rows: Vec<TodoRow>) -> RepositoryResult<Vec<Todo>> {
        rows.into_iter().map(Todo::try_from).collect()
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    async fn find_by_user(
        &self,
        user_id: Uuid,
        completed: Option<bool>,
    ) -> RepositoryResult<Vec<Todo>> {
        let sql = format!(
            "SELECT {} FROM todos \
             WHERE user_id = $1 AND ($2::BOOLEAN IS NULL OR completed = $2) \
             ORDER BY created_at DESC",
            TODO_COLUMNS
        );

        let rows = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(user_id)
            .bind(completed)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to find todos by user", e))?;

        Self::into_todos(rows)
    }

    async fn find_by_conversation(&self, conversation_id: Uuid) -> RepositoryResult<Vec<Todo>> {
        let sql = format!(
            "SELECT {} FROM todos WHERE conversation_id = $1 ORDER BY created_at DESC",
            TODO_COLUMNS
        );

        let rows = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(conversation_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to find todos by conversation", e))?;

        Self::into_todos(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Todo>> {
        let sql = format!("SELECT {} FROM todos WHERE id = $1", TODO_COLUMNS);

        let row = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to find todo by id", e))?;

        row.map(Todo::try_from).transpose()
    }

    async fn create(&self, todo: &Todo) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO todos (
                id, user_id, conversation_id, title, completed, priority,
                due_date, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(todo.id())
        .bind(todo.user_id())
        .bind(todo.conversation_id())
        .bind(todo.title())
        .bind(todo.completed())
        .bind(i16::from(todo.priority().value()))
        .bind(todo.due_date())
        .bind(todo.created_at())
        .bind(todo.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to create todo", e))?;

        Ok(())
    }

    async fn update(&self, todo: &Todo) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE todos
            SET title = $2, completed = $3, priority = $4, due_date = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(todo.id())
        .bind(todo.title())
        .bind(todo.completed())
        .bind(i16::from(todo.priority().value()))
        .bind(todo.due_date())
        .bind(todo.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to update todo", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to delete todo", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
