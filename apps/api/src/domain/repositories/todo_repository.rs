use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::todo::Todo;

/// Repository trait for the Todo aggregate
///
/// Ownership checks live in the service layer; the repository only
/// persists and retrieves.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Todos for a user, newest first, optionally filtered by completion
    async fn find_by_user(&self, user_id: Uuid, completed: Option<bool>)
        -> RepositoryResult<Vec<Todo>>;

    /// Todos created inside a conversation, newest first
    async fn find_by_conversation(&self, conversation_id: Uuid) -> RepositoryResult<Vec<Todo>>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Todo>>;

    async fn create(&self, todo: &Todo) -> RepositoryResult<()>;

    /// Overwrite the mutable fields of an existing todo
    ///
    /// Fails with `RepositoryError::NotFound` if the todo does not exist.
    async fn update(&self, todo: &Todo) -> RepositoryResult<()>;

    /// Fails with `RepositoryError::NotFound` if the todo does not exist.
    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;
}
