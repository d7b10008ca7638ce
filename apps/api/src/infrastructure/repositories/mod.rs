// Repository implementations (data access layer)
// Adapters that implement the domain repository traits

pub mod in_memory;
pub mod postgres_conversation_repository;
pub mod postgres_message_repository;
pub mod postgres_todo_repository;
pub mod postgres_user_repository;

pub use in_memory::{
    InMemoryConversationRepository, InMemoryMessageRepository, InMemoryTodoRepository,
    InMemoryUserRepository,
};
pub use postgres_conversation_repository::PostgresConversationRepository;
pub use postgres_message_repository::PostgresMessageRepository;
pub use postgres_todo_repository::PostgresTodoRepository;
pub use postgres_user_repository::PostgresUserRepository;

use crate::domain::repositories::RepositoryError;

const UNIQUE_VIOLATION: &str = "23505";

/// Maps a sqlx error onto the repository error space
pub(crate) fn map_sqlx_error(context: &str, err: sqlx::Error) -> RepositoryError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return RepositoryError::Duplicate;
        }
    }
    RepositoryError::Database(format!("{}: {}", context, err))
}
