// Repository contracts
// Implemented by the adapters in crate::infrastructure::repositories

pub mod conversation_repository;
pub mod message_repository;
pub mod todo_repository;
pub mod user_repository;

pub use conversation_repository::ConversationRepository;
pub use message_repository::MessageRepository;
pub use todo_repository::TodoRepository;
pub use user_repository::UserRepository;

use thiserror::Error;

/// Errors surfaced by every repository implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    /// A uniqueness constraint was violated
    #[error("Record already exists")]
    Duplicate,

    #[error("Database error: {0}")]
    Database(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
