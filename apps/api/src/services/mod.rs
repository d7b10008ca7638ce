// Application services
// Ownership rules and orchestration on top of the repositories

pub mod conversation_service;
pub mod todo_service;

pub use conversation_service::{ConversationHistory, ConversationService};
pub use todo_service::TodoService;

use thiserror::Error;

use crate::domain::repositories::RepositoryError;

/// Errors returned by the service layer
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    /// Missing, or owned by someone else where that must not be revealed
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Access denied")]
    Forbidden,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
