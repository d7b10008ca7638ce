use thiserror::Error;

use crate::services::ServiceError;

/// Errors that can occur while answering a chat message
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout)
    #[error("LLM request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The completion API answered with a non-2xx status
    #[error("LLM API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("LLM returned no choices")]
    EmptyResponse,

    #[error(transparent)]
    Service(#[from] ServiceError),
}

pub type AssistantResult<T> = Result<T, AssistantError>;
