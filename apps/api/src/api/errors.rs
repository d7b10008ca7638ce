use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::assistant::AssistantError;
use crate::domain::repositories::RepositoryError;
use crate::services::ServiceError;

/// API error type with HTTP status code, message and optional details
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    /// Attaches a `details` field to the response body
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Creates a 403 Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(message) => Self::bad_request(message),
            ServiceError::NotFound(what) => Self::not_found(format!("{} not found", what)),
            ServiceError::Forbidden => Self::forbidden("Access denied"),
            ServiceError::Repository(e) => e.into(),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::not_found("Record not found"),
            RepositoryError::Duplicate => Self::conflict("Record already exists"),
            RepositoryError::Database(e) => {
                tracing::error!(error = %e, "Repository failure");
                Self::internal_server_error("Internal server error")
            }
        }
    }
}

impl From<AssistantError> for ApiError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::Service(e) => e.into(),
            other => {
                tracing::error!(error = %other, "Chat completion failed");
                Self::internal_server_error("Failed to process chat message")
                    .with_details(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status() {
        let cases = [
            (ServiceError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("Todo"), StatusCode::NOT_FOUND),
            (ServiceError::Forbidden, StatusCode::FORBIDDEN),
            (
                ServiceError::Repository(RepositoryError::Duplicate),
                StatusCode::CONFLICT,
            ),
            (
                ServiceError::Repository(RepositoryError::Database("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn llm_failure_carries_details() {
        let err = ApiError::from(AssistantError::Api {
            status: 429,
            body: "rate limited".into(),
        });

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Failed to process chat message");
        assert!(err.details.unwrap().contains("rate limited"));
    }

    #[test]
    fn database_details_are_not_leaked() {
        let err = ApiError::from(RepositoryError::Database("password=hunter2".into()));
        assert!(err.details.is_none());
        assert!(!err.message.contains("hunter2"));
    }
}
