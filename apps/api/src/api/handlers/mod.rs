// HTTP handlers ("controllers")

pub mod auth;
pub mod chat;
pub mod health;
pub mod todos;

use uuid::Uuid;

use crate::api::errors::ApiError;

/// Parses a path or body id, answering 400 instead of axum's plain-text rejection
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::bad_request(format!("Invalid {} id", what)))
}
