use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::parse_id;
use crate::api::errors::ApiError;
use crate::api::extract::JsonBody;
use crate::api::middleware::JwtAuth;
use crate::domain::conversation::Conversation;
use crate::domain::todo::Todo;
use crate::services::ConversationHistory;
use crate::state::AppState;

/// Request body for sending a chat message
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    pub conversation_id: Option<String>,
}

/// The assistant's answer to one message
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub id: Uuid,
    pub content: String,
    pub conversation_id: Uuid,
    pub todos: Vec<Todo>,
    pub tool_calls: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ConversationListResponse {
    pub conversations: Vec<Conversation>,
}

/// Send a message to the assistant
///
/// POST /api/chat
pub async fn send_message(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    JsonBody(req): JsonBody<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(ApiError::bad_request("Message is required"));
    }

    let conversation_id = req
        .conversation_id
        .as_deref()
        .map(|id| parse_id(id, "conversation"))
        .transpose()?;

    let assistant = state
        .assistant
        .as_ref()
        .ok_or_else(|| ApiError::internal_server_error("Chat assistant is not configured"))?;

    let outcome = assistant
        .process_chat(user_id, message, conversation_id)
        .await?;

    Ok(Json(ChatResponse {
        id: outcome.message_id,
        content: outcome.reply,
        conversation_id: outcome.conversation_id,
        todos: outcome.todos,
        tool_calls: outcome.tool_calls,
        timestamp: outcome.timestamp,
    }))
}

/// A conversation with its messages and linked todos
///
/// GET /api/chat/:id
pub async fn get_conversation(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Path(id): Path<String>,
) -> Result<Json<ConversationHistory>, ApiError> {
    let conversation_id = parse_id(&id, "conversation")?;
    let history = state.conversations.history(user_id, conversation_id).await?;

    Ok(Json(history))
}

/// The caller's conversations, most recently active first
///
/// GET /api/chat
pub async fn list_conversations(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
) -> Result<Json<ConversationListResponse>, ApiError> {
    let conversations = state.conversations.list_for_user(user_id).await?;

    Ok(Json(ConversationListResponse { conversations }))
}
