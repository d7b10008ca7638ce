use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::parse_id;
use crate::api::errors::ApiError;
use crate::api::extract::JsonBody;
use crate::api::middleware::JwtAuth;
use crate::domain::todo::{parse_due_date, Priority, Todo, TodoChanges};
use crate::state::AppState;

/// Query string for listing todos
#[derive(Debug, Deserialize)]
pub struct ListTodosQuery {
    /// Anything other than `"true"` filters for open todos
    pub completed: Option<String>,
}

/// Request body for creating a todo
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: String,
    pub priority: Option<i64>,
    pub due_date: Option<String>,
}

/// Request body for updating a todo; absent fields are left unchanged
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<i64>,
    pub due_date: Option<String>,
}

impl UpdateTodoRequest {
    fn into_changes(self) -> Result<TodoChanges, ApiError> {
        Ok(TodoChanges {
            title: self.title,
            completed: self.completed,
            priority: self.priority.map(parse_priority).transpose()?,
            due_date: self.due_date.as_deref().map(parse_date).transpose()?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct TodoEnvelope {
    pub todo: Todo,
}

#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub todos: Vec<Todo>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// List the caller's todos
///
/// GET /api/todos?completed=true|false
pub async fn list_todos(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Query(query): Query<ListTodosQuery>,
) -> Result<Json<TodoListResponse>, ApiError> {
    let completed = query.completed.map(|value| value == "true");
    let todos = state.todos.list(user_id, completed).await?;

    Ok(Json(TodoListResponse { todos }))
}

/// Create a todo
///
/// POST /api/todos
pub async fn create_todo(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    JsonBody(req): JsonBody<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoEnvelope>), ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }

    let priority = req.priority.map(parse_priority).transpose()?.unwrap_or_default();
    let due_date = req.due_date.as_deref().map(parse_date).transpose()?;

    let todo = state
        .todos
        .create(user_id, None, &req.title, priority, due_date)
        .await?;

    Ok((StatusCode::CREATED, Json(TodoEnvelope { todo })))
}

/// Update a todo
///
/// PUT /api/todos/:id
pub async fn update_todo(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateTodoRequest>,
) -> Result<Json<TodoEnvelope>, ApiError> {
    let todo_id = parse_id(&id, "todo")?;
    let todo = state
        .todos
        .update(user_id, todo_id, req.into_changes()?)
        .await?;

    Ok(Json(TodoEnvelope { todo }))
}

/// Flip a todo's completion flag
///
/// PATCH /api/todos/:id/toggle
pub async fn toggle_todo(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Path(id): Path<String>,
) -> Result<Json<TodoEnvelope>, ApiError> {
    let todo_id = parse_id(&id, "todo")?;
    let todo = state.todos.toggle(user_id, todo_id).await?;

    Ok(Json(TodoEnvelope { todo }))
}

/// Delete a todo
///
/// DELETE /api/todos/:id
pub async fn delete_todo(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let todo_id = parse_id(&id, "todo")?;
    state.todos.delete(user_id, todo_id).await?;

    Ok(Json(DeleteResponse { success: true }))
}

fn parse_priority(value: i64) -> Result<Priority, ApiError> {
    Priority::new(value).map_err(ApiError::bad_request)
}

fn parse_date(raw: &str) -> Result<chrono::DateTime<chrono::Utc>, ApiError> {
    parse_due_date(raw).map_err(ApiError::bad_request)
}
