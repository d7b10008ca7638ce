//! Todo tools exposed to the language model.
//!
//! The model picks a tool by name; [`TodoTools::execute`] maps that name onto
//! the matching [`TodoService`] call for the authenticated user. Failures are
//! reported back as an unsuccessful [`ToolResult`] and never abort the chat.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::types::{FunctionCall, FunctionDefinition, ToolDefinition};
use crate::domain::todo::{parse_due_date, Priority, TodoChanges};
use crate::services::TodoService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    TodoCreate,
    TodoUpdate,
    TodoList,
    TodoDelete,
}

impl ToolName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::TodoCreate => "todo_create",
            ToolName::TodoUpdate => "todo_update",
            ToolName::TodoList => "todo_list",
            ToolName::TodoDelete => "todo_delete",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo_create" => Ok(ToolName::TodoCreate),
            "todo_update" => Ok(ToolName::TodoUpdate),
            "todo_list" => Ok(ToolName::TodoList),
            "todo_delete" => Ok(ToolName::TodoDelete),
            other => Err(format!("Unknown tool: {}", other)),
        }
    }
}

/// Outcome of one tool invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn ok(data: Option<serde_json::Value>) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// A dispatched call paired with its result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolOutcome {
    pub tool: String,
    pub result: ToolResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateArgs {
    title: String,
    priority: Option<i64>,
    due_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateArgs {
    id: String,
    title: Option<String>,
    completed: Option<bool>,
    priority: Option<i64>,
    due_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ListArgs {
    completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct DeleteArgs {
    id: String,
}

/// Definitions sent with every completion request
pub fn definitions() -> Vec<ToolDefinition> {
    let tool = |name: ToolName, description, parameters| ToolDefinition {
        kind: "function",
        function: FunctionDefinition {
            name: name.as_str(),
            description,
            parameters,
        },
    };

    vec![
        tool(
            ToolName::TodoCreate,
            "Create a new todo item",
            json!({
                "type": "object",
                "properties": {
                    "title": {"type": "string", "description": "The title of the todo"},
                    "priority": {"type": "integer", "description": "Priority level (0-5)"},
                    "dueDate": {"type": "string", "description": "Due date in ISO format (optional)"}
                },
                "required": ["title"]
            }),
        ),
        tool(
            ToolName::TodoUpdate,
            "Update an existing todo item",
            json!({
                "type": "object",
                "properties": {
                    "id": {"type": "string", "description": "The ID of the todo to update"},
                    "title": {"type": "string", "description": "The new title (optional)"},
                    "completed": {"type": "boolean", "description": "Whether the todo is completed (optional)"},
                    "priority": {"type": "integer", "description": "New priority level (0-5) (optional)"},
                    "dueDate": {"type": "string", "description": "New due date in ISO format (optional)"}
                },
                "required": ["id"]
            }),
        ),
        tool(
            ToolName::TodoList,
            "Get the list of todos for the user",
            json!({
                "type": "object",
                "properties": {
                    "completed": {"type": "boolean", "description": "Filter by completion status (optional)"}
                }
            }),
        ),
        tool(
            ToolName::TodoDelete,
            "Delete a todo item",
            json!({
                "type": "object",
                "properties": {
                    "id": {"type": "string", "description": "The ID of the todo to delete"}
                },
                "required": ["id"]
            }),
        ),
    ]
}

/// Executes tool calls against the todo service
#[derive(Clone)]
pub struct TodoTools {
    todos: TodoService,
}

impl TodoTools {
    pub fn new(todos: TodoService) -> Self {
        Self { todos }
    }

    /// Runs a single tool call on behalf of `user_id`
    ///
    /// Todos created here are linked to `conversation_id`.
    pub async fn execute(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
        call: &FunctionCall,
    ) -> ToolOutcome {
        let outcome = match call.name.parse::<ToolName>() {
            Ok(ToolName::TodoCreate) => self.create(user_id, conversation_id, &call.arguments).await,
            Ok(ToolName::TodoUpdate) => self.update(user_id, &call.arguments).await,
            Ok(ToolName::TodoList) => self.list(user_id, &call.arguments).await,
            Ok(ToolName::TodoDelete) => self.delete(user_id, &call.arguments).await,
            Err(e) => Err(e),
        };

        let result = match outcome {
            Ok(data) => ToolResult::ok(data),
            Err(error) => ToolResult::failed(error),
        };

        if result.success {
            tracing::info!(
                target: "tool_audit",
                %user_id,
                tool = %call.name,
                arguments = %call.arguments,
                success = true,
                "Tool call"
            );
        } else {
            tracing::warn!(
                target: "tool_audit",
                %user_id,
                tool = %call.name,
                arguments = %call.arguments,
                success = false,
                error = result.error.as_deref().unwrap_or_default(),
                "Tool call failed"
            );
        }

        ToolOutcome {
            tool: call.name.clone(),
            result,
        }
    }

    async fn create(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
        arguments: &str,
    ) -> Result<Option<serde_json::Value>, String> {
        let args: CreateArgs = parse_args(arguments)?;
        let priority = args.priority.map(Priority::new).transpose()?.unwrap_or_default();
        let due_date = args.due_date.as_deref().map(parse_due_date).transpose()?;

        let todo = self
            .todos
            .create(user_id, Some(conversation_id), &args.title, priority, due_date)
            .await
            .map_err(|e| e.to_string())?;

        to_data(&todo)
    }

    async fn update(
        &self,
        user_id: Uuid,
        arguments: &str,
    ) -> Result<Option<serde_json::Value>, String> {
        let args: UpdateArgs = parse_args(arguments)?;
        let todo_id = parse_id(&args.id)?;
        let changes = TodoChanges {
            title: args.title,
            completed: args.completed,
            priority: args.priority.map(Priority::new).transpose()?,
            due_date: args.due_date.as_deref().map(parse_due_date).transpose()?,
        };

        let todo = self
            .todos
            .update(user_id, todo_id, changes)
            .await
            .map_err(|e| e.to_string())?;

        to_data(&todo)
    }

    async fn list(&self, user_id: Uuid, arguments: &str) -> Result<Option<serde_json::Value>, String> {
        let args: ListArgs = parse_args(arguments)?;

        let todos = self
            .todos
            .list(user_id, args.completed)
            .await
            .map_err(|e| e.to_string())?;

        to_data(&todos)
    }

    async fn delete(&self, user_id: Uuid, arguments: &str) -> Result<Option<serde_json::Value>, String> {
        let args: DeleteArgs = parse_args(arguments)?;
        let todo_id = parse_id(&args.id)?;

        self.todos
            .delete(user_id, todo_id)
            .await
            .map_err(|e| e.to_string())?;

        Ok(None)
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(arguments: &str) -> Result<T, String> {
    // Some models send an empty string for argument-less calls
    let arguments = if arguments.trim().is_empty() { "{}" } else { arguments };
    serde_json::from_str(arguments).map_err(|e| format!("Invalid tool arguments: {}", e))
}

fn parse_id(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("Invalid todo id: {}", raw))
}

fn to_data<T: Serialize>(value: &T) -> Result<Option<serde_json::Value>, String> {
    serde_json::to_value(value)
        .map(Some)
        .map_err(|e| e.to_string())
}
