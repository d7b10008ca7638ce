use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use super::client::CompletionClient;
use super::errors::{AssistantError, AssistantResult};
use super::prompts::build_messages;
use super::tools::{definitions, TodoTools, ToolName, ToolOutcome};
use super::types::CompletionRequest;
use crate::config::LlmConfig;
use crate::domain::conversation::MessageRole;
use crate::domain::todo::Todo;
use crate::services::{ConversationService, TodoService};

const FALLBACK_REPLY: &str = "I couldn't process your request.";

/// Result of one chat exchange
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    /// Id of the persisted assistant message
    pub message_id: Uuid,
    pub reply: String,
    pub conversation_id: Uuid,
    pub tool_calls: Vec<String>,
    pub todos: Vec<Todo>,
    pub timestamp: DateTime<Utc>,
}

/// Turns a user message into todo operations through the language model
pub struct ChatAssistant {
    conversations: ConversationService,
    todos: TodoService,
    tools: TodoTools,
    client: Arc<dyn CompletionClient>,
    model: String,
    temperature: f32,
}

impl ChatAssistant {
    pub fn new(
        conversations: ConversationService,
        todos: TodoService,
        client: Arc<dyn CompletionClient>,
        config: &LlmConfig,
    ) -> Self {
        Self {
            conversations,
            tools: TodoTools::new(todos.clone()),
            todos,
            client,
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    pub async fn process_chat(
        &self,
        user_id: Uuid,
        message: &str,
        conversation_id: Option<Uuid>,
    ) -> AssistantResult<ChatOutcome> {
        let conversation = self
            .conversations
            .get_or_create(user_id, conversation_id)
            .await?;

        let history = match self.conversations.recent_messages(conversation.id).await {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(conversation_id = %conversation.id, error = %e, "Could not load history");
                Vec::new()
            }
        };
        let current_todos = self.todos.list(user_id, None).await?;

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: build_messages(&history, &current_todos, message),
            tools: definitions(),
            tool_choice: Some("auto"),
            temperature: self.temperature,
        };

        let response = self.client.complete(request).await?;
        let reply = response
            .choices
            .into_iter()
            .next()
            .ok_or(AssistantError::EmptyResponse)?
            .message;

        let calls = reply.tool_calls.unwrap_or_default();
        let mut outcomes = Vec::with_capacity(calls.len());
        for call in &calls {
            outcomes.push(self.tools.execute(user_id, conversation.id, &call.function).await);
        }

        let content = compose_reply(reply.content.as_deref(), &outcomes);
        let tool_calls: Vec<String> = calls.into_iter().map(|c| c.function.name).collect();

        tracing::debug!(
            %user_id,
            conversation_id = %conversation.id,
            tool_calls = tool_calls.len(),
            "Chat message processed"
        );

        self.conversations
            .add_message(conversation.id, MessageRole::User, message, None)
            .await?;
        let saved = self
            .conversations
            .add_message(
                conversation.id,
                MessageRole::Assistant,
                &content,
                Some(json!({ "toolCalls": tool_calls, "toolResults": outcomes })),
            )
            .await?;

        let todos = self.todos.list(user_id, None).await?;

        Ok(ChatOutcome {
            message_id: saved.id,
            reply: content,
            conversation_id: conversation.id,
            tool_calls,
            todos,
            timestamp: saved.created_at,
        })
    }
}

/// Model text followed by one sentence per tool result
pub fn compose_reply(content: Option<&str>, outcomes: &[ToolOutcome]) -> String {
    let content = content.map(str::trim).unwrap_or_default();

    if outcomes.is_empty() {
        return if content.is_empty() {
            FALLBACK_REPLY.to_string()
        } else {
            content.to_string()
        };
    }

    let sentences: Vec<String> = outcomes.iter().map(describe).collect();
    format!("{} {}", content, sentences.join(" ")).trim().to_string()
}

fn describe(outcome: &ToolOutcome) -> String {
    let result = &outcome.result;
    if !result.success {
        return format!("Error: {}", result.error.as_deref().unwrap_or("unknown error"));
    }

    let title = || {
        result
            .data
            .as_ref()
            .and_then(|d| d.get("title"))
            .and_then(|t| t.as_str())
            .unwrap_or("a todo")
            .to_string()
    };

    match outcome.tool.parse::<ToolName>() {
        Ok(ToolName::TodoCreate) => format!("I have created '{}' for you.", title()),
        Ok(ToolName::TodoUpdate) => format!("I have updated '{}' for you.", title()),
        Ok(ToolName::TodoDelete) => "I have deleted the todo for you.".to_string(),
        Ok(ToolName::TodoList) => {
            let count = result
                .data
                .as_ref()
                .and_then(|d| d.as_array())
                .map_or(0, Vec::len);
            let noun = if count == 1 { "todo" } else { "todos" };
            format!("You have {} {} in your list.", count, noun)
        }
        Err(_) => "I processed your request.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::assistant::tools::ToolResult;
    use crate::assistant::types::{
        ChatMessage, Choice, CompletionResponse, FunctionCall, ToolCall,
    };
    use crate::infrastructure::repositories::{
        InMemoryConversationRepository, InMemoryMessageRepository, InMemoryTodoRepository,
    };

    /// Replays canned replies and records every request it receives
    struct ScriptedClient {
        replies: Mutex<Vec<ChatMessage>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<ChatMessage>) -> Self {
            Self {
                replies: Mutex::new(replies),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, request: CompletionRequest) -> AssistantResult<CompletionResponse> {
            self.requests.lock().unwrap().push(request);
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                return Ok(CompletionResponse { choices: vec![] });
            }
            Ok(CompletionResponse {
                choices: vec![Choice {
                    message: replies.remove(0),
                }],
            })
        }
    }

    fn tool_reply(name: &str, arguments: serde_json::Value) -> ChatMessage {
        ChatMessage {
            role: "assistant".into(),
            content: None,
            tool_calls: Some(vec![ToolCall {
                id: "call_1".into(),
                kind: "function".into(),
                function: FunctionCall {
                    name: name.into(),
                    arguments: arguments.to_string(),
                },
            }]),
        }
    }

    struct Fixture {
        assistant: ChatAssistant,
        client: Arc<ScriptedClient>,
        conversations: ConversationService,
        todos: TodoService,
    }

    fn fixture(replies: Vec<ChatMessage>) -> Fixture {
        let todo_repo = Arc::new(InMemoryTodoRepository::new());
        let todos = TodoService::new(todo_repo.clone());
        let conversations = ConversationService::new(
            Arc::new(InMemoryConversationRepository::new()),
            Arc::new(InMemoryMessageRepository::new()),
            todo_repo,
        );
        let client = Arc::new(ScriptedClient::new(replies));
        let config = LlmConfig {
            api_key: "sk-test".into(),
            base_url: "http://localhost".into(),
            model: "test-model".into(),
            temperature: 0.2,
        };
        let assistant =
            ChatAssistant::new(conversations.clone(), todos.clone(), client.clone(), &config);

        Fixture {
            assistant,
            client,
            conversations,
            todos,
        }
    }

    fn outcome(tool: &str, result: ToolResult) -> ToolOutcome {
        ToolOutcome {
            tool: tool.into(),
            result,
        }
    }

    #[test]
    fn reply_without_tools_uses_model_text_or_fallback() {
        assert_eq!(compose_reply(Some("Hi there"), &[]), "Hi there");
        assert_eq!(compose_reply(None, &[]), FALLBACK_REPLY);
        assert_eq!(compose_reply(Some("   "), &[]), FALLBACK_REPLY);
    }

    #[test]
    fn reply_describes_each_tool_result() {
        let outcomes = vec![
            outcome("todo_create", ToolResult::ok(Some(json!({"title": "Milk"})))),
            outcome("todo_list", ToolResult::ok(Some(json!([{}, {}])))),
            outcome("todo_delete", ToolResult::failed("Todo not found")),
        ];

        assert_eq!(
            compose_reply(Some("Sure."), &outcomes),
            "Sure. I have created 'Milk' for you. You have 2 todos in your list. Error: Todo not found"
        );
    }

    #[test]
    fn single_todo_is_singular() {
        let outcomes = vec![outcome("todo_list", ToolResult::ok(Some(json!([{}]))))];
        assert_eq!(compose_reply(None, &outcomes), "You have 1 todo in your list.");
    }

    #[tokio::test]
    async fn tool_call_creates_todo_in_conversation() {
        let Fixture {
            assistant,
            client,
            conversations,
            ..
        } = fixture(vec![tool_reply("todo_create", json!({"title": "Buy milk"}))]);
        let user_id = Uuid::new_v4();

        let outcome = assistant
            .process_chat(user_id, "add buy milk", None)
            .await
            .unwrap();

        assert_eq!(outcome.reply, "I have created 'Buy milk' for you.");
        assert_eq!(outcome.tool_calls, vec!["todo_create"]);
        assert_eq!(outcome.todos.len(), 1);
        assert_eq!(outcome.todos[0].conversation_id(), Some(outcome.conversation_id));

        {
            let requests = client.requests.lock().unwrap();
            assert_eq!(requests[0].model, "test-model");
            assert_eq!(requests[0].tools.len(), 4);
            assert_eq!(requests[0].tool_choice, Some("auto"));
        }

        let history = conversations
            .history(user_id, outcome.conversation_id)
            .await
            .unwrap();
        assert_eq!(history.messages.len(), 2);
        assert_eq!(history.messages[0].content, "add buy milk");
        assert_eq!(history.messages[1].id, outcome.message_id);
        assert_eq!(
            history.messages[1].metadata.as_ref().unwrap()["toolCalls"],
            json!(["todo_create"])
        );
    }

    #[tokio::test]
    async fn follow_up_replays_history_and_todo_list() {
        let Fixture {
            assistant,
            client,
            todos,
            ..
        } = fixture(vec![
            ChatMessage::new("assistant", "Hello!"),
            ChatMessage::new("assistant", "Still here."),
        ]);
        let user_id = Uuid::new_v4();
        todos
            .create(user_id, None, "Water plants", Default::default(), None)
            .await
            .unwrap();

        let first = assistant.process_chat(user_id, "hi", None).await.unwrap();
        assistant
            .process_chat(user_id, "again", Some(first.conversation_id))
            .await
            .unwrap();

        let requests = client.requests.lock().unwrap();
        let roles: Vec<&str> = requests[1].messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "system", "user", "assistant", "user"]);
        assert!(requests[1].messages[1]
            .content
            .as_deref()
            .unwrap()
            .contains("Water plants"));
    }

    #[tokio::test]
    async fn empty_completion_is_an_error_and_saves_nothing() {
        let Fixture {
            assistant,
            conversations,
            ..
        } = fixture(vec![]);
        let user_id = Uuid::new_v4();

        let result = assistant.process_chat(user_id, "hello", None).await;
        assert!(matches!(result, Err(AssistantError::EmptyResponse)));

        let listed = conversations.list_for_user(user_id).await.unwrap();
        let history = conversations.history(user_id, listed[0].id).await.unwrap();
        assert!(history.messages.is_empty());
    }

    #[tokio::test]
    async fn failing_tool_still_answers() {
        let Fixture { assistant, .. } =
            fixture(vec![tool_reply("todo_delete", json!({"id": Uuid::new_v4().to_string()}))]);

        let outcome = assistant
            .process_chat(Uuid::new_v4(), "delete it", None)
            .await
            .unwrap();

        assert_eq!(outcome.reply, "Error: Todo not found");
        assert_eq!(outcome.tool_calls, vec!["todo_delete"]);
    }
}
