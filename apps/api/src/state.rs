use std::sync::Arc;

use sqlx::PgPool;

use crate::assistant::{ChatAssistant, CompletionClient};
use crate::config::AppConfig;
use crate::domain::repositories::{
    ConversationRepository, MessageRepository, TodoRepository, UserRepository,
};
use crate::infrastructure::repositories::{
    InMemoryConversationRepository, InMemoryMessageRepository, InMemoryTodoRepository,
    InMemoryUserRepository, PostgresConversationRepository, PostgresMessageRepository,
    PostgresTodoRepository, PostgresUserRepository,
};
use crate::services::{ConversationService, TodoService};

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: everything inside is an `Arc` or wraps one.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepository>,
    pub todos: TodoService,
    pub conversations: ConversationService,
    /// `None` when no LLM API key is configured
    pub assistant: Option<Arc<ChatAssistant>>,
}

impl AppState {
    /// State backed by PostgreSQL
    pub fn postgres(config: AppConfig, pool: PgPool) -> Self {
        Self::from_repositories(
            config,
            Arc::new(PostgresUserRepository::new(pool.clone())),
            Arc::new(PostgresTodoRepository::new(pool.clone())),
            Arc::new(PostgresConversationRepository::new(pool.clone())),
            Arc::new(PostgresMessageRepository::new(pool)),
        )
    }

    /// State backed by process memory; data is lost on restart
    pub fn in_memory(config: AppConfig) -> Self {
        Self::from_repositories(
            config,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryTodoRepository::new()),
            Arc::new(InMemoryConversationRepository::new()),
            Arc::new(InMemoryMessageRepository::new()),
        )
    }

    fn from_repositories(
        config: AppConfig,
        users: Arc<dyn UserRepository>,
        todos: Arc<dyn TodoRepository>,
        conversations: Arc<dyn ConversationRepository>,
        messages: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            users,
            todos: TodoService::new(todos.clone()),
            conversations: ConversationService::new(conversations, messages, todos),
            assistant: None,
        }
    }

    /// Enables the chat assistant with the given completion client
    ///
    /// Does nothing when the config has no LLM section.
    pub fn with_completion_client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        if let Some(llm) = &self.config.llm {
            self.assistant = Some(Arc::new(ChatAssistant::new(
                self.conversations.clone(),
                self.todos.clone(),
                client,
                llm,
            )));
        }
        self
    }
}
