//! In-memory repository implementations
//!
//! Used when the server starts without `DATABASE_URL` and by the test
//! suites. Records live in insertion order behind a `tokio::sync::RwLock`,
//! so "newest first" is simply reverse insertion order.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::conversation::{Conversation, Message};
use crate::domain::repositories::{
    ConversationRepository, MessageRepository, RepositoryError, RepositoryResult,
    TodoRepository, UserRepository,
};
use crate::domain::todo::Todo;
use crate::domain::user::{Email, User};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> RepositoryResult<()> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.id == user.id || u.email == user.email)
        {
            return Err(RepositoryError::Duplicate);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| &u.email == email).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryTodoRepository {
    todos: RwLock<Vec<Todo>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn find_by_user(
        &self,
        user_id: Uuid,
        completed: Option<bool>,
    ) -> RepositoryResult<Vec<Todo>> {
        let todos = self.todos.read().await;
        Ok(todos
            .iter()
            .rev()
            .filter(|t| t.user_id() == user_id)
            .filter(|t| completed.map_or(true, |c| t.completed() == c))
            .cloned()
            .collect())
    }

    async fn find_by_conversation(&self, conversation_id: Uuid) -> RepositoryResult<Vec<Todo>> {
        let todos = self.todos.read().await;
        Ok(todos
            .iter()
            .rev()
            .filter(|t| t.conversation_id() == Some(conversation_id))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Todo>> {
        let todos = self.todos.read().await;
        Ok(todos.iter().find(|t| t.id() == id).cloned())
    }

    async fn create(&self, todo: &Todo) -> RepositoryResult<()> {
        let mut todos = self.todos.write().await;
        if todos.iter().any(|t| t.id() == todo.id()) {
            return Err(RepositoryError::Duplicate);
        }
        todos.push(todo.clone());
        Ok(())
    }

    async fn update(&self, todo: &Todo) -> RepositoryResult<()> {
        let mut todos = self.todos.write().await;
        let slot = todos
            .iter_mut()
            .find(|t| t.id() == todo.id())
            .ok_or(RepositoryError::NotFound)?;
        *slot = todo.clone();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|t| t.id() != id);
        if todos.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryConversationRepository {
    conversations: RwLock<Vec<Conversation>>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn create(&self, conversation: &Conversation) -> RepositoryResult<()> {
        let mut conversations = self.conversations.write().await;
        if conversations.iter().any(|c| c.id == conversation.id) {
            return Err(RepositoryError::Duplicate);
        }
        conversations.push(conversation.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Conversation>> {
        let conversations = self.conversations.read().await;
        Ok(conversations.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> RepositoryResult<Vec<Conversation>> {
        let conversations = self.conversations.read().await;
        let mut owned: Vec<Conversation> = conversations
            .iter()
            .rev()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        // Stable sort keeps newer insertions first among equal timestamps
        owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(owned)
    }

    async fn touch(&self, id: Uuid) -> RepositoryResult<()> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        conversation.updated_at = Utc::now().max(conversation.updated_at);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryMessageRepository {
    messages: RwLock<Vec<Message>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, message: &Message) -> RepositoryResult<()> {
        self.messages.write().await.push(message.clone());
        Ok(())
    }

    async fn find_by_conversation(&self, conversation_id: Uuid) -> RepositoryResult<Vec<Message>> {
        let messages = self.messages.read().await;
        Ok(messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect())
    }
}
