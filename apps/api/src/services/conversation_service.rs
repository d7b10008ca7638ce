use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::domain::conversation::{Conversation, Message, MessageRole};
use crate::domain::repositories::{ConversationRepository, MessageRepository, TodoRepository};
use crate::domain::todo::Todo;

/// Number of prior messages replayed to the language model
pub const CONTEXT_WINDOW: usize = 10;

/// A conversation with its messages and the todos created in it
#[derive(Debug, Clone, Serialize)]
pub struct ConversationHistory {
    pub conversation: Conversation,
    pub messages: Vec<Message>,
    pub todos: Vec<Todo>,
}

#[derive(Clone)]
pub struct ConversationService {
    conversations: Arc<dyn ConversationRepository>,
    messages: Arc<dyn MessageRepository>,
    todos: Arc<dyn TodoRepository>,
}

impl ConversationService {
    pub fn new(
        conversations: Arc<dyn ConversationRepository>,
        messages: Arc<dyn MessageRepository>,
        todos: Arc<dyn TodoRepository>,
    ) -> Self {
        Self {
            conversations,
            messages,
            todos,
        }
    }

    /// Returns the requested conversation if the user owns it, otherwise
    /// starts a fresh one
    pub async fn get_or_create(
        &self,
        user_id: Uuid,
        conversation_id: Option<Uuid>,
    ) -> ServiceResult<Conversation> {
        if let Some(id) = conversation_id {
            match self.conversations.find_by_id(id).await? {
                Some(existing) if existing.is_owned_by(user_id) => return Ok(existing),
                Some(_) => tracing::warn!(
                    %user_id,
                    conversation_id = %id,
                    "Conversation belongs to another user, starting a new one"
                ),
                None => tracing::debug!(conversation_id = %id, "Conversation not found, starting a new one"),
            }
        }

        let conversation = Conversation::new(user_id);
        self.conversations.create(&conversation).await?;
        tracing::info!(%user_id, conversation_id = %conversation.id, "Conversation started");

        Ok(conversation)
    }

    /// Full history of a conversation the user owns
    pub async fn history(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
    ) -> ServiceResult<ConversationHistory> {
        let conversation = self
            .conversations
            .find_by_id(conversation_id)
            .await?
            .ok_or(ServiceError::NotFound("Conversation"))?;

        if !conversation.is_owned_by(user_id) {
            return Err(ServiceError::Forbidden);
        }

        let messages = self.messages.find_by_conversation(conversation_id).await?;
        let todos = self.todos.find_by_conversation(conversation_id).await?;

        Ok(ConversationHistory {
            conversation,
            messages,
            todos,
        })
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> ServiceResult<Vec<Conversation>> {
        Ok(self.conversations.find_by_user(user_id).await?)
    }

    /// The last [`CONTEXT_WINDOW`] messages, oldest first
    pub async fn recent_messages(&self, conversation_id: Uuid) -> ServiceResult<Vec<Message>> {
        let mut messages = self.messages.find_by_conversation(conversation_id).await?;
        let skip = messages.len().saturating_sub(CONTEXT_WINDOW);
        Ok(messages.split_off(skip))
    }

    /// Appends a message and marks the conversation as active
    pub async fn add_message(
        &self,
        conversation_id: Uuid,
        role: MessageRole,
        content: &str,
        metadata: Option<serde_json::Value>,
    ) -> ServiceResult<Message> {
        self.conversations.touch(conversation_id).await?;
        let message = Message::new(conversation_id, role, content, metadata);
        self.messages.create(&message).await?;
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::todo::Priority;
    use crate::infrastructure::repositories::{
        InMemoryConversationRepository, InMemoryMessageRepository, InMemoryTodoRepository,
    };

    struct Fixture {
        service: ConversationService,
        todos: Arc<InMemoryTodoRepository>,
    }

    fn fixture() -> Fixture {
        let todos = Arc::new(InMemoryTodoRepository::new());
        let service = ConversationService::new(
            Arc::new(InMemoryConversationRepository::new()),
            Arc::new(InMemoryMessageRepository::new()),
            todos.clone(),
        );
        Fixture { service, todos }
    }

    #[tokio::test]
    async fn get_or_create_reuses_owned_conversation() {
        let Fixture { service, .. } = fixture();
        let user_id = Uuid::new_v4();

        let first = service.get_or_create(user_id, None).await.unwrap();
        let again = service.get_or_create(user_id, Some(first.id)).await.unwrap();

        assert_eq!(first.id, again.id);
    }

    #[tokio::test]
    async fn get_or_create_never_hands_out_foreign_conversation() {
        let Fixture { service, .. } = fixture();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();

        let owned = service.get_or_create(owner, None).await.unwrap();
        let fresh = service.get_or_create(other, Some(owned.id)).await.unwrap();

        assert_ne!(fresh.id, owned.id);
        assert_eq!(fresh.user_id, other);
    }

    #[tokio::test]
    async fn history_enforces_ownership() {
        let Fixture { service, .. } = fixture();
        let owner = Uuid::new_v4();
        let conversation = service.get_or_create(owner, None).await.unwrap();

        let forbidden = service.history(Uuid::new_v4(), conversation.id).await;
        let missing = service.history(owner, Uuid::new_v4()).await;

        assert!(matches!(forbidden, Err(ServiceError::Forbidden)));
        assert!(matches!(missing, Err(ServiceError::NotFound("Conversation"))));
    }

    #[tokio::test]
    async fn history_includes_messages_and_linked_todos() {
        let Fixture { service, todos } = fixture();
        let user_id = Uuid::new_v4();
        let conversation = service.get_or_create(user_id, None).await.unwrap();

        service
            .add_message(conversation.id, MessageRole::User, "add milk", None)
            .await
            .unwrap();
        service
            .add_message(conversation.id, MessageRole::Assistant, "done", None)
            .await
            .unwrap();

        let (todo, _) = Todo::new(user_id, Some(conversation.id), "milk", Priority::default(), None)
            .unwrap();
        todos.create(&todo).await.unwrap();

        let history = service.history(user_id, conversation.id).await.unwrap();
        assert_eq!(history.messages.len(), 2);
        assert_eq!(history.messages[0].role, MessageRole::User);
        assert_eq!(history.todos.len(), 1);
    }

    #[tokio::test]
    async fn recent_messages_keeps_last_ten() {
        let Fixture { service, .. } = fixture();
        let user_id = Uuid::new_v4();
        let conversation = service.get_or_create(user_id, None).await.unwrap();

        for i in 0..12 {
            service
                .add_message(conversation.id, MessageRole::User, &format!("m{}", i), None)
                .await
                .unwrap();
        }

        let recent = service.recent_messages(conversation.id).await.unwrap();
        assert_eq!(recent.len(), CONTEXT_WINDOW);
        assert_eq!(recent.first().unwrap().content, "m2");
        assert_eq!(recent.last().unwrap().content, "m11");
    }

    #[tokio::test]
    async fn add_message_to_unknown_conversation_fails() {
        let Fixture { service, .. } = fixture();

        let result = service
            .add_message(Uuid::new_v4(), MessageRole::User, "hello", None)
            .await;

        assert!(matches!(result, Err(ServiceError::Repository(_))));
    }
}
