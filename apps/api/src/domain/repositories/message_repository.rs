use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::conversation::Message;

/// Repository trait for chat messages
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: &Message) -> RepositoryResult<()>;

    /// All messages of a conversation, oldest first
    async fn find_by_conversation(&self, conversation_id: Uuid) -> RepositoryResult<Vec<Message>>;
}
