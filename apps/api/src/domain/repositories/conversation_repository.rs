use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::conversation::Conversation;

/// Repository trait for conversations
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    async fn create(&self, conversation: &Conversation) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Conversation>>;

    /// Conversations for a user, most recently active first
    async fn find_by_user(&self, user_id: Uuid) -> RepositoryResult<Vec<Conversation>>;

    /// Bump `updated_at` to now
    async fn touch(&self, id: Uuid) -> RepositoryResult<()>;
}
