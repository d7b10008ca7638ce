use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::user::{Email, User};

/// Repository trait for User records
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user
    ///
    /// Fails with `RepositoryError::Duplicate` if the email is taken.
    async fn create(&self, user: &User) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>>;
}
