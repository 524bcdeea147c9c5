//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{User, UserFilter, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique index rejected the write.
        Conflict { message: String } => "user repository conflict: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch one page of users matching `filter`, ordered by name then id.
    async fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Vec<User>, UserPersistenceError>;

    /// Count every user matching `filter`, ignoring pagination.
    async fn count(&self, filter: &UserFilter) -> Result<u64, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch any user whose identifier equals `id` or whose e-mail equals
    /// `email`.
    async fn find_by_id_or_email(
        &self,
        id: &UserId,
        email: &str,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Insert a new user.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Replace a stored user. Returns `false` when no record matched.
    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError>;

    /// Remove a user, returning the deleted record when it existed.
    async fn delete(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;
}
