//! Driving port for user mutations.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, UserId, UserPatch, UserView};

/// Domain use-case port for registering, updating and deleting users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCommand: Send + Sync {
    /// Register a user unless the identifier or e-mail is already taken.
    async fn register_user(&self, user: NewUser) -> Result<UserView, Error>;

    /// Apply a non-empty partial update.
    async fn update_user(&self, id: &UserId, patch: UserPatch) -> Result<UserView, Error>;

    /// Delete a user and return the removed record.
    async fn delete_user(&self, id: &UserId) -> Result<UserView, Error>;
}
