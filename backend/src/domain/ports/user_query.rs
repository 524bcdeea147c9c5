//! Driving port for user reads.
//!
//! Every result is already role-projected, so adapters cannot leak contact
//! details of alumni who keep their profile private.

use async_trait::async_trait;
use pagination::Paginated;

use crate::domain::{Error, UserFilter, UserId, UserView};

use super::ListRequest;

/// Domain use-case port for reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserQuery: Send + Sync {
    /// Return one page of projected users plus the filtered total.
    async fn list_users(&self, request: ListRequest<UserFilter>)
    -> Result<Paginated<UserView>, Error>;

    /// Return a single projected user or a not-found error.
    async fn get_user(&self, id: &UserId) -> Result<UserView, Error>;
}
