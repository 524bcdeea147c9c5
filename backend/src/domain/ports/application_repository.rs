//! Port abstraction for application persistence adapters and their errors.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Application, ApplicationFilter, ObjectId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by application repository adapters.
    pub enum ApplicationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "application repository connection failed: {message}",
        /// Query, mutation or row conversion failed.
        Query { message: String } => "application repository query failed: {message}",
        /// A unique index rejected the write.
        Conflict { message: String } => "application repository conflict: {message}",
    }
}

/// Store of application documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Fetch one page of applications matching `filter`, in `filter.sort`
    /// order.
    async fn list(
        &self,
        filter: &ApplicationFilter,
        page: PageRequest,
    ) -> Result<Vec<Application>, ApplicationRepositoryError>;

    /// Count every application matching `filter`, ignoring pagination.
    async fn count(&self, filter: &ApplicationFilter) -> Result<u64, ApplicationRepositoryError>;

    /// Fetch an application by identifier.
    async fn find_by_id(
        &self,
        id: &ObjectId,
    ) -> Result<Option<Application>, ApplicationRepositoryError>;

    /// Fetch the application with the given `(user, company, position)` key.
    async fn find_by_natural_key(
        &self,
        user_id: &UserId,
        company_id: &ObjectId,
        position: &str,
    ) -> Result<Option<Application>, ApplicationRepositoryError>;

    /// Insert a new application.
    async fn insert(&self, application: &Application) -> Result<(), ApplicationRepositoryError>;

    /// Replace a stored application. Returns `false` when no record matched.
    async fn update(&self, application: &Application) -> Result<bool, ApplicationRepositoryError>;

    /// Remove an application, returning the deleted record when it existed.
    async fn delete(
        &self,
        id: &ObjectId,
    ) -> Result<Option<Application>, ApplicationRepositoryError>;
}
