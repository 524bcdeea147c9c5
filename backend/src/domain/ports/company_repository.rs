//! Port abstraction for company persistence adapters and their errors.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Company, CompanyFilter, ObjectId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by company repository adapters.
    pub enum CompanyRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "company repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "company repository query failed: {message}",
        /// A unique index rejected the write.
        Conflict { message: String } => "company repository conflict: {message}",
    }
}

/// Store of company documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Fetch one page of companies matching `filter`, ordered by name then id.
    async fn list(
        &self,
        filter: &CompanyFilter,
        page: PageRequest,
    ) -> Result<Vec<Company>, CompanyRepositoryError>;

    /// Count every company matching `filter`, ignoring pagination.
    async fn count(&self, filter: &CompanyFilter) -> Result<u64, CompanyRepositoryError>;

    /// Fetch a company by identifier.
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Company>, CompanyRepositoryError>;

    /// Fetch the company whose name equals `name` ignoring case.
    async fn find_by_name(&self, name: &str) -> Result<Option<Company>, CompanyRepositoryError>;

    /// Insert a new company.
    async fn insert(&self, company: &Company) -> Result<(), CompanyRepositoryError>;

    /// Replace a stored company. Returns `false` when no record matched.
    async fn update(&self, company: &Company) -> Result<bool, CompanyRepositoryError>;

    /// Remove a company, returning the deleted record when it existed.
    async fn delete(&self, id: &ObjectId) -> Result<Option<Company>, CompanyRepositoryError>;
}
