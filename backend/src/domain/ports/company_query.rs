//! Driving port for company reads.
//!
//! HTTP handlers list and fetch companies through this port without importing
//! persistence concerns.

use async_trait::async_trait;
use pagination::Paginated;

use crate::domain::{Company, CompanyFilter, Error, ObjectId};

use super::ListRequest;

/// Domain use-case port for reading companies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyQuery: Send + Sync {
    /// Return one page of companies plus the filtered total.
    async fn list_companies(
        &self,
        request: ListRequest<CompanyFilter>,
    ) -> Result<Paginated<Company>, Error>;

    /// Return a single company or a not-found error.
    async fn get_company(&self, id: &ObjectId) -> Result<Company, Error>;
}
