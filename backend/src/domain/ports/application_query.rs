//! Driving port for application reads.

use async_trait::async_trait;
use pagination::Paginated;

use crate::domain::{Application, ApplicationFilter, Error, ObjectId};

use super::ListRequest;

/// Domain use-case port for reading applications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationQuery: Send + Sync {
    /// Return one page of applications plus the filtered total.
    async fn list_applications(
        &self,
        request: ListRequest<ApplicationFilter>,
    ) -> Result<Paginated<Application>, Error>;

    /// Return a single application or a not-found error.
    async fn get_application(&self, id: &ObjectId) -> Result<Application, Error>;
}
