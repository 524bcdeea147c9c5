//! Driving port for company mutations.

use async_trait::async_trait;

use crate::domain::{Company, CompanyPatch, Error, NewCompany, ObjectId};

/// Domain use-case port for creating, updating and deleting companies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyCommand: Send + Sync {
    /// Create a company unless the name is already taken (ignoring case).
    async fn create_company(&self, company: NewCompany) -> Result<Company, Error>;

    /// Apply a non-empty partial update.
    async fn update_company(&self, id: &ObjectId, patch: CompanyPatch) -> Result<Company, Error>;

    /// Delete a company and return the removed record.
    async fn delete_company(&self, id: &ObjectId) -> Result<Company, Error>;
}
