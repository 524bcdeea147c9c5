//! Company domain service.
//!
//! Implements the company driving ports on top of a [`CompanyRepository`]:
//! paginated listing with a concurrent count, uniqueness-checked creation,
//! partial updates and deletes.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::try_join;
use mockable::Clock;
use pagination::Paginated;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    CompanyCommand, CompanyQuery, CompanyRepository, CompanyRepositoryError, ListRequest,
};
use crate::domain::{Company, CompanyFilter, CompanyPatch, Error, NewCompany, ObjectId};

pub(crate) const COMPANY_NOT_FOUND: &str = "Company not found.";
pub(crate) const EMPTY_PATCH: &str = "At least one field must be provided.";

/// Company service implementing the company command and query ports.
#[derive(Clone)]
pub struct CompanyService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> CompanyService<R> {
    /// Create a new service backed by `repo`, stamping records with `clock`.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

impl<R> CompanyService<R>
where
    R: CompanyRepository,
{
    fn map_repository_error(error: CompanyRepositoryError) -> Error {
        match error {
            CompanyRepositoryError::Connection { message } => {
                Error::internal(format!("company repository unavailable: {message}"))
            }
            CompanyRepositoryError::Query { message } => {
                Error::internal(format!("company repository error: {message}"))
            }
            CompanyRepositoryError::Conflict { .. } => Self::name_taken(None),
        }
    }

    fn name_taken(name: Option<&str>) -> Error {
        let error = Error::conflict("A company with this name already exists.");
        match name {
            Some(name) => error.with_details(json!({ "field": "name", "value": name })),
            None => error,
        }
    }

    async fn fetch(&self, id: &ObjectId) -> Result<Company, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(COMPANY_NOT_FOUND))
    }

    async fn ensure_name_available(
        &self,
        name: &str,
        except: Option<&ObjectId>,
    ) -> Result<(), Error> {
        let existing = self
            .repo
            .find_by_name(name)
            .await
            .map_err(Self::map_repository_error)?;
        match existing {
            Some(company) if Some(&company.id) != except => Err(Self::name_taken(Some(name))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<R> CompanyQuery for CompanyService<R>
where
    R: CompanyRepository,
{
    async fn list_companies(
        &self,
        request: ListRequest<CompanyFilter>,
    ) -> Result<Paginated<Company>, Error> {
        let ListRequest { filter, page } = request;
        let (total, data) = try_join!(self.repo.count(&filter), self.repo.list(&filter, page))
            .map_err(Self::map_repository_error)?;
        debug!(total, returned = data.len(), "listed companies");
        Ok(Paginated::new(page, total, data))
    }

    async fn get_company(&self, id: &ObjectId) -> Result<Company, Error> {
        self.fetch(id).await
    }
}

#[async_trait]
impl<R> CompanyCommand for CompanyService<R>
where
    R: CompanyRepository,
{
    async fn create_company(&self, company: NewCompany) -> Result<Company, Error> {
        self.ensure_name_available(&company.name, None).await?;

        let record = company.into_company(self.clock.utc());
        self.repo
            .insert(&record)
            .await
            .map_err(Self::map_repository_error)?;
        info!(company_id = %record.id, "company created");
        Ok(record)
    }

    async fn update_company(&self, id: &ObjectId, patch: CompanyPatch) -> Result<Company, Error> {
        if patch.is_empty() {
            return Err(Error::invalid_request(EMPTY_PATCH));
        }
        let current = self.fetch(id).await?;
        if let Some(name) = patch.name.as_deref() {
            self.ensure_name_available(name, Some(id)).await?;
        }

        let updated = current.apply_patch(patch, self.clock.utc());
        let found = self
            .repo
            .update(&updated)
            .await
            .map_err(Self::map_repository_error)?;
        if !found {
            return Err(Error::not_found(COMPANY_NOT_FOUND));
        }
        info!(company_id = %id, "company updated");
        Ok(updated)
    }

    async fn delete_company(&self, id: &ObjectId) -> Result<Company, Error> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(COMPANY_NOT_FOUND))?;
        info!(company_id = %id, "company deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
#[path = "company_service_tests.rs"]
mod tests;
