//! Application domain service.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::try_join;
use mockable::Clock;
use pagination::Paginated;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::company_service::EMPTY_PATCH;
use crate::domain::ports::{
    ApplicationCommand, ApplicationQuery, ApplicationRepository, ApplicationRepositoryError,
    ListRequest,
};
use crate::domain::{
    Application, ApplicationFilter, ApplicationPatch, Error, NewApplication, ObjectId, UserId,
};

pub(crate) const APPLICATION_NOT_FOUND: &str = "Application not found.";
const APPLICATION_TAKEN: &str =
    "An application for this user, company and position already exists.";

/// Application service implementing the application command and query ports.
#[derive(Clone)]
pub struct ApplicationService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ApplicationService<R> {
    /// Create a new service backed by `repo`, stamping records with `clock`.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

impl<R> ApplicationService<R>
where
    R: ApplicationRepository,
{
    fn map_repository_error(error: ApplicationRepositoryError) -> Error {
        match error {
            ApplicationRepositoryError::Connection { message } => {
                Error::internal(format!("application repository unavailable: {message}"))
            }
            ApplicationRepositoryError::Query { message } => {
                Error::internal(format!("application repository error: {message}"))
            }
            ApplicationRepositoryError::Conflict { .. } => Error::conflict(APPLICATION_TAKEN),
        }
    }

    async fn fetch(&self, id: &ObjectId) -> Result<Application, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(APPLICATION_NOT_FOUND))
    }

    async fn ensure_key_available(
        &self,
        user_id: &UserId,
        company_id: &ObjectId,
        position: &str,
        except: Option<&ObjectId>,
    ) -> Result<(), Error> {
        let existing = self
            .repo
            .find_by_natural_key(user_id, company_id, position)
            .await
            .map_err(Self::map_repository_error)?;
        match existing {
            Some(application) if Some(&application.id) != except => {
                Err(Error::conflict(APPLICATION_TAKEN).with_details(json!({
                    "userId": user_id.as_str(),
                    "companyId": company_id.to_string(),
                    "position": position,
                })))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<R> ApplicationQuery for ApplicationService<R>
where
    R: ApplicationRepository,
{
    async fn list_applications(
        &self,
        request: ListRequest<ApplicationFilter>,
    ) -> Result<Paginated<Application>, Error> {
        let ListRequest { filter, page } = request;
        let (total, data) = try_join!(self.repo.count(&filter), self.repo.list(&filter, page))
            .map_err(Self::map_repository_error)?;
        debug!(total, returned = data.len(), sort = ?filter.sort, "listed applications");
        Ok(Paginated::new(page, total, data))
    }

    async fn get_application(&self, id: &ObjectId) -> Result<Application, Error> {
        self.fetch(id).await
    }
}

#[async_trait]
impl<R> ApplicationCommand for ApplicationService<R>
where
    R: ApplicationRepository,
{
    async fn create_application(
        &self,
        application: NewApplication,
    ) -> Result<Application, Error> {
        self.ensure_key_available(
            &application.user_id,
            &application.company_id,
            &application.position,
            None,
        )
        .await?;

        let record = application.into_application(self.clock.utc());
        self.repo
            .insert(&record)
            .await
            .map_err(Self::map_repository_error)?;
        info!(
            application_id = %record.id,
            user_id = %record.user_id,
            "application created"
        );
        Ok(record)
    }

    async fn update_application(
        &self,
        id: &ObjectId,
        patch: ApplicationPatch,
    ) -> Result<Application, Error> {
        if patch.is_empty() {
            return Err(Error::invalid_request(EMPTY_PATCH));
        }
        let current = self.fetch(id).await?;
        let rekeyed = patch.changes_natural_key();
        let updated = current.apply_patch(patch, self.clock.utc());
        if rekeyed {
            self.ensure_key_available(
                &updated.user_id,
                &updated.company_id,
                &updated.position,
                Some(id),
            )
            .await?;
        }

        let found = self
            .repo
            .update(&updated)
            .await
            .map_err(Self::map_repository_error)?;
        if !found {
            return Err(Error::not_found(APPLICATION_NOT_FOUND));
        }
        info!(application_id = %id, "application updated");
        Ok(updated)
    }

    async fn delete_application(&self, id: &ObjectId) -> Result<Application, Error> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(APPLICATION_NOT_FOUND))?;
        info!(application_id = %id, "application deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
#[path = "application_service_tests.rs"]
mod tests;
