//! Driving port for application mutations.

use async_trait::async_trait;

use crate::domain::{Application, ApplicationPatch, Error, NewApplication, ObjectId};

/// Domain use-case port for creating, updating and deleting applications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationCommand: Send + Sync {
    /// Create an application unless its `(user, company, position)` key
    /// already exists.
    async fn create_application(&self, application: NewApplication)
    -> Result<Application, Error>;

    /// Apply a non-empty partial update.
    async fn update_application(
        &self,
        id: &ObjectId,
        patch: ApplicationPatch,
    ) -> Result<Application, Error>;

    /// Delete an application and return the removed record.
    async fn delete_application(&self, id: &ObjectId) -> Result<Application, Error>;
}
