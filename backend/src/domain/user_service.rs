//! User domain service.
//!
//! Every value leaving this service is a [`UserView`], so the alumni privacy
//! projection is applied before any adapter sees the record.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::try_join;
use pagination::Paginated;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::company_service::EMPTY_PATCH;
use crate::domain::ports::{
    ListRequest, UserCommand, UserPersistenceError, UserQuery, UserRepository,
};
use crate::domain::{Error, NewUser, User, UserFilter, UserId, UserPatch, UserValidationError, UserView};

pub(crate) const USER_NOT_FOUND: &str = "User not found.";
const USER_TAKEN: &str = "A user with this _id or email already exists.";

/// User service implementing the user command and query ports.
#[derive(Clone)]
pub struct UserService<R> {
    repo: Arc<R>,
}

impl<R> UserService<R> {
    /// Create a new service backed by `repo`.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

fn map_validation_error(error: UserValidationError) -> Error {
    let field = match &error {
        UserValidationError::EmptyId => "_id",
        UserValidationError::MissingType => "type",
        UserValidationError::MissingField { field, .. }
        | UserValidationError::FieldNotAllowed { field, .. } => *field,
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    fn map_repository_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::internal(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::Conflict { .. } => Error::conflict(USER_TAKEN),
        }
    }

    async fn fetch(&self, id: &UserId) -> Result<User, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }
}

#[async_trait]
impl<R> UserQuery for UserService<R>
where
    R: UserRepository,
{
    async fn list_users(
        &self,
        request: ListRequest<UserFilter>,
    ) -> Result<Paginated<UserView>, Error> {
        let ListRequest { filter, page } = request;
        let (total, data) = try_join!(self.repo.count(&filter), self.repo.list(&filter, page))
            .map_err(Self::map_repository_error)?;
        debug!(
            total,
            returned = data.len(),
            open_alumni_only = filter.open_alumni_only,
            "listed users"
        );
        Ok(Paginated::new(page, total, data).map(UserView::from))
    }

    async fn get_user(&self, id: &UserId) -> Result<UserView, Error> {
        self.fetch(id).await.map(UserView::from)
    }
}

#[async_trait]
impl<R> UserCommand for UserService<R>
where
    R: UserRepository,
{
    async fn register_user(&self, user: NewUser) -> Result<UserView, Error> {
        let record = user.into_user().map_err(map_validation_error)?;
        let existing = self
            .repo
            .find_by_id_or_email(&record.id, &record.email)
            .await
            .map_err(Self::map_repository_error)?;
        if existing.is_some() {
            return Err(Error::conflict(USER_TAKEN).with_details(json!({
                "_id": record.id.as_str(),
                "email": record.email,
            })));
        }

        self.repo
            .insert(&record)
            .await
            .map_err(Self::map_repository_error)?;
        info!(user_id = %record.id, user_type = %record.user_type(), "user registered");
        Ok(UserView::from(record))
    }

    async fn update_user(&self, id: &UserId, patch: UserPatch) -> Result<UserView, Error> {
        if patch.is_empty() {
            return Err(Error::invalid_request(EMPTY_PATCH));
        }
        let current = self.fetch(id).await?;
        let updated = current.apply_patch(patch).map_err(map_validation_error)?;
        let found = self
            .repo
            .update(&updated)
            .await
            .map_err(Self::map_repository_error)?;
        if !found {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        info!(user_id = %id, "user updated");
        Ok(UserView::from(updated))
    }

    async fn delete_user(&self, id: &UserId) -> Result<UserView, Error> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))?;
        info!(user_id = %id, "user deleted");
        Ok(UserView::from(deleted))
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
