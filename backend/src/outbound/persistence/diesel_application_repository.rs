//! PostgreSQL-backed `ApplicationRepository` implementation using Diesel ORM.
//!
//! Progress entries are stored as a JSONB array. The `current_status` column
//! mirrors the status of the latest entry so status filters stay indexable.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;
use tracing::debug;

use crate::domain::ports::{ApplicationRepository, ApplicationRepositoryError};
use crate::domain::{Application, ApplicationFilter, ApplicationSort, ObjectId, UserId};

use super::diesel_basic_error_mapping::{
    ErrorConstructors, map_basic_diesel_error, map_basic_pool_error,
};
use super::diesel_helpers::{collect_rows, contains_pattern, count_to_total, lower, page_bounds};
use super::models::{ApplicationRow, RowConversionError};
use super::pool::{DbPool, PoolError};
use super::schema::applications;

const ERRORS: ErrorConstructors<ApplicationRepositoryError> = ErrorConstructors {
    connection: ApplicationRepositoryError::connection,
    query: ApplicationRepositoryError::query,
    conflict: ApplicationRepositoryError::conflict,
};

/// Diesel-backed implementation of the `ApplicationRepository` port.
#[derive(Clone)]
pub struct DieselApplicationRepository {
    pool: DbPool,
}

impl DieselApplicationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ApplicationRepositoryError {
    map_basic_pool_error(error, ApplicationRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ApplicationRepositoryError {
    map_basic_diesel_error(error, &ERRORS)
}

fn map_row_error(error: RowConversionError) -> ApplicationRepositoryError {
    ApplicationRepositoryError::query(error.to_string())
}

fn filtered(filter: &ApplicationFilter) -> applications::BoxedQuery<'static, Pg> {
    let mut query = applications::table.into_boxed();
    if let Some(user_id) = &filter.user_id {
        query = query.filter(applications::user_id.eq(user_id.as_str().to_owned()));
    }
    if let Some(needle) = &filter.text {
        let pattern = contains_pattern(needle);
        query = query.filter(
            applications::position
                .ilike(pattern.clone())
                .or(applications::company_name.ilike(pattern)),
        );
    }
    if let Some(status) = filter.status {
        query = query.filter(applications::current_status.eq(status.as_str()));
    }
    query
}

fn sorted(
    query: applications::BoxedQuery<'static, Pg>,
    sort: ApplicationSort,
) -> applications::BoxedQuery<'static, Pg> {
    match sort {
        ApplicationSort::Newest => query
            .order_by(applications::created_at.desc())
            .then_order_by(applications::id.desc()),
        ApplicationSort::Oldest => query
            .order_by(applications::created_at.asc())
            .then_order_by(applications::id.asc()),
        ApplicationSort::Company => query
            .order_by(lower(applications::company_name).asc())
            .then_order_by(applications::id.asc()),
        ApplicationSort::Position => query
            .order_by(lower(applications::position).asc())
            .then_order_by(applications::id.asc()),
    }
}

#[async_trait]
impl ApplicationRepository for DieselApplicationRepository {
    async fn list(
        &self,
        filter: &ApplicationFilter,
        page: PageRequest,
    ) -> Result<Vec<Application>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (offset, limit) = page_bounds(page);
        let rows: Vec<ApplicationRow> = sorted(filtered(filter), filter.sort)
            .select(ApplicationRow::as_select())
            .offset(offset)
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, map_row_error)
    }

    async fn count(&self, filter: &ApplicationFilter) -> Result<u64, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(count_to_total(total))
    }

    async fn find_by_id(
        &self,
        id: &ObjectId,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ApplicationRow> = applications::table
            .find(id.to_hex())
            .select(ApplicationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Application::try_from)
            .transpose()
            .map_err(map_row_error)
    }

    async fn find_by_natural_key(
        &self,
        user_id: &UserId,
        company_id: &ObjectId,
        position: &str,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ApplicationRow> = applications::table
            .filter(applications::user_id.eq(user_id.as_str()))
            .filter(applications::company_id.eq(company_id.to_hex()))
            .filter(applications::position.eq(position))
            .select(ApplicationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Application::try_from)
            .transpose()
            .map_err(map_row_error)
    }

    async fn insert(&self, application: &Application) -> Result<(), ApplicationRepositoryError> {
        let row = ApplicationRow::try_from(application).map_err(map_row_error)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(applications::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        debug!(id = %application.id, user_id = %application.user_id, "application inserted");
        Ok(())
    }

    async fn update(&self, application: &Application) -> Result<bool, ApplicationRepositoryError> {
        let row = ApplicationRow::try_from(application).map_err(map_row_error)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::update(applications::table.find(&row.id))
            .set(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn delete(
        &self,
        id: &ObjectId,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ApplicationRow> = diesel::delete(applications::table.find(id.to_hex()))
            .returning(ApplicationRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Application::try_from)
            .transpose()
            .map_err(map_row_error)
    }
}
