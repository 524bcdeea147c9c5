//! PostgreSQL-backed `CompanyRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;
use tracing::debug;

use crate::domain::ports::{CompanyRepository, CompanyRepositoryError};
use crate::domain::{Company, CompanyFilter, ObjectId};

use super::diesel_basic_error_mapping::{
    ErrorConstructors, map_basic_diesel_error, map_basic_pool_error,
};
use super::diesel_helpers::{collect_rows, contains_pattern, count_to_total, lower, page_bounds};
use super::models::{CompanyRow, RowConversionError};
use super::pool::{DbPool, PoolError};
use super::schema::companies;

const ERRORS: ErrorConstructors<CompanyRepositoryError> = ErrorConstructors {
    connection: CompanyRepositoryError::connection,
    query: CompanyRepositoryError::query,
    conflict: CompanyRepositoryError::conflict,
};

/// Diesel-backed implementation of the `CompanyRepository` port.
#[derive(Clone)]
pub struct DieselCompanyRepository {
    pool: DbPool,
}

impl DieselCompanyRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CompanyRepositoryError {
    map_basic_pool_error(error, CompanyRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CompanyRepositoryError {
    map_basic_diesel_error(error, &ERRORS)
}

fn map_row_error(error: RowConversionError) -> CompanyRepositoryError {
    CompanyRepositoryError::query(error.to_string())
}

/// Companies matching `filter`, shared by the list and count queries.
fn filtered(filter: &CompanyFilter) -> companies::BoxedQuery<'static, Pg> {
    let mut query = companies::table.into_boxed();
    if let Some(needle) = &filter.name_contains {
        query = query.filter(companies::name.ilike(contains_pattern(needle)));
    }
    if let Some(state) = &filter.state {
        query = query.filter(lower(companies::state.assume_not_null()).eq(state.to_lowercase()));
    }
    query
}

#[async_trait]
impl CompanyRepository for DieselCompanyRepository {
    async fn list(
        &self,
        filter: &CompanyFilter,
        page: PageRequest,
    ) -> Result<Vec<Company>, CompanyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (offset, limit) = page_bounds(page);
        let rows: Vec<CompanyRow> = filtered(filter)
            .select(CompanyRow::as_select())
            .order_by(companies::name.asc())
            .then_order_by(companies::id.asc())
            .offset(offset)
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, map_row_error)
    }

    async fn count(&self, filter: &CompanyFilter) -> Result<u64, CompanyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(count_to_total(total))
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Company>, CompanyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CompanyRow> = companies::table
            .find(id.to_hex())
            .select(CompanyRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Company::try_from).transpose().map_err(map_row_error)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Company>, CompanyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CompanyRow> = companies::table
            .filter(lower(companies::name).eq(name.to_lowercase()))
            .select(CompanyRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Company::try_from).transpose().map_err(map_row_error)
    }

    async fn insert(&self, company: &Company) -> Result<(), CompanyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = CompanyRow::from(company);
        diesel::insert_into(companies::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        debug!(id = %company.id, "company inserted");
        Ok(())
    }

    async fn update(&self, company: &Company) -> Result<bool, CompanyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = CompanyRow::from(company);
        let affected = diesel::update(companies::table.find(&row.id))
            .set(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn delete(&self, id: &ObjectId) -> Result<Option<Company>, CompanyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CompanyRow> = diesel::delete(companies::table.find(id.to_hex()))
            .returning(CompanyRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Company::try_from).transpose().map_err(map_row_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::debug_query;
    use rstest::rstest;

    fn sql(filter: &CompanyFilter) -> String {
        debug_query::<Pg, _>(&filtered(filter).select(companies::id)).to_string()
    }

    #[rstest]
    fn unfiltered_query_has_no_where_clause() {
        assert!(!sql(&CompanyFilter::default()).contains("WHERE"));
    }

    #[rstest]
    fn name_search_uses_escaped_ilike() {
        let query = sql(&CompanyFilter::new(Some("50%"), None));
        assert!(query.contains("ILIKE"), "{query}");
        assert!(query.contains("%50\\\\%%"), "{query}");
    }

    #[rstest]
    fn state_filter_compares_lowercased_values() {
        let query = sql(&CompanyFilter::new(None, Some("IL")));
        assert!(query.contains("lower("), "{query}");
        assert!(query.contains("\"il\""), "{query}");
    }
}
