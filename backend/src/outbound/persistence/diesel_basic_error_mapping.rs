//! Diesel and pool error mapping shared by the tracker repositories.
//!
//! Every repository error enum exposes `connection`, `query` and `conflict`
//! constructors (see `define_port_error!`); these helpers take them as
//! closures so each adapter maps failures the same way.

use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure through the repository's connection constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Constructors of one repository error enum.
pub(crate) struct ErrorConstructors<E> {
    pub(crate) connection: fn(String) -> E,
    pub(crate) query: fn(String) -> E,
    pub(crate) conflict: fn(String) -> E,
}

/// Map a Diesel error, turning unique-index violations into conflicts.
pub(crate) fn map_basic_diesel_error<E>(
    error: diesel::result::Error,
    constructors: &ErrorConstructors<E>,
) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), constraint = ?info.constraint_name(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let constraint = info.constraint_name().unwrap_or("unique index");
            (constructors.conflict)(format!("{constraint} rejected the write"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            (constructors.connection)("database connection error".to_owned())
        }
        DieselError::NotFound => (constructors.query)("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => {
            (constructors.query)("database query error".to_owned())
        }
        _ => (constructors.query)("database error".to_owned()),
    }
}
