//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each repository port has a Diesel implementation backed by a shared `bb8`
//! pool of `diesel-async` connections. Row structs (`models.rs`) and table
//! definitions (`schema.rs`) stay private to this module; adapters only
//! translate between rows and domain records and map database failures onto
//! the port error enums.
//!
//! # Example
//!
//! ```ignore
//! use tracker_backend::outbound::persistence::{
//!     DbPool, DieselCompanyRepository, PoolConfig, run_pending_migrations,
//! };
//!
//! run_pending_migrations("postgres://localhost/tracker").await?;
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/tracker")).await?;
//! let companies = DieselCompanyRepository::new(pool);
//! ```

mod diesel_application_repository;
mod diesel_basic_error_mapping;
mod diesel_company_repository;
mod diesel_helpers;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_application_repository::DieselApplicationRepository;
pub use diesel_company_repository::DieselCompanyRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
