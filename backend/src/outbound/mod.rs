//! Outbound adapters implementing the repository ports.
//!
//! - **memory**: process-local store used when no database is configured
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//!
//! Adapters translate between domain records and their storage shape. They
//! contain no business logic.

pub mod memory;
pub mod persistence;
