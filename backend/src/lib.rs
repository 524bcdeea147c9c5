//! Internship tracker backend library.
//!
//! The crate follows a hexagonal layout: `domain` holds records, filters and
//! services behind port traits; `inbound::http` adapts them to REST; and
//! `outbound` provides the in-memory and PostgreSQL stores.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
