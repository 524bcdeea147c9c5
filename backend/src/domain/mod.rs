//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed tracker entities and the use-case services
//! that drive them. Keep types free of transport concerns and document
//! invariants and serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - ObjectId: twelve-byte document identifier.
//! - Company, User, Application: stored aggregates with filters and patches.
//! - UserView: the role projection returned for every user read.
//! - CompanyService, UserService, ApplicationService: port implementations.

pub mod application;
pub mod application_service;
pub mod company;
pub mod company_service;
pub mod error;
pub mod object_id;
pub mod ports;
mod search;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::application::{
    Application, ApplicationFilter, ApplicationPatch, ApplicationSort, ApplicationStatus,
    NewApplication, ProgressEntry,
};
pub use self::application_service::ApplicationService;
pub use self::company::{ALL_STATES, Company, CompanyFilter, CompanyPatch, NewCompany};
pub use self::company_service::CompanyService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::object_id::{ObjectId, ObjectIdError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    ClassLevel, NewUser, ProfileFields, UnknownVariant, User, UserFilter, UserId, UserPatch,
    UserProfile, UserType, UserValidationError, UserView,
};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use tracker_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("Company not found."))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
