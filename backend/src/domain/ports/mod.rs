//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) describe how the domain expects to talk to
//! document stores. Each exposes a strongly typed error generated by
//! [`define_port_error!`] so adapters map their failures into predictable
//! variants. Driving ports (`*Command`, `*Query`) are the use-cases HTTP
//! handlers call.

mod macros;
pub(crate) use macros::define_port_error;

mod application_command;
mod application_query;
mod application_repository;
mod company_command;
mod company_query;
mod company_repository;
mod list_request;
mod user_command;
mod user_query;
mod user_repository;

pub use application_command::ApplicationCommand;
#[cfg(test)]
pub use application_command::MockApplicationCommand;
pub use application_query::ApplicationQuery;
#[cfg(test)]
pub use application_query::MockApplicationQuery;
#[cfg(test)]
pub use application_repository::MockApplicationRepository;
pub use application_repository::{ApplicationRepository, ApplicationRepositoryError};
pub use company_command::CompanyCommand;
#[cfg(test)]
pub use company_command::MockCompanyCommand;
#[cfg(test)]
pub use company_query::MockCompanyQuery;
pub use company_query::CompanyQuery;
#[cfg(test)]
pub use company_repository::MockCompanyRepository;
pub use company_repository::{CompanyRepository, CompanyRepositoryError};
pub use list_request::ListRequest;
#[cfg(test)]
pub use user_command::MockUserCommand;
pub use user_command::UserCommand;
#[cfg(test)]
pub use user_query::MockUserQuery;
pub use user_query::UserQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
