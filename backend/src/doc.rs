//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every tracker endpoint and the schema wrappers from
//! [`crate::inbound::http::schemas`], which describe the wire shapes without
//! coupling domain types to utoipa.
//!
//! The generated specification is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{
    ApplicationPageSchema, ApplicationRequestSchema, ApplicationSchema, CompanyPageSchema,
    CompanyRequestSchema, CompanySchema, ErrorCodeSchema, ErrorSchema, ProgressEntrySchema,
    UserPageSchema, UserRequestSchema, UserViewSchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Internship tracker API",
        description = "Companies, student and alumni profiles, and the applications students track."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::companies::list_companies,
        crate::inbound::http::companies::create_company,
        crate::inbound::http::companies::get_company,
        crate::inbound::http::companies::update_company,
        crate::inbound::http::companies::delete_company,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::list_open_alumni,
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::applications::list_applications,
        crate::inbound::http::applications::list_user_applications,
        crate::inbound::http::applications::create_application,
        crate::inbound::http::applications::get_application,
        crate::inbound::http::applications::update_application,
        crate::inbound::http::applications::delete_application,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CompanySchema,
        CompanyPageSchema,
        CompanyRequestSchema,
        UserViewSchema,
        UserPageSchema,
        UserRequestSchema,
        ProgressEntrySchema,
        ApplicationSchema,
        ApplicationPageSchema,
        ApplicationRequestSchema,
    )),
    tags(
        (name = "companies", description = "Company directory"),
        (name = "users", description = "Student and alumni profiles"),
        (name = "applications", description = "Internship applications and their progress"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
