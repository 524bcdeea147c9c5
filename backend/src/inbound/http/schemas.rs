//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the wire shape of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request collides with an existing natural key.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store is temporarily unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Company not found.")]
    message: String,
    /// Correlation identifier matching the `trace-id` response header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details, such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Company`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Company, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CompanySchema {
    /// Object identifier.
    #[schema(rename = "_id", example = "65a1f0c2e4b0a1b2c3d4e5f6")]
    id: String,
    /// Company name, unique ignoring case.
    #[schema(example = "Acme")]
    name: String,
    /// City, when known.
    #[schema(example = "Springfield")]
    city: Option<String>,
    /// State or region, when known.
    #[schema(example = "IL")]
    state: Option<String>,
    /// Creation timestamp (RFC 3339).
    created_at: String,
    /// Last update timestamp (RFC 3339).
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::UserView`].
///
/// `major` and `classLevel` appear for students; `company` and
/// `shareProfile` for alumni. `linkedIn` and `phoneNumber` are omitted for
/// alumni who have not opted in.
#[derive(ToSchema)]
#[schema(as = crate::domain::UserView, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserViewSchema {
    /// Caller-chosen identifier.
    #[schema(rename = "_id", example = "auth0|65a1f0")]
    id: String,
    /// Unique e-mail address.
    #[schema(example = "ada@example.com")]
    email: String,
    /// Display name.
    #[schema(example = "Ada Lovelace")]
    name: String,
    /// Profile discriminant: `STUDENT` or `ALUMNI`.
    #[schema(rename = "type", example = "STUDENT")]
    user_type: String,
    /// Student major.
    major: Option<String>,
    /// Student class level.
    #[schema(example = "JUNIOR")]
    class_level: Option<String>,
    /// Alumni employer company identifier.
    company: Option<String>,
    /// Whether an alumnus shares contact details.
    share_profile: Option<bool>,
    /// LinkedIn profile URL.
    linked_in: Option<String>,
    /// Phone number.
    phone_number: Option<String>,
}

/// OpenAPI schema for [`crate::domain::ProgressEntry`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ProgressEntry)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ProgressEntrySchema {
    /// One of `APPLIED`, `OA`, `PHONE`, `FINAL`, `OFFER`, `REJECTED`.
    #[schema(example = "APPLIED")]
    status: String,
    /// ISO-8601 date or date-time.
    #[schema(example = "2024-01-01")]
    date: String,
    /// Free-form note.
    note: Option<String>,
}

/// OpenAPI schema for [`crate::domain::Application`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Application, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ApplicationSchema {
    /// Object identifier.
    #[schema(rename = "_id", example = "65a1f0c2e4b0a1b2c3d4e5f7")]
    id: String,
    /// Owning user identifier.
    user_id: String,
    /// Referenced company identifier.
    company_id: String,
    /// Company name snapshot.
    #[schema(example = "Acme")]
    company_name: String,
    /// Position applied for.
    #[schema(example = "Backend Intern")]
    position: String,
    /// Posting URL.
    link: Option<String>,
    /// Status progress entries.
    process: Vec<ProgressEntrySchema>,
    /// Creation timestamp (RFC 3339).
    created_at: String,
    /// Last update timestamp (RFC 3339).
    updated_at: String,
}

macro_rules! page_schema {
    ($name:ident, $item:ty, $doc:literal) => {
        #[doc = $doc]
        #[derive(ToSchema)]
        #[schema(rename_all = "camelCase")]
        #[expect(
            dead_code,
            reason = "Used only for OpenAPI schema generation via utoipa"
        )]
        pub struct $name {
            /// Zero-based page index.
            page: u64,
            /// Page size.
            per_page: u64,
            /// Number of records matching the filter across all pages.
            total: u64,
            /// Records on this page.
            data: Vec<$item>,
        }
    };
}

page_schema!(CompanyPageSchema, CompanySchema, "Pagination envelope of companies.");
page_schema!(UserPageSchema, UserViewSchema, "Pagination envelope of projected users.");
page_schema!(
    ApplicationPageSchema,
    ApplicationSchema,
    "Pagination envelope of applications."
);

/// Request body for creating or patching a company.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CompanyRequestSchema {
    /// Required on create.
    name: Option<String>,
    /// Optional city.
    city: Option<String>,
    /// Optional state.
    state: Option<String>,
}

/// Request body for registering or patching a user.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserRequestSchema {
    /// Required on create; ignored on patch.
    #[schema(rename = "_id")]
    id: Option<String>,
    /// Required on create; ignored on patch.
    email: Option<String>,
    /// Required on create.
    name: Option<String>,
    /// `STUDENT` or `ALUMNI`; required on create.
    #[schema(rename = "type")]
    user_type: Option<String>,
    /// Students only.
    major: Option<String>,
    /// Students only.
    class_level: Option<String>,
    /// Alumni only.
    company: Option<String>,
    /// Alumni only; defaults to `false`.
    share_profile: Option<bool>,
    /// LinkedIn profile URL.
    linked_in: Option<String>,
    /// Phone number.
    phone_number: Option<String>,
}

/// Request body for creating or patching an application.
///
/// `progress` is accepted as an alias of `process`.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ApplicationRequestSchema {
    /// Required on create.
    user_id: Option<String>,
    /// Required on create.
    company_id: Option<String>,
    /// Required on create.
    company_name: Option<String>,
    /// Required on create.
    position: Option<String>,
    /// Posting URL (http or https).
    link: Option<String>,
    /// Status progress entries.
    process: Option<Vec<ProgressEntrySchema>>,
}
