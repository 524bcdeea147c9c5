//! Applications API handlers.
//!
//! ```text
//! GET    /api/applications?page=0&perPage=10
//! POST   /api/applications {"userId":"auth0|ada","companyId":"65a1...","companyName":"Acme","position":"Intern"}
//! GET    /api/applications/{id}
//! PATCH  /api/applications/{id} {"process":[{"status":"OA","date":"2024-02-01"}]}
//! DELETE /api/applications/{id}
//! GET    /api/applications/user/{id}?query=acme&status=OA&sortBy=company
//! ```
//!
//! Bodies may spell the progress list as `progress`; it is read as `process`.

use std::collections::HashMap;

use actix_web::{HttpResponse, delete, get, patch, post, web};
use pagination::{DEFAULT_PAGE, DEFAULT_PER_PAGE, Paginated};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::ports::ListRequest;
use crate::domain::{
    Application, ApplicationFilter, ApplicationPatch, ApplicationSort, ApplicationStatus,
    NewApplication, ObjectId, ProgressEntry, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::params::{PageParams, parse_object_id};
use crate::inbound::http::schemas::{
    ApplicationPageSchema, ApplicationRequestSchema, ApplicationSchema, ErrorSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    Check, Literal, Rule, body_input, canonical, check, extract, path_input, query_input,
};

const INVALID_ID: &str = "Invalid application id. (Must be a Mongo ObjectID.)";
const STATUS_MESSAGE: &str = "status must be one of APPLIED, OA, PHONE, FINAL, OFFER, REJECTED.";

const PROGRESS_RULES: &[Check] = &[
    check("status", Rule::Required, "status is required."),
    check(
        "status",
        Rule::OneOf(canonical::<ApplicationStatus>),
        STATUS_MESSAGE,
    ),
    check("date", Rule::Required, "date is required."),
    check("date", Rule::IsoDate, "date must be a valid ISO 8601 date."),
    check("note", Rule::Optional, ""),
    check("note", Rule::String, "note must be a string."),
];

const PAGE_RULES: &[Check] = &[
    check("page", Rule::Default(Literal::Int(DEFAULT_PAGE as i64)), ""),
    check("page", Rule::Int { min: 0 }, "page must be an integer > -1."),
    check("perPage", Rule::Default(Literal::Int(DEFAULT_PER_PAGE as i64)), ""),
    check("perPage", Rule::Int { min: 1 }, "perPage must be an integer > 0."),
];

const BY_USER_RULES: &[Check] = &[
    check("id", Rule::String, "userId must be a string."),
    check("id", Rule::NonEmpty, "userId must be a non-empty string."),
    check("page", Rule::Default(Literal::Int(DEFAULT_PAGE as i64)), ""),
    check("page", Rule::Int { min: 0 }, "page must be an integer > -1."),
    check("perPage", Rule::Default(Literal::Int(DEFAULT_PER_PAGE as i64)), ""),
    check("perPage", Rule::Int { min: 1 }, "perPage must be an integer > 0."),
    check("query", Rule::Optional, ""),
    check("query", Rule::String, "query must be a string."),
    check("status", Rule::Optional, ""),
    check(
        "status",
        Rule::OneOf(canonical::<ApplicationStatus>),
        STATUS_MESSAGE,
    ),
    check("sortBy", Rule::Default(Literal::Str("newest")), ""),
    check(
        "sortBy",
        Rule::OneOf(canonical::<ApplicationSort>),
        "sortBy must be one of newest, oldest, company, position.",
    ),
];

const CREATE_RULES: &[Check] = &[
    check("userId", Rule::String, "userId must be a non-empty string."),
    check("userId", Rule::NonEmpty, "userId must be a non-empty string."),
    check(
        "companyId",
        Rule::ObjectId,
        "Invalid company ID. (Must be a Mongo ObjectID.)",
    ),
    check("companyName", Rule::String, "company name must be a non-empty string."),
    check("companyName", Rule::NonEmpty, "company name must be a non-empty string."),
    check("position", Rule::String, "position must be a non-empty string."),
    check("position", Rule::NonEmpty, "position must be a non-empty string."),
    check("link", Rule::Optional, ""),
    check("link", Rule::String, "link must be a valid URL."),
    check("link", Rule::Url, "link must be a valid URL."),
    check("process", Rule::Alias("progress"), ""),
    check("process", Rule::Optional, ""),
    check(
        "process",
        Rule::ArrayOf(PROGRESS_RULES),
        "process must be an array of progress entries.",
    ),
];

const UPDATE_RULES: &[Check] = &[
    check("userId", Rule::Optional, ""),
    check("userId", Rule::String, "userId must be a non-empty string."),
    check("userId", Rule::NonEmpty, "userId must be a non-empty string."),
    check("companyId", Rule::Optional, ""),
    check(
        "companyId",
        Rule::ObjectId,
        "Invalid company ID. (Must be a Mongo ObjectID.)",
    ),
    check("companyName", Rule::Optional, ""),
    check("companyName", Rule::String, "company name must be a non-empty string."),
    check("companyName", Rule::NonEmpty, "company name must be a non-empty string."),
    check("position", Rule::Optional, ""),
    check("position", Rule::String, "position must be a non-empty string."),
    check("position", Rule::NonEmpty, "position must be a non-empty string."),
    check("link", Rule::Optional, ""),
    check("link", Rule::String, "link must be a valid URL."),
    check("link", Rule::Url, "link must be a valid URL."),
    check("process", Rule::Alias("progress"), ""),
    check("process", Rule::Optional, ""),
    check(
        "process",
        Rule::ArrayOf(PROGRESS_RULES),
        "process must be an array of progress entries.",
    ),
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ByUserParams {
    id: UserId,
    #[serde(flatten)]
    page: PageParams,
    query: Option<String>,
    status: Option<ApplicationStatus>,
    sort_by: ApplicationSort,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBody {
    user_id: UserId,
    company_id: ObjectId,
    company_name: String,
    position: String,
    link: Option<String>,
    #[serde(default)]
    process: Vec<ProgressEntry>,
}

impl From<CreateBody> for NewApplication {
    fn from(body: CreateBody) -> Self {
        Self {
            user_id: body.user_id,
            company_id: body.company_id,
            company_name: body.company_name,
            position: body.position,
            link: body.link,
            process: body.process,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBody {
    user_id: Option<UserId>,
    company_id: Option<ObjectId>,
    company_name: Option<String>,
    position: Option<String>,
    link: Option<String>,
    process: Option<Vec<ProgressEntry>>,
}

impl From<UpdateBody> for ApplicationPatch {
    fn from(body: UpdateBody) -> Self {
        Self {
            user_id: body.user_id,
            company_id: body.company_id,
            company_name: body.company_name,
            position: body.position,
            link: body.link,
            process: body.process,
        }
    }
}

fn application_id(raw: String) -> ApiResult<ObjectId> {
    parse_object_id(raw, INVALID_ID)
}

/// List every application, newest first.
#[utoipa::path(
    get,
    path = "/api/applications",
    params(
        ("page" = Option<u64>, Query, description = "Zero-based page index (default 0)"),
        ("perPage" = Option<u64>, Query, description = "Page size (default 10)")
    ),
    responses(
        (status = 200, description = "Applications", body = ApplicationPageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "listApplications"
)]
#[get("/applications")]
pub async fn list_applications(
    state: web::Data<HttpState>,
    query: web::Query<HashMap<String, String>>,
) -> ApiResult<web::Json<Paginated<Application>>> {
    let page: PageParams = extract(PAGE_RULES, &query_input(query.into_inner()))?;
    let request = ListRequest::new(ApplicationFilter::default(), page.to_request()?);
    let applications = state.applications_query.list_applications(request).await?;
    Ok(web::Json(applications))
}

/// List one user's applications with optional search, status and ordering.
#[utoipa::path(
    get,
    path = "/api/applications/user/{id}",
    params(
        ("id" = String, Path, description = "Owning user identifier"),
        ("page" = Option<u64>, Query, description = "Zero-based page index (default 0)"),
        ("perPage" = Option<u64>, Query, description = "Page size (default 10)"),
        ("query" = Option<String>, Query, description = "Search over position and company name"),
        ("status" = Option<String>, Query, description = "Status of the latest progress entry"),
        ("sortBy" = Option<String>, Query, description = "newest (default), oldest, company or position")
    ),
    responses(
        (status = 200, description = "The user's applications", body = ApplicationPageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "listUserApplications"
)]
#[get("/applications/user/{id}")]
pub async fn list_user_applications(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> ApiResult<web::Json<Paginated<Application>>> {
    let mut input = query_input(query.into_inner());
    input.extend(path_input("id", path.into_inner()));
    let params: ByUserParams = extract(BY_USER_RULES, &input)?;
    let filter = ApplicationFilter::for_user(
        params.id,
        params.query.as_deref(),
        params.status,
        params.sort_by,
    );
    let request = ListRequest::new(filter, params.page.to_request()?);
    let applications = state.applications_query.list_applications(request).await?;
    Ok(web::Json(applications))
}

/// Create an application unless the user already applied to this position.
#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = ApplicationRequestSchema,
    responses(
        (status = 201, description = "Application created", body = ApplicationSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Duplicate application", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "createApplication"
)]
#[post("/applications")]
pub async fn create_application(
    state: web::Data<HttpState>,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let body: CreateBody = extract(CREATE_RULES, &body_input(payload.into_inner())?)?;
    let application = state.applications.create_application(body.into()).await?;
    Ok(HttpResponse::Created().json(application))
}

/// Fetch a single application.
#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(("id" = String, Path, description = "Application object identifier")),
    responses(
        (status = 200, description = "Application", body = ApplicationSchema),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Application not found", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "getApplication"
)]
#[get("/applications/{id}")]
pub async fn get_application(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Application>> {
    let id = application_id(path.into_inner())?;
    let application = state.applications_query.get_application(&id).await?;
    Ok(web::Json(application))
}

/// Apply a partial update to an application.
#[utoipa::path(
    patch,
    path = "/api/applications/{id}",
    params(("id" = String, Path, description = "Application object identifier")),
    request_body = ApplicationRequestSchema,
    responses(
        (status = 200, description = "Updated application", body = ApplicationSchema),
        (status = 400, description = "Invalid or empty patch", body = ErrorSchema),
        (status = 404, description = "Application not found", body = ErrorSchema),
        (status = 409, description = "Duplicate application", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "updateApplication"
)]
#[patch("/applications/{id}")]
pub async fn update_application(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<Application>> {
    let id = application_id(path.into_inner())?;
    let body: UpdateBody = extract(UPDATE_RULES, &body_input(payload.into_inner())?)?;
    let application = state
        .applications
        .update_application(&id, body.into())
        .await?;
    Ok(web::Json(application))
}

/// Delete an application and return the removed record.
#[utoipa::path(
    delete,
    path = "/api/applications/{id}",
    params(("id" = String, Path, description = "Application object identifier")),
    responses(
        (status = 200, description = "Deleted application", body = ApplicationSchema),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Application not found", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "deleteApplication"
)]
#[delete("/applications/{id}")]
pub async fn delete_application(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Application>> {
    let id = application_id(path.into_inner())?;
    let application = state.applications.delete_application(&id).await?;
    Ok(web::Json(application))
}

#[cfg(test)]
#[path = "applications_tests.rs"]
mod tests;
