//! Companies API handlers.
//!
//! ```text
//! GET    /api/companies?page=0&perPage=10&query=acme&state=IL
//! POST   /api/companies {"name":"Acme","city":"Springfield"}
//! GET    /api/companies/{id}
//! PATCH  /api/companies/{id} {"state":"IL"}
//! DELETE /api/companies/{id}
//! ```

use std::collections::HashMap;

use actix_web::{HttpResponse, delete, get, patch, post, web};
use pagination::{DEFAULT_PAGE, DEFAULT_PER_PAGE, Paginated};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::ports::ListRequest;
use crate::domain::{Company, CompanyFilter, CompanyPatch, NewCompany, ObjectId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::params::{PageParams, parse_object_id};
use crate::inbound::http::schemas::{
    CompanyPageSchema, CompanyRequestSchema, CompanySchema, ErrorSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    Check, Literal, Rule, body_input, check, extract, query_input,
};

const INVALID_ID: &str = "Invalid company id. (Must be a Mongo ObjectID.)";

const LIST_RULES: &[Check] = &[
    check("page", Rule::Default(Literal::Int(DEFAULT_PAGE as i64)), ""),
    check("page", Rule::Int { min: 0 }, "page must be an integer > -1."),
    check("perPage", Rule::Default(Literal::Int(DEFAULT_PER_PAGE as i64)), ""),
    check("perPage", Rule::Int { min: 1 }, "perPage must be an integer > 0."),
    check("query", Rule::Optional, ""),
    check("query", Rule::String, "query must be a string."),
    check("state", Rule::Optional, ""),
    check("state", Rule::String, "state must be a string."),
];

const CREATE_RULES: &[Check] = &[
    check("name", Rule::String, "name must be a string."),
    check("name", Rule::NonEmpty, "name must be a non-empty string."),
    check("city", Rule::Optional, ""),
    check("city", Rule::String, "city must be a string."),
    check("city", Rule::NonEmpty, "city must be a non-empty string."),
    check("state", Rule::Optional, ""),
    check("state", Rule::String, "state must be a string."),
    check("state", Rule::NonEmpty, "state must be a non-empty string."),
];

const UPDATE_RULES: &[Check] = &[
    check("name", Rule::Optional, ""),
    check("name", Rule::String, "name must be a string."),
    check("name", Rule::NonEmpty, "name must be a non-empty string."),
    check("city", Rule::Optional, ""),
    check("city", Rule::String, "city must be a string."),
    check("city", Rule::NonEmpty, "city must be a non-empty string."),
    check("state", Rule::Optional, ""),
    check("state", Rule::String, "state must be a string."),
    check("state", Rule::NonEmpty, "state must be a non-empty string."),
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    #[serde(flatten)]
    page: PageParams,
    query: Option<String>,
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateBody {
    name: String,
    city: Option<String>,
    state: Option<String>,
}

impl From<CreateBody> for NewCompany {
    fn from(body: CreateBody) -> Self {
        Self {
            name: body.name,
            city: body.city,
            state: body.state,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateBody {
    name: Option<String>,
    city: Option<String>,
    state: Option<String>,
}

impl From<UpdateBody> for CompanyPatch {
    fn from(body: UpdateBody) -> Self {
        Self {
            name: body.name,
            city: body.city,
            state: body.state,
        }
    }
}

fn company_id(raw: String) -> ApiResult<ObjectId> {
    parse_object_id(raw, INVALID_ID)
}

/// List companies matching an optional name search and state.
#[utoipa::path(
    get,
    path = "/api/companies",
    params(
        ("page" = Option<u64>, Query, description = "Zero-based page index (default 0)"),
        ("perPage" = Option<u64>, Query, description = "Page size (default 10)"),
        ("query" = Option<String>, Query, description = "Case-insensitive name search"),
        ("state" = Option<String>, Query, description = "State filter; `all` disables it")
    ),
    responses(
        (status = 200, description = "Companies", body = CompanyPageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "listCompanies"
)]
#[get("/companies")]
pub async fn list_companies(
    state: web::Data<HttpState>,
    query: web::Query<HashMap<String, String>>,
) -> ApiResult<web::Json<Paginated<Company>>> {
    let params: ListParams = extract(LIST_RULES, &query_input(query.into_inner()))?;
    let request = ListRequest::new(
        CompanyFilter::new(params.query.as_deref(), params.state.as_deref()),
        params.page.to_request()?,
    );
    let page = state.companies_query.list_companies(request).await?;
    Ok(web::Json(page))
}

/// Create a company unless its name is taken (ignoring case).
#[utoipa::path(
    post,
    path = "/api/companies",
    request_body = CompanyRequestSchema,
    responses(
        (status = 201, description = "Company created", body = CompanySchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Name already taken", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "createCompany"
)]
#[post("/companies")]
pub async fn create_company(
    state: web::Data<HttpState>,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let body: CreateBody = extract(CREATE_RULES, &body_input(payload.into_inner())?)?;
    let company = state.companies.create_company(body.into()).await?;
    Ok(HttpResponse::Created().json(company))
}

/// Fetch a single company.
#[utoipa::path(
    get,
    path = "/api/companies/{id}",
    params(("id" = String, Path, description = "Company object identifier")),
    responses(
        (status = 200, description = "Company", body = CompanySchema),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Company not found", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "getCompany"
)]
#[get("/companies/{id}")]
pub async fn get_company(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Company>> {
    let id = company_id(path.into_inner())?;
    let company = state.companies_query.get_company(&id).await?;
    Ok(web::Json(company))
}

/// Apply a partial update to a company.
#[utoipa::path(
    patch,
    path = "/api/companies/{id}",
    params(("id" = String, Path, description = "Company object identifier")),
    request_body = CompanyRequestSchema,
    responses(
        (status = 200, description = "Updated company", body = CompanySchema),
        (status = 400, description = "Invalid or empty patch", body = ErrorSchema),
        (status = 404, description = "Company not found", body = ErrorSchema),
        (status = 409, description = "Name already taken", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "updateCompany"
)]
#[patch("/companies/{id}")]
pub async fn update_company(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<Company>> {
    let id = company_id(path.into_inner())?;
    let body: UpdateBody = extract(UPDATE_RULES, &body_input(payload.into_inner())?)?;
    let company = state.companies.update_company(&id, body.into()).await?;
    Ok(web::Json(company))
}

/// Delete a company and return the removed record.
#[utoipa::path(
    delete,
    path = "/api/companies/{id}",
    params(("id" = String, Path, description = "Company object identifier")),
    responses(
        (status = 200, description = "Deleted company", body = CompanySchema),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Company not found", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "deleteCompany"
)]
#[delete("/companies/{id}")]
pub async fn delete_company(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Company>> {
    let id = company_id(path.into_inner())?;
    let company = state.companies.delete_company(&id).await?;
    Ok(web::Json(company))
}

#[cfg(test)]
#[path = "companies_tests.rs"]
mod tests;
