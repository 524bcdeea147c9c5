//! Users API handlers.
//!
//! ```text
//! GET    /api/users?page=0&perPage=10&query=ada
//! GET    /api/users/alumni?page=0&perPage=10&query=ada
//! POST   /api/users {"_id":"auth0|ada","email":"ada@example.com","name":"Ada","type":"STUDENT",...}
//! GET    /api/users/{id}
//! PATCH  /api/users/{id} {"shareProfile":true}
//! DELETE /api/users/{id}
//! ```
//!
//! Every response body is a [`UserView`], so contact details of alumni who
//! keep their profile private never leave the domain layer.

use std::collections::HashMap;

use actix_web::{HttpResponse, delete, get, patch, post, web};
use pagination::{DEFAULT_PAGE, DEFAULT_PER_PAGE, Paginated};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::ports::ListRequest;
use crate::domain::{
    ClassLevel, NewUser, ObjectId, ProfileFields, UserFilter, UserId, UserPatch, UserType,
    UserView,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::params::PageParams;
use crate::inbound::http::schemas::{
    ErrorSchema, UserPageSchema, UserRequestSchema, UserViewSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    Check, Literal, Rule, body_input, canonical, check, extract, path_input, query_input,
};

const LIST_RULES: &[Check] = &[
    check("page", Rule::Default(Literal::Int(DEFAULT_PAGE as i64)), ""),
    check("page", Rule::Int { min: 0 }, "page must be an integer > -1."),
    check("perPage", Rule::Default(Literal::Int(DEFAULT_PER_PAGE as i64)), ""),
    check("perPage", Rule::Int { min: 1 }, "perPage must be an integer > 0."),
    check("query", Rule::Optional, ""),
    check("query", Rule::String, "query must be a string."),
];

const ID_RULES: &[Check] = &[
    check("id", Rule::String, "_id must be a string."),
    check("id", Rule::NonEmpty, "_id must be a non-empty string."),
];

const REGISTER_RULES: &[Check] = &[
    check("_id", Rule::String, "_id must be a string."),
    check("_id", Rule::NonEmpty, "_id must be a non-empty string."),
    check("email", Rule::String, "email must be a string."),
    check("email", Rule::Email, "email must be a valid email address."),
    check("name", Rule::String, "name must be a string."),
    check("name", Rule::NonEmpty, "name must be a non-empty string."),
    check("name", Rule::MinLength(2), "name must be at least 2 characters."),
    check("type", Rule::Required, "type is required."),
    check(
        "type",
        Rule::OneOf(canonical::<UserType>),
        "type must be one of STUDENT, ALUMNI.",
    ),
    check("linkedIn", Rule::Optional, ""),
    check("linkedIn", Rule::String, "linkedIn must be a string."),
    check("linkedIn", Rule::Url, "linkedIn must be a valid URL."),
    check("phoneNumber", Rule::Optional, ""),
    check("phoneNumber", Rule::String, "phoneNumber must be a string."),
    check("phoneNumber", Rule::NonEmpty, "phoneNumber must be a non-empty string."),
    check("major", Rule::Optional, ""),
    check("major", Rule::String, "major must be a string."),
    check("major", Rule::NonEmpty, "major must be a non-empty string."),
    check("classLevel", Rule::Optional, ""),
    check(
        "classLevel",
        Rule::OneOf(canonical::<ClassLevel>),
        "classLevel must be one of FRESHMEN, SOPHOMORE, JUNIOR, SENIOR, OTHER.",
    ),
    check("company", Rule::Optional, ""),
    check(
        "company",
        Rule::ObjectId,
        "Invalid company id. (Must be a Mongo ObjectID.)",
    ),
    check("shareProfile", Rule::Optional, ""),
    check("shareProfile", Rule::Bool, "shareProfile must be a boolean."),
];

const UPDATE_RULES: &[Check] = &[
    check("name", Rule::Optional, ""),
    check("name", Rule::String, "name must be a string."),
    check("name", Rule::NonEmpty, "name must be a non-empty string."),
    check("name", Rule::MinLength(2), "name must be at least 2 characters."),
    check("type", Rule::Optional, ""),
    check(
        "type",
        Rule::OneOf(canonical::<UserType>),
        "type must be one of STUDENT, ALUMNI.",
    ),
    check("linkedIn", Rule::Optional, ""),
    check("linkedIn", Rule::String, "linkedIn must be a string."),
    check("linkedIn", Rule::Url, "linkedIn must be a valid URL."),
    check("phoneNumber", Rule::Optional, ""),
    check("phoneNumber", Rule::String, "phoneNumber must be a string."),
    check("phoneNumber", Rule::NonEmpty, "phoneNumber must be a non-empty string."),
    check("major", Rule::Optional, ""),
    check("major", Rule::String, "major must be a string."),
    check("major", Rule::NonEmpty, "major must be a non-empty string."),
    check("classLevel", Rule::Optional, ""),
    check(
        "classLevel",
        Rule::OneOf(canonical::<ClassLevel>),
        "classLevel must be one of FRESHMEN, SOPHOMORE, JUNIOR, SENIOR, OTHER.",
    ),
    check("company", Rule::Optional, ""),
    check(
        "company",
        Rule::ObjectId,
        "Invalid company id. (Must be a Mongo ObjectID.)",
    ),
    check("shareProfile", Rule::Optional, ""),
    check("shareProfile", Rule::Bool, "shareProfile must be a boolean."),
];

#[derive(Debug, Deserialize)]
struct ListParams {
    #[serde(flatten)]
    page: PageParams,
    query: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdParams {
    id: UserId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileBody {
    #[serde(rename = "type")]
    user_type: Option<UserType>,
    major: Option<String>,
    class_level: Option<ClassLevel>,
    company: Option<ObjectId>,
    share_profile: Option<bool>,
}

impl From<ProfileBody> for ProfileFields {
    fn from(body: ProfileBody) -> Self {
        Self {
            user_type: body.user_type,
            major: body.major,
            class_level: body.class_level,
            company: body.company,
            share_profile: body.share_profile,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterBody {
    #[serde(rename = "_id")]
    id: UserId,
    email: String,
    name: String,
    linked_in: Option<String>,
    phone_number: Option<String>,
    #[serde(flatten)]
    profile: ProfileBody,
}

impl From<RegisterBody> for NewUser {
    fn from(body: RegisterBody) -> Self {
        Self {
            id: body.id,
            email: body.email,
            name: body.name,
            linked_in: body.linked_in,
            phone_number: body.phone_number,
            profile: body.profile.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBody {
    name: Option<String>,
    linked_in: Option<String>,
    phone_number: Option<String>,
    #[serde(flatten)]
    profile: ProfileBody,
}

impl From<UpdateBody> for UserPatch {
    fn from(body: UpdateBody) -> Self {
        Self {
            name: body.name,
            linked_in: body.linked_in,
            phone_number: body.phone_number,
            profile: body.profile.into(),
        }
    }
}

fn user_id(raw: String) -> ApiResult<UserId> {
    let params: IdParams = extract(ID_RULES, &path_input("id", raw))?;
    Ok(params.id)
}

async fn list_with(
    state: &HttpState,
    query: HashMap<String, String>,
    build_filter: fn(Option<&str>) -> UserFilter,
) -> ApiResult<Paginated<UserView>> {
    let params: ListParams = extract(LIST_RULES, &query_input(query))?;
    let request = ListRequest::new(
        build_filter(params.query.as_deref()),
        params.page.to_request()?,
    );
    state.users_query.list_users(request).await
}

/// List every user, optionally narrowed by a name search.
#[utoipa::path(
    get,
    path = "/api/users",
    params(
        ("page" = Option<u64>, Query, description = "Zero-based page index (default 0)"),
        ("perPage" = Option<u64>, Query, description = "Page size (default 10)"),
        ("query" = Option<String>, Query, description = "Case-insensitive name search")
    ),
    responses(
        (status = 200, description = "Projected users", body = UserPageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<HashMap<String, String>>,
) -> ApiResult<web::Json<Paginated<UserView>>> {
    list_with(&state, query.into_inner(), UserFilter::all)
        .await
        .map(web::Json)
}

/// List alumni who opted in to sharing their profile.
#[utoipa::path(
    get,
    path = "/api/users/alumni",
    params(
        ("page" = Option<u64>, Query, description = "Zero-based page index (default 0)"),
        ("perPage" = Option<u64>, Query, description = "Page size (default 10)"),
        ("query" = Option<String>, Query, description = "Case-insensitive name search")
    ),
    responses(
        (status = 200, description = "Open alumni", body = UserPageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listOpenAlumni"
)]
#[get("/users/alumni")]
pub async fn list_open_alumni(
    state: web::Data<HttpState>,
    query: web::Query<HashMap<String, String>>,
) -> ApiResult<web::Json<Paginated<UserView>>> {
    list_with(&state, query.into_inner(), UserFilter::open_alumni)
        .await
        .map(web::Json)
}

/// Register a user unless the identifier or e-mail is already taken.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserRequestSchema,
    responses(
        (status = 201, description = "User registered", body = UserViewSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Identifier or e-mail taken", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let body: RegisterBody = extract(REGISTER_RULES, &body_input(payload.into_inner())?)?;
    let view = state.users.register_user(body.into()).await?;
    Ok(HttpResponse::Created().json(view))
}

/// Fetch a single projected user.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Projected user", body = UserViewSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserView>> {
    let id = user_id(path.into_inner())?;
    state.users_query.get_user(&id).await.map(web::Json)
}

/// Apply a partial update to a user.
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UserRequestSchema,
    responses(
        (status = 200, description = "Updated user", body = UserViewSchema),
        (status = 400, description = "Invalid or empty patch", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<UserView>> {
    let id = user_id(path.into_inner())?;
    let body: UpdateBody = extract(UPDATE_RULES, &body_input(payload.into_inner())?)?;
    state
        .users
        .update_user(&id, body.into())
        .await
        .map(web::Json)
}

/// Delete a user and return the removed record, projected.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Deleted user", body = UserViewSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserView>> {
    let id = user_id(path.into_inner())?;
    state.users.delete_user(&id).await.map(web::Json)
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
