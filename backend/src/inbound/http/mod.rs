//! HTTP inbound adapter exposing the tracker REST endpoints.
//!
//! Handlers validate raw input with the rule sets in [`validation`], call a
//! driving port from [`state::HttpState`] and let [`error`] render failures.

use actix_web::web;

pub mod applications;
pub mod companies;
pub mod error;
pub mod health;
mod params;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;
pub(crate) mod validation;

pub use error::ApiResult;

/// Register the `/api` scope and the extractor error handlers.
///
/// Callers supply [`state::HttpState`] as app data. `/users/alumni` is
/// registered ahead of `/users/{id}` so the literal segment wins.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(
            web::scope("/api")
                .service(companies::list_companies)
                .service(companies::create_company)
                .service(companies::get_company)
                .service(companies::update_company)
                .service(companies::delete_company)
                .service(users::list_users)
                .service(users::list_open_alumni)
                .service(users::register_user)
                .service(users::get_user)
                .service(users::update_user)
                .service(users::delete_user)
                .service(applications::list_applications)
                .service(applications::list_user_applications)
                .service(applications::create_application)
                .service(applications::get_application)
                .service(applications::update_application)
                .service(applications::delete_application),
        );
}
