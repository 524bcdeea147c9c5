//! Builders wiring repositories into services and HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use tracker_backend::domain::ports::{ApplicationRepository, CompanyRepository, UserRepository};
use tracker_backend::domain::{ApplicationService, CompanyService, UserService};
use tracker_backend::inbound::http::state::HttpState;
use tracker_backend::outbound::memory::MemoryStore;
use tracker_backend::outbound::persistence::{
    DbPool, DieselApplicationRepository, DieselCompanyRepository, DieselUserRepository,
};

use super::ServerConfig;

fn services_over<C, U, A>(
    companies: Arc<C>,
    users: Arc<U>,
    applications: Arc<A>,
) -> HttpState
where
    C: CompanyRepository + 'static,
    U: UserRepository + 'static,
    A: ApplicationRepository + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    HttpState::from_services(
        Arc::new(CompanyService::new(companies, clock.clone())),
        Arc::new(UserService::new(users)),
        Arc::new(ApplicationService::new(applications, clock)),
    )
}

fn diesel_state(pool: &DbPool) -> HttpState {
    services_over(
        Arc::new(DieselCompanyRepository::new(pool.clone())),
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselApplicationRepository::new(pool.clone())),
    )
}

fn memory_state() -> HttpState {
    let store = Arc::new(MemoryStore::new());
    services_over(store.clone(), store.clone(), store)
}

/// Build the HTTP state: Diesel repositories when a pool is configured,
/// otherwise one shared in-memory store.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => diesel_state(pool),
        None => {
            info!("no database configured; using the in-memory store");
            memory_state()
        }
    };
    web::Data::new(state)
}
