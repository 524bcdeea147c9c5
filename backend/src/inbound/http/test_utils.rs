//! Shared helpers for HTTP handler tests.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use mockable::{Clock, DefaultClock};

use crate::Trace;
use crate::domain::{ApplicationService, CompanyService, UserService};
use crate::domain::ports::{
    MockApplicationCommand, MockApplicationQuery, MockCompanyCommand, MockCompanyQuery,
    MockUserCommand, MockUserQuery,
};
use crate::inbound::http::configure;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::MemoryStore;

/// Port mocks with no expectations; unexpected calls fail the test.
#[derive(Default)]
pub(crate) struct MockPorts {
    pub(crate) companies: MockCompanyCommand,
    pub(crate) companies_query: MockCompanyQuery,
    pub(crate) users: MockUserCommand,
    pub(crate) users_query: MockUserQuery,
    pub(crate) applications: MockApplicationCommand,
    pub(crate) applications_query: MockApplicationQuery,
}

impl MockPorts {
    pub(crate) fn into_state(self) -> HttpState {
        HttpState {
            companies: Arc::new(self.companies),
            companies_query: Arc::new(self.companies_query),
            users: Arc::new(self.users),
            users_query: Arc::new(self.users_query),
            applications: Arc::new(self.applications),
            applications_query: Arc::new(self.applications_query),
        }
    }
}

/// Services over one empty in-memory store.
pub(crate) fn memory_state() -> HttpState {
    let store = Arc::new(MemoryStore::new());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    HttpState::from_services(
        Arc::new(CompanyService::new(store.clone(), clock.clone())),
        Arc::new(UserService::new(store.clone())),
        Arc::new(ApplicationService::new(store, clock)),
    )
}

/// Build an application serving every tracker route over `ports`.
pub(crate) fn test_app(
    ports: MockPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    app_over(ports.into_state())
}

/// Build an application serving every tracker route over `state`.
pub(crate) fn app_over(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(Trace)
        .app_data(web::Data::new(state))
        .configure(configure)
}
