//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ApplicationCommand, ApplicationQuery, CompanyCommand, CompanyQuery, UserCommand, UserQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Company mutations.
    pub companies: Arc<dyn CompanyCommand>,
    /// Company reads.
    pub companies_query: Arc<dyn CompanyQuery>,
    /// User mutations.
    pub users: Arc<dyn UserCommand>,
    /// Projected user reads.
    pub users_query: Arc<dyn UserQuery>,
    /// Application mutations.
    pub applications: Arc<dyn ApplicationCommand>,
    /// Application reads.
    pub applications_query: Arc<dyn ApplicationQuery>,
}

impl HttpState {
    /// Build state from services that implement both halves of each port
    /// pair.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use tracker_backend::domain::{ApplicationService, CompanyService, UserService};
    /// use tracker_backend::inbound::http::state::HttpState;
    /// use tracker_backend::outbound::memory::MemoryStore;
    ///
    /// let store = Arc::new(MemoryStore::default());
    /// let clock = Arc::new(DefaultClock);
    /// let state = HttpState::from_services(
    ///     Arc::new(CompanyService::new(store.clone(), clock.clone())),
    ///     Arc::new(UserService::new(store.clone())),
    ///     Arc::new(ApplicationService::new(store, clock)),
    /// );
    /// let _companies = state.companies.clone();
    /// ```
    pub fn from_services<C, U, A>(companies: Arc<C>, users: Arc<U>, applications: Arc<A>) -> Self
    where
        C: CompanyCommand + CompanyQuery + 'static,
        U: UserCommand + UserQuery + 'static,
        A: ApplicationCommand + ApplicationQuery + 'static,
    {
        Self {
            companies: companies.clone(),
            companies_query: companies,
            users: users.clone(),
            users_query: users,
            applications: applications.clone(),
            applications_query: applications,
        }
    }
}
