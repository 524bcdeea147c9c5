//! Shared world for the tracker behaviour suites.
//!
//! The world owns a current-thread Tokio runtime plus a `LocalSet` because
//! Actix services are not `Send`. Every request builds the full application
//! over the same in-memory store, so state persists across steps.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use actix_web::http::Method;
use actix_web::{App, test as actix_test, web};
use mockable::{Clock, DefaultClock};
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;
use tracker_backend::Trace;
use tracker_backend::domain::{ApplicationService, CompanyService, UserService};
use tracker_backend::inbound::http::configure;
use tracker_backend::inbound::http::state::HttpState;
use tracker_backend::outbound::memory::MemoryStore;

/// Status and JSON body of the most recent response.
#[derive(Debug, Clone)]
pub struct Captured {
    pub status: u16,
    pub body: Value,
    pub trace_id: Option<String>,
}

/// Scenario state shared between steps.
pub struct TrackerWorld {
    runtime: Runtime,
    local: LocalSet,
    state: web::Data<HttpState>,
    last: RefCell<Option<Captured>>,
    records: RefCell<HashMap<String, Value>>,
}

impl TrackerWorld {
    /// A world over an empty in-memory store.
    pub fn new() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("test runtime");
        let store = Arc::new(MemoryStore::new());
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let state = HttpState::from_services(
            Arc::new(CompanyService::new(store.clone(), clock.clone())),
            Arc::new(UserService::new(store.clone())),
            Arc::new(ApplicationService::new(store, clock)),
        );
        Self {
            runtime,
            local: LocalSet::new(),
            state: web::Data::new(state),
            last: RefCell::new(None),
            records: RefCell::new(HashMap::new()),
        }
    }

    /// Send a request and remember its response.
    pub fn send(&self, method: Method, path: &str, payload: Option<Value>) -> Captured {
        let state = self.state.clone();
        let uri = path.to_owned();
        let captured = self.local.block_on(&self.runtime, async move {
            let app = actix_test::init_service(
                App::new()
                    .wrap(Trace)
                    .app_data(state)
                    .configure(configure),
            )
            .await;
            let request = actix_test::TestRequest::default().method(method).uri(&uri);
            let request = match payload {
                Some(payload) => request.set_json(payload),
                None => request,
            };
            let response = actix_test::call_service(&app, request.to_request()).await;
            let status = response.status().as_u16();
            let trace_id = response
                .headers()
                .get("trace-id")
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body: Value = actix_test::read_body_json(response).await;
            Captured {
                status,
                body,
                trace_id,
            }
        });
        self.last.replace(Some(captured.clone()));
        captured
    }

    /// Send a request that must succeed, returning the body.
    pub fn send_ok(&self, method: Method, path: &str, payload: Option<Value>) -> Value {
        let captured = self.send(method, path, payload);
        assert!(
            (200..300).contains(&captured.status),
            "expected success, got {} {}",
            captured.status,
            captured.body
        );
        captured.body
    }

    /// The most recent response.
    pub fn last(&self) -> Captured {
        self.last.borrow().clone().expect("a request was sent")
    }

    /// Remember a created record under `alias`.
    pub fn remember(&self, alias: &str, body: &Value) {
        assert!(body.get("_id").is_some(), "record carries _id: {body}");
        self.records
            .borrow_mut()
            .insert(alias.to_owned(), body.clone());
    }

    /// The record remembered under `alias`.
    pub fn record_of(&self, alias: &str) -> Value {
        self.records
            .borrow()
            .get(alias)
            .cloned()
            .unwrap_or_else(|| panic!("no record remembered as {alias}"))
    }

    /// The `_id` of the record remembered under `alias`.
    pub fn id_of(&self, alias: &str) -> String {
        self.record_of(alias)
            .get("_id")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| panic!("record {alias} has a string _id"))
    }
}

/// Assert the last response is an error with `status` and `message`.
pub fn assert_error(world: &TrackerWorld, status: u16, message: &str) {
    let last = world.last();
    assert_eq!(last.status, status, "body: {}", last.body);
    assert_eq!(
        last.body.get("message").and_then(Value::as_str),
        Some(message)
    );
}
