//! Stub management server for integration tests
//!
//! Serves `/entity/allActivity` and `/entity/breadcrumbs` from canned responses and counts hits,
//! so tests can point a real `HttpConsoleApi` at it.

#![allow(dead_code)]

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::{sleep, Duration, Instant};

/// Canned response: status code and raw body
#[derive(Clone)]
pub struct Canned {
    pub status: StatusCode,
    pub body: String,
}

impl Canned {
    pub fn json(value: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: value.to_string(),
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }

    pub fn raw(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
        }
    }
}

impl IntoResponse for Canned {
    fn into_response(self) -> Response {
        (
            self.status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}

#[derive(Clone)]
pub struct StubServer {
    pub activity: Arc<Mutex<Canned>>,
    pub breadcrumbs: Arc<Mutex<Canned>>,
    pub activity_hits: Arc<AtomicUsize>,
    pub activity_delay: Arc<Mutex<Duration>>,
    pub breadcrumb_ids: Arc<Mutex<Vec<String>>>,
}

#[derive(Deserialize)]
struct BreadcrumbQuery {
    id: String,
}

impl StubServer {
    pub fn new() -> Self {
        Self {
            activity: Arc::new(Mutex::new(Canned::json(json!([])))),
            breadcrumbs: Arc::new(Mutex::new(Canned::json(json!([])))),
            activity_hits: Arc::new(AtomicUsize::new(0)),
            activity_delay: Arc::new(Mutex::new(Duration::ZERO)),
            breadcrumb_ids: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_activity(&self, canned: Canned) {
        *self.activity.lock().unwrap() = canned;
    }

    /// Hold every activity response for `delay` before answering
    pub fn set_activity_delay(&self, delay: Duration) {
        *self.activity_delay.lock().unwrap() = delay;
    }

    pub fn set_breadcrumbs(&self, canned: Canned) {
        *self.breadcrumbs.lock().unwrap() = canned;
    }

    pub fn activity_hits(&self) -> usize {
        self.activity_hits.load(Ordering::SeqCst)
    }

    pub fn breadcrumb_ids(&self) -> Vec<String> {
        self.breadcrumb_ids.lock().unwrap().clone()
    }

    /// Start serving; returns the dashboard page URL
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/entity/allActivity", get(all_activity_handler))
            .route("/entity/breadcrumbs", get(breadcrumbs_handler))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/dashboard/")
    }
}

async fn all_activity_handler(State(server): State<StubServer>) -> Canned {
    server.activity_hits.fetch_add(1, Ordering::SeqCst);
    let delay = *server.activity_delay.lock().unwrap();
    if !delay.is_zero() {
        sleep(delay).await;
    }
    server.activity.lock().unwrap().clone()
}

async fn breadcrumbs_handler(
    State(server): State<StubServer>,
    Query(query): Query<BreadcrumbQuery>,
) -> Canned {
    server.breadcrumb_ids.lock().unwrap().push(query.id);
    server.breadcrumbs.lock().unwrap().clone()
}

pub fn activity_payload() -> Value {
    json!([{
        "entityId": "e1",
        "entityDisplayName": "E1",
        "displayName": "T1",
        "id": "task-1",
        "submitTimeUtc": "t0",
        "startTimeUtc": "t0",
        "endTimeUtc": "t1",
        "currentStatus": "DONE"
    }])
}

/// Poll `condition` every 10ms until it holds or two seconds pass
pub async fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        sleep(Duration::from_millis(10)).await;
    }
    condition()
}
