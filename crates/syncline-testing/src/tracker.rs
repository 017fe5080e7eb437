//! In-process mock of the remote tracker's issue API.
//!
//! Binds an ephemeral port, records every request for later assertion, and
//! can be switched into a failure mode where all endpoints return 500.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};

/// A request the mock tracker received.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerRequest {
    Create(Value),
    Update { key: String, body: Value },
    Delete { key: String },
}

#[derive(Clone)]
struct ServerState {
    requests: Arc<Mutex<Vec<TrackerRequest>>>,
    failing: Arc<AtomicBool>,
    counter: Arc<AtomicUsize>,
    project_key: String,
}

pub struct MockTrackerServer {
    addr: SocketAddr,
    state: ServerState,
}

impl MockTrackerServer {
    /// Start the server on an ephemeral 127.0.0.1 port. Created issues get
    /// keys `<project_key>-1`, `<project_key>-2`, ...
    pub async fn start(project_key: &str) -> Self {
        let state = ServerState {
            requests: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(AtomicBool::new(false)),
            counter: Arc::new(AtomicUsize::new(0)),
            project_key: project_key.to_owned(),
        };
        let app = Router::new()
            .route("/rest/api/3/issue", post(create_issue))
            .route("/rest/api/3/issue/{key}", put(update_issue))
            .route("/rest/api/3/issue/{key}", delete(delete_issue))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock tracker");
        let addr = listener.local_addr().expect("mock tracker addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock tracker server");
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Switch all endpoints into (or out of) 500-failure mode.
    pub fn fail_requests(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<TrackerRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn create_issue(
    State(state): State<ServerState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state
        .requests
        .lock()
        .unwrap()
        .push(TrackerRequest::Create(body));
    if state.failing.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "errorMessages": ["tracker unavailable"] })),
        );
    }
    let n = state.counter.fetch_add(1, Ordering::SeqCst) + 1;
    (
        StatusCode::CREATED,
        Json(json!({
            "id": n.to_string(),
            "key": format!("{}-{}", state.project_key, n),
        })),
    )
}

async fn update_issue(
    State(state): State<ServerState>,
    Path(key): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    state
        .requests
        .lock()
        .unwrap()
        .push(TrackerRequest::Update { key, body });
    if state.failing.load(Ordering::SeqCst) {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn delete_issue(State(state): State<ServerState>, Path(key): Path<String>) -> StatusCode {
    state
        .requests
        .lock()
        .unwrap()
        .push(TrackerRequest::Delete { key });
    if state.failing.load(Ordering::SeqCst) {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::NO_CONTENT
    }
}
