//! Shared utilities for integration tests.
//!
//! Provides a stub index node: an in-process axum server on a random port
//! that answers the search endpoint with a canned Solr response and accepts
//! (or rejects) update submissions, recording every request it sees.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{OriginalUri, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Path of the search service.
pub const SEARCH_PATH: &str = "/esg-search/search/";
/// Path of the update operation.
pub const UPDATE_PATH: &str = "/esg-search/ws/update";

/// A request received by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path and query, as sent on the request line.
    pub target: String,
    pub body: String,
}

/// How the stub answers searches.
#[derive(Debug, Clone)]
pub enum SearchReply {
    Respond { status: u16, body: String },
    /// Accept the request and never answer.
    Hang,
}

impl SearchReply {
    pub fn found(id: &str) -> Self {
        SearchReply::Respond {
            status: 200,
            body: format!(
                r#"{{"responseHeader": {{"status": 0}}, "response": {{"numFound": 1, "start": 0, "docs": [{{"id": "{}", "version": "1"}}]}}}}"#,
                id
            ),
        }
    }

    pub fn not_found() -> Self {
        SearchReply::Respond {
            status: 200,
            body: r#"{"response": {"numFound": 0, "start": 0, "docs": []}}"#.to_string(),
        }
    }

    pub fn status(status: u16) -> Self {
        SearchReply::Respond {
            status,
            body: "Service Unavailable".to_string(),
        }
    }
}

struct StubState {
    search: SearchReply,
    update_status: StatusCode,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StubState {
    async fn record(&self, method: Method, uri: &axum::http::Uri, body: String) {
        self.requests.lock().await.push(RecordedRequest {
            method: method.to_string(),
            target: uri.to_string(),
            body,
        });
    }
}

/// Local stand-in for an index node.
pub struct StubIndex {
    state: Arc<StubState>,
    /// Server handle (kept alive to prevent shutdown)
    _handle: JoinHandle<()>,
    pub addr: SocketAddr,
}

impl StubIndex {
    /// Start the stub; update submissions are answered with `update_status`.
    pub async fn start(search: SearchReply, update_status: u16) -> Self {
        let state = Arc::new(StubState {
            search,
            update_status: StatusCode::from_u16(update_status).expect("valid update status"),
            requests: Mutex::new(Vec::new()),
        });

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub index");
        let addr = listener.local_addr().expect("Failed to get local address");

        let app = Router::new()
            .route(SEARCH_PATH, get(handle_search))
            .route(UPDATE_PATH, post(handle_update))
            .with_state(state.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Stub index failed");
        });

        Self {
            state,
            _handle: handle,
            addr,
        }
    }

    /// Host and port, as configured for `index_node`.
    pub fn index_node(&self) -> String {
        self.addr.to_string()
    }

    /// Base URL of the update service on this stub.
    pub fn service_url(&self) -> String {
        format!("http://{}/esg-search/ws", self.addr)
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().await.clone()
    }
}

async fn handle_search(
    State(state): State<Arc<StubState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> Response {
    state.record(method, &uri, String::new()).await;

    match &state.search {
        SearchReply::Respond { status, body } => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::OK);
            (
                status,
                [(header::CONTENT_TYPE, "application/json")],
                body.clone(),
            )
                .into_response()
        }
        SearchReply::Hang => {
            tokio::time::sleep(Duration::from_secs(60)).await;
            StatusCode::GATEWAY_TIMEOUT.into_response()
        }
    }
}

async fn handle_update(
    State(state): State<Arc<StubState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    body: String,
) -> (StatusCode, &'static str) {
    state.record(method, &uri, body).await;
    (state.update_status, "<response/>")
}
