#![allow(dead_code)]

use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const INNER_RESULT: &str = r#"{"invoice_number": "INV-1", "supplier_name": "Łódź Sp. z o.o."}"#;

/// One multipart upload as seen by the mock API.
#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub api_key: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub file_len: usize,
    pub prompt: Option<String>,
    pub options: Option<String>,
}

#[derive(Clone, Default)]
pub struct MockApi {
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

/// Holds one slot in the in-flight count until the handler finishes or is dropped.
struct InFlight(Arc<AtomicUsize>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockApi {
    /// Largest number of requests the server was handling at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn enter(&self) -> InFlight {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        InFlight(self.in_flight.clone())
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn uploaded_names(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|r| r.file_name.unwrap_or_default())
            .collect()
    }
}

/// Body of the error response used for truncation checks: 5000 characters.
pub fn long_error_body() -> String {
    "internal error".repeat(400)[..5000].to_string()
}

/// Canned reply chosen from the uploaded file name.
async fn reply_for(file_name: &str) -> (StatusCode, String) {
    if file_name.contains("slow") {
        tokio::time::sleep(Duration::from_secs(5)).await;
        return (StatusCode::OK, "{}".to_string());
    }
    if file_name.contains("fail") {
        return (StatusCode::INTERNAL_SERVER_ERROR, long_error_body());
    }
    if file_name.contains("garbled") {
        return (StatusCode::OK, "not json".to_string());
    }
    if file_name.contains("bare") {
        return (StatusCode::OK, r#"{"invoice_number": "INV-1"}"#.to_string());
    }
    (StatusCode::OK, format!(r#"{{"result": {}}}"#, INNER_RESULT))
}

async fn extract(
    State(state): State<MockApi>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> (StatusCode, String) {
    let _slot = state.enter();
    let mut recorded = RecordedRequest {
        api_key: headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        ..Default::default()
    };

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                recorded.file_name = field.file_name().map(String::from);
                recorded.content_type = field.content_type().map(String::from);
                recorded.file_len = field.bytes().await.unwrap().len();
            }
            "prompt" => recorded.prompt = Some(field.text().await.unwrap()),
            "options" => recorded.options = Some(field.text().await.unwrap()),
            _ => {}
        }
    }

    let file_name = recorded.file_name.clone().unwrap_or_default();
    state.requests.lock().unwrap().push(recorded);

    // keep the request open long enough for an overlapping upload to show up
    tokio::time::sleep(Duration::from_millis(50)).await;

    reply_for(&file_name).await
}

/// Starts the mock API on an ephemeral port and returns its endpoint URL.
pub async fn spawn_mock_api() -> (MockApi, String) {
    let state = MockApi::default();
    let app = Router::new()
        .route("/v1/extract", post(extract))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (state, format!("http://{}/v1/extract", addr))
}

/// An endpoint on a port nothing is listening on.
pub async fn closed_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v1/extract", addr)
}

pub fn write_files(dir: &Path, names: &[&str]) {
    for name in names {
        std::fs::write(dir.join(name), format!("contents of {}", name)).unwrap();
    }
}

pub fn pattern_in(dir: &Path) -> String {
    format!("{}/*", glob::Pattern::escape(&dir.to_string_lossy()))
}
