//! Common Test Utilities for Integration Tests
//!
//! Shared helpers used across integration test modules: a local HTTP server
//! that records what it receives, and scratch directories.

#![allow(dead_code)]

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    routing::post,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;

/// How the test server answers every request
#[derive(Debug, Clone)]
pub struct Behavior {
    pub status: StatusCode,
    pub body: &'static str,
    pub delay: Duration,
}

impl Behavior {
    pub fn ok() -> Self {
        Self {
            status: StatusCode::OK,
            body: "",
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: StatusCode, body: &'static str) -> Self {
        Self {
            status,
            body,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// What the test server has observed so far
#[derive(Debug, Default)]
pub struct ServerStats {
    hits: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    bodies: Mutex<Vec<Bytes>>,
    content_types: Mutex<Vec<String>>,
}

impl ServerStats {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn bodies(&self) -> Vec<Bytes> {
        self.bodies.lock().unwrap().clone()
    }

    pub fn content_types(&self) -> Vec<String> {
        self.content_types.lock().unwrap().clone()
    }
}

struct ServerState {
    behavior: Behavior,
    stats: Arc<ServerStats>,
}

async fn ingest(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let stats = &state.stats;
    stats.hits.fetch_add(1, Ordering::SeqCst);
    let now = stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    stats.peak_in_flight.fetch_max(now, Ordering::SeqCst);

    if let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
        stats
            .content_types
            .lock()
            .unwrap()
            .push(content_type.to_string());
    }
    stats.bodies.lock().unwrap().push(body);

    if !state.behavior.delay.is_zero() {
        tokio::time::sleep(state.behavior.delay).await;
    }

    stats.in_flight.fetch_sub(1, Ordering::SeqCst);
    (state.behavior.status, state.behavior.body)
}

/// Local HTTP server listening on an ephemeral port
pub struct TestServer {
    pub url: String,
    pub stats: Arc<ServerStats>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server whose `/ingest` route answers every POST with `behavior`
    pub async fn spawn(behavior: Behavior) -> Self {
        let stats = Arc::new(ServerStats::default());
        let state = Arc::new(ServerState {
            behavior,
            stats: stats.clone(),
        });

        let app = Router::new()
            .route("/ingest", post(ingest))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to read local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            url: format!("http://{}/ingest", addr),
            stats,
            handle,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// URL of a port with nothing listening on it
pub fn unused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);
    format!("http://{}/ingest", addr)
}

/// Scratch directory removed on drop
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("profile-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&path).expect("Failed to create scratch directory");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `request.json` into the directory
    pub fn write_request(&self, contents: &str) -> PathBuf {
        let file = self.path.join("request.json");
        std::fs::write(&file, contents).expect("Failed to write request.json");
        file
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.path).ok();
    }
}

/// Initialize test logging for detailed output
pub fn init_test_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "profile_loadgen=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
