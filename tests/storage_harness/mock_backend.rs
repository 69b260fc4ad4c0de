//! In-process HTTP toy backend for remote adapter tests
//!
//! Serves the `toy` resource on an ephemeral port, answering from a
//! `LocalToyStore` so the remote and local adapters share semantics.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use mister_toy::core::error::{CatalogError, CatalogResult};
use mister_toy::core::query::ToyQuery;
use mister_toy::core::service::ToyStore;
use mister_toy::core::toy::{Toy, ToyId};
use mister_toy::storage::{HttpToyStore, LocalToyStore};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[derive(Clone)]
struct Backend {
    store: LocalToyStore,
    failing_writes: Arc<AtomicBool>,
}

/// Handle to a running backend. The server lives until the test runtime
/// shuts down.
pub struct MockBackend {
    pub base_url: String,
    pub store: LocalToyStore,
    failing_writes: Arc<AtomicBool>,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        Self::spawn_with(LocalToyStore::new()).await
    }

    pub async fn spawn_with(store: LocalToyStore) -> Self {
        let failing_writes = Arc::new(AtomicBool::new(false));
        let backend = Backend {
            store: store.clone(),
            failing_writes: Arc::clone(&failing_writes),
        };

        let app = Router::new()
            .route("/api/toy/", get(list).post(create).put(update))
            .route("/api/toy/{id}", get(get_one).delete(remove))
            .with_state(backend);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend");
        });

        Self {
            base_url: format!("http://{}/api/toy/", addr),
            store,
            failing_writes,
        }
    }

    pub fn client(&self) -> HttpToyStore {
        HttpToyStore::new(&self.base_url, Duration::from_secs(5)).expect("http client")
    }

    /// Make POST/PUT/DELETE answer 500 until switched off
    pub fn fail_writes(&self, failing: bool) {
        self.failing_writes.store(failing, Ordering::SeqCst);
    }
}

/// Fresh backend plus a client pointed at it
pub async fn spawn_remote_store() -> HttpToyStore {
    MockBackend::spawn().await.client()
}

fn respond<T: Serialize>(result: CatalogResult<T>) -> Response {
    match result {
        Ok(value) => Json(value).into_response(),
        Err(err) if err.is_not_found() => (StatusCode::NOT_FOUND, err.to_string()).into_response(),
        Err(err @ CatalogError::Validation(_)) => {
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

fn simulated_failure(backend: &Backend) -> Option<Response> {
    backend.failing_writes.load(Ordering::SeqCst).then(|| {
        (StatusCode::INTERNAL_SERVER_ERROR, "Simulated failure").into_response()
    })
}

async fn list(
    State(backend): State<Backend>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    match ToyQuery::from_pairs(pairs).into_filter() {
        Ok(filter) => respond(backend.store.query(&filter).await),
        Err(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    }
}

async fn get_one(State(backend): State<Backend>, Path(id): Path<String>) -> Response {
    respond(backend.store.get(&ToyId::new(id)).await)
}

async fn create(State(backend): State<Backend>, Json(toy): Json<Toy>) -> Response {
    if let Some(failure) = simulated_failure(&backend) {
        return failure;
    }
    respond(backend.store.create(toy).await)
}

async fn update(State(backend): State<Backend>, Json(toy): Json<Toy>) -> Response {
    if let Some(failure) = simulated_failure(&backend) {
        return failure;
    }
    respond(backend.store.update(toy).await)
}

async fn remove(State(backend): State<Backend>, Path(id): Path<String>) -> Response {
    if let Some(failure) = simulated_failure(&backend) {
        return failure;
    }
    respond(backend.store.delete(&ToyId::new(id)).await.map(|()| "Removed"))
}
