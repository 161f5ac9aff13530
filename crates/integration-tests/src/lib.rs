//! End-to-end test support for the Fierce client.
//!
//! [`StubBackend`] serves the four admin endpoints from memory on an
//! ephemeral local port and records every request it sees, so tests can
//! assert both the resulting view state and exactly what went over the wire.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fierce-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use fierce_client::{ApiClient, ClientConfig, SessionStore};

/// Token the helpers sign in with.
pub const TEST_TOKEN: &str = "test-token";

/// A request as the backend received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path relative to the API base, e.g. `/admin/orders`.
    pub path: String,
    /// Raw `Authorization` header, if any.
    pub authorization: Option<String>,
}

/// Backend endpoints that can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ListProducts,
    CreateProduct,
    ListOrders,
    ApproveOrder,
}

#[derive(Debug, Default)]
struct StubState {
    products: Mutex<Vec<Value>>,
    orders: Mutex<Vec<Value>>,
    requests: Mutex<Vec<RecordedRequest>>,
    failures: Mutex<Vec<(Endpoint, StatusCode, Value)>>,
    list_delay: Mutex<Duration>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl StubState {
    fn failure(&self, endpoint: Endpoint) -> Option<Response> {
        lock(&self.failures)
            .iter()
            .find(|(failing, _, _)| *failing == endpoint)
            .map(|(_, status, body)| (*status, Json(body.clone())).into_response())
    }

    async fn list_delay(&self) {
        let delay = *lock(&self.list_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// In-memory stand-in for the shop backend.
///
/// The server task is aborted when the backend is dropped.
#[derive(Debug)]
pub struct StubBackend {
    addr: SocketAddr,
    state: Arc<StubState>,
    server: JoinHandle<()>,
}

const API_PREFIX: &str = "/api/v1";

impl StubBackend {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    #[allow(clippy::expect_used)]
    pub async fn start() -> Self {
        let state = Arc::new(StubState::default());

        let api = Router::new()
            .route("/admin/products", get(list_products).post(create_product))
            .route("/admin/orders", get(list_orders))
            .route("/admin/orders/{id}/approve", put(approve_order))
            .route_layer(middleware::from_fn_with_state(
                Arc::clone(&state),
                record,
            ))
            .with_state(Arc::clone(&state));
        let app = Router::new().nest(API_PREFIX, api);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub backend");
        let addr = listener.local_addr().expect("Stub backend has no address");
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL the client should be configured with.
    #[must_use]
    pub fn api_url(&self) -> String {
        format!("http://{}{API_PREFIX}", self.addr)
    }

    /// Client configuration pointing at this backend.
    ///
    /// # Panics
    ///
    /// Panics if the generated URL is rejected.
    #[allow(clippy::expect_used)]
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        let api_url = self.api_url();
        ClientConfig::from_lookup(|key| (key == "FIERCE_API_URL").then(|| api_url.clone()))
            .expect("Stub backend URL is valid")
    }

    /// API client over `session`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[allow(clippy::expect_used)]
    #[must_use]
    pub fn client(&self, session: SessionStore) -> ApiClient {
        ApiClient::new(&self.config(), session).expect("Failed to build API client")
    }

    /// API client with an in-memory admin session.
    #[must_use]
    pub fn admin_client(&self) -> ApiClient {
        self.client(signed_in(true))
    }

    /// API client with an in-memory customer session.
    #[must_use]
    pub fn customer_client(&self) -> ApiClient {
        self.client(signed_in(false))
    }

    /// API client with no session.
    #[must_use]
    pub fn anonymous_client(&self) -> ApiClient {
        self.client(SessionStore::in_memory())
    }

    /// Add a product; its id is one past the highest existing id.
    pub fn seed_product(&self, name: &str, price: f64, stock: u32, image: &str) -> i64 {
        let mut products = lock(&self.state.products);
        let id = next_id(&products);
        products.push(json!({
            "id": id,
            "name": name,
            "price": price,
            "stock": stock,
            "image": image,
        }));
        id
    }

    /// Add an order in the given status.
    pub fn seed_order(&self, id: i64, customer_name: &str, total: f64, status: &str) {
        lock(&self.state.orders).push(json!({
            "id": id,
            "customer_name": customer_name,
            "total": total,
            "status": status,
            "order_date": "Mon, 01 Jan 2024 10:00:00 GMT",
        }));
    }

    /// Answer every request to `endpoint` with `status` and `body`.
    pub fn fail(&self, endpoint: Endpoint, status: StatusCode, body: Value) {
        lock(&self.state.failures).push((endpoint, status, body));
    }

    /// Stop failing every endpoint.
    pub fn recover(&self) {
        lock(&self.state.failures).clear();
    }

    /// Hold list responses for `delay` before answering.
    pub fn delay_lists(&self, delay: Duration) {
        *lock(&self.state.list_delay) = delay;
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state.requests).clone()
    }

    /// Number of requests received for `method` and `path`.
    #[must_use]
    pub fn count(&self, method: &Method, path: &str) -> usize {
        lock(&self.state.requests)
            .iter()
            .filter(|request| request.method == *method && request.path == path)
            .count()
    }

    /// Current status of an order, as the backend holds it.
    #[must_use]
    pub fn order_status(&self, id: i64) -> Option<String> {
        lock(&self.state.orders)
            .iter()
            .find(|order| order["id"] == id)
            .and_then(|order| order["status"].as_str())
            .map(str::to_owned)
    }

    /// Wait until at least `n` requests have arrived.
    ///
    /// # Panics
    ///
    /// Panics if they do not arrive within two seconds.
    pub async fn wait_for_requests(&self, n: usize) {
        for _ in 0..200 {
            if lock(&self.state.requests).len() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {n} requests, got {:?}", self.requests());
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// In-memory session signed in with [`TEST_TOKEN`].
///
/// # Panics
///
/// Panics if the in-memory store rejects the write.
#[allow(clippy::expect_used)]
#[must_use]
pub fn signed_in(is_admin: bool) -> SessionStore {
    let session = SessionStore::in_memory();
    session
        .set_session(&SecretString::from(TEST_TOKEN.to_string()), is_admin)
        .expect("In-memory session write failed");
    session
}

fn next_id(items: &[Value]) -> i64 {
    items
        .iter()
        .filter_map(|item| item["id"].as_i64())
        .max()
        .unwrap_or(0)
        + 1
}

async fn record(State(state): State<Arc<StubState>>, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let recorded = RecordedRequest {
        method: request.method().clone(),
        path: path.strip_prefix(API_PREFIX).unwrap_or(path).to_string(),
        authorization: header_value(request.headers(), header::AUTHORIZATION),
    };
    lock(&state.requests).push(recorded);
    next.run(request).await
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

fn unauthorized(headers: &HeaderMap) -> Option<Response> {
    let bearer = header_value(headers, header::AUTHORIZATION)
        .is_some_and(|value| value.starts_with("Bearer ") && value.len() > "Bearer ".len());
    (!bearer).then(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Token is missing" })),
        )
            .into_response()
    })
}

async fn list_products(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    if let Some(response) = unauthorized(&headers).or_else(|| state.failure(Endpoint::ListProducts))
    {
        return response;
    }
    state.list_delay().await;
    let products = lock(&state.products).clone();
    Json(json!({ "products": products })).into_response()
}

async fn create_product(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Response {
    if let Some(response) =
        unauthorized(&headers).or_else(|| state.failure(Endpoint::CreateProduct))
    {
        return response;
    }
    let mut products = lock(&state.products);
    let mut product = payload;
    product["id"] = json!(next_id(&products));
    products.push(product);
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Product added successfully" })),
    )
        .into_response()
}

async fn list_orders(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    if let Some(response) = unauthorized(&headers).or_else(|| state.failure(Endpoint::ListOrders)) {
        return response;
    }
    state.list_delay().await;
    let orders = lock(&state.orders).clone();
    Json(json!({ "orders": orders })).into_response()
}

async fn approve_order(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Some(response) =
        unauthorized(&headers).or_else(|| state.failure(Endpoint::ApproveOrder))
    {
        return response;
    }
    let mut orders = lock(&state.orders);
    match orders.iter_mut().find(|order| order["id"] == id) {
        Some(order) => {
            order["status"] = json!("approved");
            Json(json!({ "message": "Order approved" })).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Order not found" })),
        )
            .into_response(),
    }
}
