//! Integration test support for Vitrine.
//!
//! [`MockApi`] serves the users and products endpoints on an ephemeral
//! localhost port, counts requests, and can be switched into failure modes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitrine-integration-tests
//! ```
//!
//! No network access or external services are needed.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

use vitrine_catalog::config::{CatalogConfig, ConfigError};

/// How the mock answers requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Serve the configured fixtures.
    Serve,
    /// Answer every request with `500 Internal Server Error`.
    ServerError,
    /// Answer `200 OK` with a body that is not JSON.
    Garbage,
    /// Answer `200 OK` with an envelope that has no entity list.
    MissingList,
}

#[derive(Clone)]
struct MockState {
    users: Arc<Mutex<Value>>,
    products: Arc<Mutex<Value>>,
    mode: Arc<Mutex<Mode>>,
    user_hits: Arc<AtomicUsize>,
    product_hits: Arc<AtomicUsize>,
    last_limit: Arc<Mutex<Option<String>>>,
}

/// A running mock of the remote catalog API.
///
/// The server task is aborted when the mock is dropped.
pub struct MockApi {
    addr: SocketAddr,
    state: MockState,
    handle: JoinHandle<()>,
}

impl MockApi {
    /// Start serving `users` and `products` (JSON arrays of raw entities).
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(users: Value, products: Value) -> Self {
        let state = MockState {
            users: Arc::new(Mutex::new(users)),
            products: Arc::new(Mutex::new(products)),
            mode: Arc::new(Mutex::new(Mode::Serve)),
            user_hits: Arc::new(AtomicUsize::new(0)),
            product_hits: Arc::new(AtomicUsize::new(0)),
            last_limit: Arc::new(Mutex::new(None)),
        };

        let app = Router::new()
            .route("/users", get(users_handler))
            .route("/products", get(products_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock API listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Start with the standard fixtures.
    pub async fn with_fixtures() -> Self {
        Self::start(fixtures::users(), fixtures::products()).await
    }

    /// # Panics
    ///
    /// Never in practice; the address always forms a valid URL.
    #[must_use]
    pub fn users_url(&self) -> Url {
        Url::parse(&format!("http://{}/users", self.addr)).expect("Invalid mock URL")
    }

    /// # Panics
    ///
    /// Never in practice; the address always forms a valid URL.
    #[must_use]
    pub fn products_url(&self) -> Url {
        Url::parse(&format!("http://{}/products", self.addr)).expect("Invalid mock URL")
    }

    /// Configuration pointing at this mock and storing under `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not parse.
    pub fn config(&self, data_dir: &Path) -> Result<CatalogConfig, ConfigError> {
        let vars = HashMap::from([
            ("VITRINE_USERS_URL", self.users_url().to_string()),
            ("VITRINE_PRODUCTS_URL", self.products_url().to_string()),
            ("VITRINE_DATA_DIR", data_dir.display().to_string()),
            ("VITRINE_HTTP_TIMEOUT_SECS", "5".to_string()),
        ]);
        CatalogConfig::from_lookup(|key| vars.get(key).cloned())
    }

    pub fn set_mode(&self, mode: Mode) {
        *lock(&self.state.mode) = mode;
    }

    pub fn set_users(&self, users: Value) {
        *lock(&self.state.users) = users;
    }

    pub fn set_products(&self, products: Value) {
        *lock(&self.state.products) = products;
    }

    /// Requests received on `/users`.
    #[must_use]
    pub fn user_hits(&self) -> usize {
        self.state.user_hits.load(Ordering::SeqCst)
    }

    /// Requests received on `/products`.
    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.state.product_hits.load(Ordering::SeqCst)
    }

    /// `limit` query parameter of the latest `/products` request.
    #[must_use]
    pub fn last_products_limit(&self) -> Option<String> {
        lock(&self.state.last_limit).clone()
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The canned answer for `mode`, or `None` when fixtures should be served.
fn canned_response(mode: Mode) -> Option<Response> {
    match mode {
        Mode::Serve => None,
        Mode::ServerError => {
            Some((StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response())
        }
        Mode::Garbage => Some(
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                "<html>not json</html>",
            )
                .into_response(),
        ),
        Mode::MissingList => Some(axum::Json(json!({ "total": 0, "skip": 0 })).into_response()),
    }
}

async fn users_handler(State(state): State<MockState>) -> Response {
    state.user_hits.fetch_add(1, Ordering::SeqCst);
    let mode = *lock(&state.mode);
    if let Some(response) = canned_response(mode) {
        return response;
    }

    let users = lock(&state.users).clone();
    axum::Json(json!({ "users": users, "total": 208, "skip": 0, "limit": 30 })).into_response()
}

async fn products_handler(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.product_hits.fetch_add(1, Ordering::SeqCst);
    let limit = params.get("limit").cloned();
    *lock(&state.last_limit) = limit.clone();

    let mode = *lock(&state.mode);
    if let Some(response) = canned_response(mode) {
        return response;
    }

    let mut products = match lock(&state.products).clone() {
        Value::Array(items) => items,
        _ => Vec::new(),
    };
    if let Some(limit) = limit.and_then(|l| l.parse::<usize>().ok()) {
        products.truncate(limit);
    }
    axum::Json(json!({ "products": products, "total": 194, "skip": 0 })).into_response()
}

/// Raw API payloads shaped like the public dummy data service.
pub mod fixtures {
    use serde_json::{Value, json};

    /// Three users: one complete, one with only an avatar, one bare.
    #[must_use]
    pub fn users() -> Value {
        json!([
            {
                "id": 1,
                "firstName": "Emily",
                "lastName": "Johnson",
                "email": "emily.johnson@x.dummyjson.com",
                "age": 28,
                "image": "https://dummyjson.com/icon/emilys/128"
            },
            {
                "id": 2,
                "firstName": "Michael",
                "lastName": "Williams",
                "email": "michael.williams@x.dummyjson.com",
                "age": 35,
                "avatar": "https://i.pravatar.cc/150?img=2"
            },
            {
                "id": 3
            }
        ])
    }

    /// Eight products, more than one default page.
    #[must_use]
    pub fn products() -> Value {
        let mut products = vec![
            json!({
                "id": 1,
                "title": "iPhone 9",
                "brand": "Apple",
                "category": "smartphones",
                "description": "An apple mobile which is nothing like apple, with a screen that is too big to describe",
                "price": 549,
                "thumbnail": "https://cdn.dummyjson.com/product-images/1/thumbnail.jpg"
            }),
            json!({
                "id": 2,
                "title": "Essence Mascara Lash Princess",
                "brand": "Essence",
                "category": "beauty",
                "description": "Popular mascara.",
                "price": 9.99
            }),
        ];
        for id in 3..=8 {
            products.push(json!({
                "id": id,
                "title": format!("Produto {id}"),
                "brand": "Marca",
                "category": "groceries",
                "description": "Item de mercado",
                "price": 1234.5,
                "thumbnail": format!("https://cdn.dummyjson.com/product-images/{id}/thumbnail.jpg")
            }));
        }
        Value::Array(products)
    }
}
