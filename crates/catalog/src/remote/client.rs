//! HTTP client for the remote users and products API.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::config::RemoteConfig;
use crate::models::{Product, User};

use super::conversions::{normalize_products, normalize_users};
use super::types::{ProductsEnvelope, UsersEnvelope};
use super::{FetchFailure, FetchOutcome, RemoteSource};

const USER_AGENT: &str = concat!("vitrine/", env!("CARGO_PKG_VERSION"));

/// Client for the remote catalog API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    users_url: Url,
    products_url: Url,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &RemoteConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client: builder.build()?,
                users_url: config.users_url.clone(),
                products_url: config.products_page_url(),
            }),
        })
    }

    /// Fetch and normalize the full users collection.
    #[instrument(skip(self), fields(url = %self.inner.users_url))]
    pub async fn fetch_users(&self) -> FetchOutcome<User> {
        match self.get_json::<UsersEnvelope>(&self.inner.users_url).await {
            Ok(envelope) => {
                let users = normalize_users(envelope.users);
                info!(count = users.len(), "Fetched users");
                FetchOutcome::Fetched(users)
            }
            Err(failure) => {
                error!(error = %failure, "Failed to load users from API");
                FetchOutcome::Failed(failure)
            }
        }
    }

    /// Fetch and normalize the first page of products.
    #[instrument(skip(self), fields(url = %self.inner.products_url))]
    pub async fn fetch_products(&self) -> FetchOutcome<Product> {
        match self
            .get_json::<ProductsEnvelope>(&self.inner.products_url)
            .await
        {
            Ok(envelope) => {
                let products = normalize_products(envelope.products);
                info!(count = products.len(), "Fetched products");
                FetchOutcome::Fetched(products)
            }
            Err(failure) => {
                error!(error = %failure, "Failed to load products from API");
                FetchOutcome::Failed(failure)
            }
        }
    }

    /// `GET` a URL and decode its JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchFailure> {
        let response = self
            .inner
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response
            .text()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "API returned non-success status"
            );
            return Err(FetchFailure::Status(status.as_u16()));
        }

        serde_json::from_str(&body).map_err(|e| {
            debug!(
                body = %body.chars().take(500).collect::<String>(),
                "Unparseable API response"
            );
            FetchFailure::Parse(e.to_string())
        })
    }
}

impl RemoteSource<User> for ApiClient {
    fn fetch(&self) -> impl Future<Output = FetchOutcome<User>> + Send {
        self.fetch_users()
    }
}

impl RemoteSource<Product> for ApiClient {
    fn fetch(&self) -> impl Future<Output = FetchOutcome<Product>> + Send {
        self.fetch_products()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(users: &str, products: &str) -> RemoteConfig {
        RemoteConfig {
            users_url: Url::parse(users).unwrap(),
            products_url: Url::parse(products).unwrap(),
            products_limit: 6,
            timeout: None,
        }
    }

    #[test]
    fn test_products_url_carries_limit() {
        let client = ApiClient::new(&config(
            "https://dummyjson.com/users",
            "https://dummyjson.com/products",
        ))
        .unwrap();
        assert_eq!(
            client.inner.products_url.as_str(),
            "https://dummyjson.com/products?limit=6"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_failure() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client = ApiClient::new(&config(
            "http://127.0.0.1:9/users",
            "http://127.0.0.1:9/products",
        ))
        .unwrap();

        let outcome = client.fetch_users().await;
        assert!(matches!(
            outcome.failure(),
            Some(FetchFailure::Transport(_))
        ));
        assert!(outcome.into_records().is_empty());
    }
}
