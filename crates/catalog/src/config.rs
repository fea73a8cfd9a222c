//! Catalog configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `VITRINE_USERS_URL` - Users endpoint (default: <https://dummyjson.com/users>)
//! - `VITRINE_PRODUCTS_URL` - Products endpoint (default: <https://dummyjson.com/products>)
//! - `VITRINE_PRODUCTS_LIMIT` - Products fetched per load (default: 6)
//! - `VITRINE_DATA_DIR` - Directory holding the local snapshots (default: `.vitrine`)
//! - `VITRINE_HTTP_TIMEOUT_SECS` - Request timeout; unset means the transport default

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_USERS_URL: &str = "https://dummyjson.com/users";
const DEFAULT_PRODUCTS_URL: &str = "https://dummyjson.com/products";
const DEFAULT_PRODUCTS_LIMIT: &str = "6";
const DEFAULT_DATA_DIR: &str = ".vitrine";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Catalog configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Remote API configuration
    pub remote: RemoteConfig,
    /// Directory holding one snapshot file per entity kind
    pub data_dir: PathBuf,
}

/// Remote API configuration.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Endpoint returning `{ "users": [...] }`
    pub users_url: Url,
    /// Endpoint returning `{ "products": [...] }`
    pub products_url: Url,
    /// Page size requested from the products endpoint
    pub products_limit: u32,
    /// Optional request timeout
    pub timeout: Option<Duration>,
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = PathBuf::from(get_or_default(&lookup, "VITRINE_DATA_DIR", DEFAULT_DATA_DIR));
        let remote = RemoteConfig::from_lookup(&lookup)?;

        Ok(Self { remote, data_dir })
    }
}

impl RemoteConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let users_url = parse_url(lookup, "VITRINE_USERS_URL", DEFAULT_USERS_URL)?;
        let products_url = parse_url(lookup, "VITRINE_PRODUCTS_URL", DEFAULT_PRODUCTS_URL)?;

        let products_limit = get_or_default(lookup, "VITRINE_PRODUCTS_LIMIT", DEFAULT_PRODUCTS_LIMIT)
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar("VITRINE_PRODUCTS_LIMIT".to_string(), e.to_string()))?;
        if products_limit == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "VITRINE_PRODUCTS_LIMIT".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let timeout = lookup("VITRINE_HTTP_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                    ConfigError::InvalidEnvVar("VITRINE_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
                })
            })
            .transpose()?;

        Ok(Self {
            users_url,
            products_url,
            products_limit,
            timeout,
        })
    }

    /// Products endpoint with the `limit` query parameter applied.
    #[must_use]
    pub fn products_page_url(&self) -> Url {
        let mut url = self.products_url.clone();
        url.query_pairs_mut()
            .append_pair("limit", &self.products_limit.to_string());
        url
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Get a variable as an absolute `http(s)` URL.
fn parse_url<F>(lookup: &F, key: &str, default: &str) -> Result<Url, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = get_or_default(lookup, key, default);
    let url = Url::parse(&raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<CatalogConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CatalogConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.remote.users_url.as_str(), "https://dummyjson.com/users");
        assert_eq!(config.remote.products_limit, 6);
        assert_eq!(config.remote.timeout, None);
        assert_eq!(config.data_dir, PathBuf::from(".vitrine"));
    }

    #[test]
    fn test_products_page_url_appends_limit() {
        let config = config_from(&[]).unwrap();
        assert_eq!(
            config.remote.products_page_url().as_str(),
            "https://dummyjson.com/products?limit=6"
        );
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("VITRINE_USERS_URL", "http://127.0.0.1:8080/users"),
            ("VITRINE_PRODUCTS_LIMIT", "12"),
            ("VITRINE_DATA_DIR", "/tmp/vitrine"),
            ("VITRINE_HTTP_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(config.remote.users_url.as_str(), "http://127.0.0.1:8080/users");
        assert_eq!(config.remote.products_limit, 12);
        assert_eq!(config.remote.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/vitrine"));
    }

    #[test]
    fn test_invalid_limit() {
        let err = config_from(&[("VITRINE_PRODUCTS_LIMIT", "six")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "VITRINE_PRODUCTS_LIMIT"));

        assert!(config_from(&[("VITRINE_PRODUCTS_LIMIT", "0")]).is_err());
    }

    #[test]
    fn test_invalid_url() {
        assert!(config_from(&[("VITRINE_USERS_URL", "dummyjson.com/users")]).is_err());
        assert!(config_from(&[("VITRINE_PRODUCTS_URL", "ftp://example.com/p")]).is_err());
    }

    #[test]
    fn test_invalid_timeout() {
        assert!(config_from(&[("VITRINE_HTTP_TIMEOUT_SECS", "soon")]).is_err());
    }
}
