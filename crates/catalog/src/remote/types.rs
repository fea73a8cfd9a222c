//! Wire types of the remote API.
//!
//! Every entity field is optional: the API omits fields freely and
//! normalization supplies the defaults. Fields of an unexpected JSON type are
//! read as absent (or coerced, for numeric strings) rather than failing the
//! whole page.

use serde::Deserialize;

/// `GET <users-url>` response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsersEnvelope {
    #[serde(default, deserialize_with = "lenient::entities")]
    pub users: Vec<RawUser>,
}

/// `GET <products-url>?limit=n` response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductsEnvelope {
    #[serde(default, deserialize_with = "lenient::entities")]
    pub products: Vec<RawProduct>,
}

/// A user as returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawUser {
    #[serde(deserialize_with = "lenient::id")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient::text")]
    pub first_name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub age: Option<f64>,
    #[serde(deserialize_with = "lenient::text")]
    pub image: Option<String>,
    /// Alternate image field used by some user APIs.
    #[serde(deserialize_with = "lenient::text")]
    pub avatar: Option<String>,
}

/// A product as returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawProduct {
    #[serde(deserialize_with = "lenient::id")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub brand: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub price: Option<f64>,
    #[serde(deserialize_with = "lenient::text")]
    pub thumbnail: Option<String>,
}

mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use tracing::warn;

    /// An array of entities. `null` or a non-array is an empty page, and an
    /// element that is not an object becomes an all-default entity.
    pub fn entities<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let items = match Value::deserialize(deserializer)? {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => {
                warn!(found = %type_name(&other), "Entity list is not an array, using an empty page");
                Vec::new()
            }
        };

        Ok(items
            .into_iter()
            .map(|item| {
                T::deserialize(item).unwrap_or_else(|e| {
                    warn!(error = %e, "Unreadable entity, using defaults");
                    T::default()
                })
            })
            .collect())
    }

    /// An integer identifier, also from a numeric string. Anything else is
    /// absent, so a fresh identifier gets allocated.
    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// A finite number, also from a numeric string.
    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let number = match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        Ok(number.filter(|n: &f64| n.is_finite()))
    }

    /// A string. Numbers and booleans keep their JSON spelling.
    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    const fn type_name(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}
