//! User records.

use serde::{Deserialize, Serialize};
use vitrine_core::UserId;

use super::{Entity, EntityKind};

/// Placeholder first name for remote users that arrive without one.
pub const DEFAULT_FIRST_NAME: &str = "Nome";

/// Placeholder last name for remote users that arrive without one.
pub const DEFAULT_LAST_NAME: &str = "Sobrenome";

/// A user as kept in the in-memory collection and the local snapshot.
///
/// Every field is always present. Missing values are defaulted when the
/// record is created, never at display time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Age in years; `None` is written to the snapshot as an empty string.
    #[serde(default, with = "blank_age")]
    pub age: Option<f64>,
    /// Image URL or the empty string.
    pub image: String,
}

impl User {
    /// `"first last"` as shown in lists.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::Users;

    fn id(&self) -> i64 {
        self.id.as_i64()
    }
}

/// Snapshot encoding of an optional age: a JSON number, or `""` when unset.
mod blank_age {
    use serde::de::{self, Deserializer, Visitor};
    use serde::ser::Serializer;

    #[allow(clippy::ref_option)] // signature dictated by `#[serde(with)]`
    pub fn serialize<S: Serializer>(age: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        match age {
            Some(years) => serializer.serialize_f64(*years),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        deserializer.deserialize_any(AgeVisitor)
    }

    struct AgeVisitor;

    impl Visitor<'_> for AgeVisitor {
        type Value = Option<f64>;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a number, a numeric string, an empty string, or null")
        }

        #[allow(clippy::cast_precision_loss)] // ages are small integers
        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        #[allow(clippy::cast_precision_loss)] // ages are small integers
        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }
}
