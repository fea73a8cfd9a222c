//! Field-level predicates for user input.
//!
//! Each predicate is pure and answers a single yes/no question about one raw
//! form value. Attaching messages to fields is the form layer's job.

use url::Url;

use crate::Email;

/// Minimum trimmed length of a name-like field, in characters.
pub const TEXT_MIN_CHARS: usize = 3;

/// Maximum trimmed length of a name-like field, in characters.
pub const TEXT_MAX_CHARS: usize = 50;

/// Exclusive upper bound for an age.
pub const AGE_UPPER_BOUND: f64 = 120.0;

/// Name-like text: trimmed length between 3 and 50 characters inclusive.
#[must_use]
pub fn is_valid_text(s: &str) -> bool {
    let len = s.trim().chars().count();
    (TEXT_MIN_CHARS..=TEXT_MAX_CHARS).contains(&len)
}

/// Email with a structural `local@domain` shape, compared case-insensitively.
#[must_use]
pub fn is_valid_email(s: &str) -> bool {
    Email::parse(s).is_ok()
}

/// Coerce raw input into a number.
///
/// Surrounding whitespace is ignored and blank input coerces to zero, so a
/// blank field reads as `0` rather than as "not a number".
#[must_use]
pub fn coerce_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Number strictly between 0 and 120.
#[must_use]
pub fn is_valid_number(s: &str) -> bool {
    coerce_number(s).is_some_and(|v| v > 0.0 && v < AGE_UPPER_BOUND)
}

/// Structurally valid absolute URL.
#[must_use]
pub fn is_valid_url(s: &str) -> bool {
    !s.is_empty() && Url::parse(s).is_ok()
}

/// Optional URL: blank passes, anything else must be a valid absolute URL.
#[must_use]
pub fn is_valid_optional_url(s: &str) -> bool {
    s.is_empty() || is_valid_url(s)
}
