//! Newtype IDs for type-safe record references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity kinds. Identifiers are
//! `i64` because locally created records take the current Unix time in
//! milliseconds as their identifier.

/// Declare an `i64` identifier newtype.
///
/// The generated type serializes as a bare JSON number, orders like the
/// wrapped integer, and converts to and from `i64`.
///
/// ```rust
/// # use vitrine_core::define_id;
/// define_id!(OrderId);
/// define_id!(InvoiceId);
///
/// let order = OrderId::new(1_700_000_000_000);
/// assert_eq!(order.as_i64(), 1_700_000_000_000);
/// // `let _: InvoiceId = order;` does not compile.
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// The raw identifier.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(ProductId);
