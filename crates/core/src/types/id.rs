//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.
//!
//! Backend rows identify themselves with either integer keys or UUID strings,
//! so every ID is held as an opaque string and deserializes from either a
//! JSON string or a JSON integer.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize` as a plain string, `Deserialize` from a string or an integer
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<&str>` and `From<String>` implementations
///
/// # Example
///
/// ```rust
/// # use bella_core::define_id;
/// define_id!(UserId);
/// define_id!(InvoiceId);
///
/// let user_id = UserId::new("1");
/// let invoice_id = InvoiceId::new("1");
///
/// // These are different types, so this won't compile:
/// // let _: UserId = invoice_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                struct IdVisitor;

                impl ::serde::de::Visitor<'_> for IdVisitor {
                    type Value = $name;

                    fn expecting(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                        f.write_str("a string or integer identifier")
                    }

                    fn visit_str<E: ::serde::de::Error>(self, v: &str) -> ::core::result::Result<$name, E> {
                        Ok($name(v.to_owned()))
                    }

                    fn visit_string<E: ::serde::de::Error>(self, v: String) -> ::core::result::Result<$name, E> {
                        Ok($name(v))
                    }

                    fn visit_i64<E: ::serde::de::Error>(self, v: i64) -> ::core::result::Result<$name, E> {
                        Ok($name(v.to_string()))
                    }

                    fn visit_u64<E: ::serde::de::Error>(self, v: u64) -> ::core::result::Result<$name, E> {
                        Ok($name(v.to_string()))
                    }
                }

                deserializer.deserialize_any(IdVisitor)
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(OrderId);
define_id!(CustomerId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_string_json() {
        let id: ProductId = serde_json::from_str("\"lip-gloss-01\"").unwrap();
        assert_eq!(id.as_str(), "lip-gloss-01");
    }

    #[test]
    fn test_id_from_integer_json() {
        let id: OrderId = serde_json::from_str("42").unwrap();
        assert_eq!(id, OrderId::new("42"));
    }

    #[test]
    fn test_id_serializes_as_string() {
        let id = CustomerId::new("7f9c");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7f9c\"");
    }

    #[test]
    fn test_id_rejects_other_json() {
        assert!(serde_json::from_str::<ProductId>("true").is_err());
        assert!(serde_json::from_str::<ProductId>("null").is_err());
    }
}
