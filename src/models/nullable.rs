//! Serde helper for optional fields that must keep `null` apart from absent.
//!
//! Use with `Option<Option<T>>` plus `#[serde(default, skip_serializing_if =
//! "Option::is_none")]`: absent is `None`, `null` is `Some(None)`.

use serde::{Deserialize, Deserializer};

pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// The value, treating absent and `null` alike.
pub fn value(field: &Option<Option<String>>) -> Option<&str> {
    field.as_ref().and_then(|v| v.as_deref())
}
