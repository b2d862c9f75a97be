//! Field-level fallbacks for reading saved state. A field with the wrong
//! shape takes its default and is logged instead of failing the record.

use log::warn;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Either a well-formed `T` or anything else.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum Lenient<T> {
    Valid(T),
    Invalid(IgnoredAny),
}

impl<T> Lenient<T> {
    pub(crate) fn ok(self) -> Option<T> {
        match self {
            Lenient::Valid(value) => Some(value),
            Lenient::Invalid(_) => None,
        }
    }
}

/// Read a `T`, or log and use `fallback()` when the stored value has another
/// shape.
pub(crate) fn or_else<'de, D, T>(
    deserializer: D,
    field: &str,
    fallback: impl FnOnce() -> T,
) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Lenient::<T>::deserialize(deserializer)?
        .ok()
        .unwrap_or_else(|| {
            warn!("event=field_fallback module=model field={field}");
            fallback()
        }))
}
