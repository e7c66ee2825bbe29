use std::fmt::Debug;

/// Errors surfaced by `resolve` and `require` across the store family.
///
/// Exploratory accessors (`get`, `contains_key`, `json`, `array`) never
/// produce these; absence and failed narrowing degrade to `None`/`false`
/// there. `resolve` and `require` are the "must exist" surface, and every
/// failure is returned to the caller — nothing is logged or swallowed on
/// the way up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// One or more required keys were absent at the moment of the call.
    ///
    /// `require` reports every missing key from the requested set, not
    /// just the first.
    #[error("missing required keys: [{}]", .keys.join(", "))]
    MissingKeys {
        /// The missing keys, rendered with their `Debug` form.
        keys: Vec<String>,
    },

    /// A key was present, but the stored value could not be narrowed to
    /// the requested type.
    #[error("invalid type: expected `{expected}`, found {actual}")]
    InvalidType {
        /// The requested type, as reported by `std::any::type_name`.
        expected: &'static str,
        /// A description of what actually occupies the slot: the stored
        /// type's name for type-erased slots, the value itself for JSON
        /// slots.
        actual: String,
    },
}

impl StoreError {
    pub(crate) fn missing_key<K: Debug>(key: &K) -> Self {
        StoreError::MissingKeys {
            keys: vec![format!("{:?}", key)],
        }
    }

    pub(crate) fn missing_keys<'a, K: Debug + 'a>(
        keys: impl IntoIterator<Item = &'a K>,
    ) -> Self {
        StoreError::MissingKeys {
            keys: keys.into_iter().map(|k| format!("{:?}", k)).collect(),
        }
    }

    pub(crate) fn invalid_type<T>(actual: impl Into<String>) -> Self {
        StoreError::InvalidType {
            expected: std::any::type_name::<T>(),
            actual: actual.into(),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
