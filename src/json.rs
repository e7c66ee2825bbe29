use crate::error::{StoreError, StoreResult};
use crate::traits::StoreAccess;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A thread-safe store over the fields of a parsed JSON object, keyed by a
/// finite key enumeration.
///
/// A `JsonView` is built by decoding a byte buffer as a JSON object and
/// retaining only the top-level fields whose name matches a member of `K`.
/// Matching goes through serde: a field matches iff `K` deserializes from
/// the field-name string, which a unit-variant enum gets directly from
/// `#[derive(Deserialize)]` (plus `#[serde(rename_all = "...")]` when the
/// wire casing differs). Fields with no matching key are silently dropped;
/// the view never holds a field outside `K`'s value set.
///
/// Values are raw decoded JSON ([`serde_json::Value`]); typed reads narrow
/// through deserialization at the call site. Descending into a nested
/// object or array is done by naming a *different* key enumeration for the
/// sub-tree via [`json`](JsonView::json) / [`array`](JsonView::array) —
/// there is no path addressing. Each level is built from its own copy of
/// the sub-tree, so parent and child views share no storage.
///
/// # Examples
///
/// ```
/// use serde::Deserialize;
/// use sovran_store::{JsonView, StoreAccess};
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
/// #[serde(rename_all = "snake_case")]
/// enum ProfileKey {
///     Name,
///     Age,
/// }
///
/// let view = JsonView::<ProfileKey>::from_slice(
///     br#"{ "name": "ripley", "age": 42, "unmodeled": true }"#,
/// );
///
/// assert_eq!(view.resolve::<String>(&ProfileKey::Name).unwrap(), "ripley");
/// assert_eq!(view.get::<u32>(&ProfileKey::Age), Some(42));
/// assert_eq!(view.len(), 2); // "unmodeled" was dropped
/// ```
pub struct JsonView<K> {
    entries: Arc<Mutex<HashMap<K, Value>>>,
}

impl<K> JsonView<K>
where
    K: DeserializeOwned + Clone + Eq + Hash + Debug,
{
    /// Creates an empty view.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Parses `bytes` as a JSON object and builds a view of its matching
    /// fields.
    ///
    /// Construction never fails visibly: input that does not parse, or
    /// parses to something other than an object, yields an empty view.
    /// This favors handing the caller a (possibly empty) view over
    /// halting.
    pub fn from_slice(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(fields)) => Self::from_fields(fields),
            Ok(other) => {
                tracing::debug!(found = %json_kind(&other), "expected a JSON object, yielding empty view");
                Self::new()
            }
            Err(err) => {
                tracing::debug!(error = %err, "unparseable JSON payload, yielding empty view");
                Self::new()
            }
        }
    }

    /// Parses `bytes` as a JSON array of objects and builds one view per
    /// object element.
    ///
    /// Non-object elements are dropped. Input that does not parse, or
    /// parses to something other than an array, yields an empty vec.
    pub fn array_from_slice(bytes: &[u8]) -> Vec<Self> {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Array(items)) => {
                items.into_iter().filter_map(Self::of_value).collect()
            }
            Ok(other) => {
                tracing::debug!(found = %json_kind(&other), "expected a JSON array, yielding no views");
                Vec::new()
            }
            Err(err) => {
                tracing::debug!(error = %err, "unparseable JSON payload, yielding no views");
                Vec::new()
            }
        }
    }

    /// Builds a view from an already-decoded value, if it is an object.
    fn of_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self::from_fields(fields)),
            _ => None,
        }
    }

    fn from_fields(fields: serde_json::Map<String, Value>) -> Self {
        let entries = fields
            .into_iter()
            .filter_map(|(name, value)| {
                let key = serde_json::from_value::<K>(Value::String(name)).ok()?;
                Some((key, value))
            })
            .collect();
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    // See Store::lock: single-step mutations keep the map coherent even
    // through a poisoned guard.
    fn lock(&self) -> MutexGuard<'_, HashMap<K, Value>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the stored JSON value narrowed to `T`.
    ///
    /// `None` means the key is absent *or* the value does not deserialize
    /// as `T`; the exploratory path does not distinguish the two.
    pub fn get<T: DeserializeOwned>(&self, key: &K) -> Option<T> {
        self.lock()
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Returns the stored JSON value narrowed to `T`, or an error
    /// describing exactly what went wrong.
    ///
    /// # Errors
    ///
    /// - [`StoreError::MissingKeys`] if `key` is absent.
    /// - [`StoreError::InvalidType`] if the value does not deserialize as
    ///   `T`; carries the requested type and the offending JSON value.
    pub fn resolve<T: DeserializeOwned>(&self, key: &K) -> StoreResult<T> {
        let entries = self.lock();
        let value = entries
            .get(key)
            .ok_or_else(|| StoreError::missing_key(key))?;
        serde_json::from_value(value.clone())
            .map_err(|_| StoreError::invalid_type::<T>(value.to_string()))
    }

    /// Unconditional upsert: stores `value` as raw JSON, replacing any
    /// existing entry for `key`.
    ///
    /// JSON `null` is a legitimate stored value here; it narrows to
    /// `Option<T>` as `None` and fails narrowing to bare `T`.
    pub fn set(&self, key: K, value: impl Into<Value>) {
        self.lock().insert(key, value.into());
    }

    /// The subset of entries whose value narrows to `T`, with their keys.
    ///
    /// This is a filter, not a validation: entries that do not deserialize
    /// as `T` are silently excluded.
    pub fn values_of<T: DeserializeOwned>(&self) -> HashMap<K, T> {
        self.lock()
            .iter()
            .filter_map(|(key, value)| {
                let narrowed = serde_json::from_value(value.clone()).ok()?;
                Some((key.clone(), narrowed))
            })
            .collect()
    }

    /// Reinterprets the object at `key` as a new view keyed by `K2`.
    ///
    /// Returns `None` if the key is absent or the entry is not a JSON
    /// object. The child view is built from its own copy of the sub-tree;
    /// mutating it never affects this view's entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde::Deserialize;
    /// use sovran_store::JsonView;
    ///
    /// #[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
    /// #[serde(rename_all = "snake_case")]
    /// enum UserKey { Name, Address }
    ///
    /// #[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
    /// #[serde(rename_all = "snake_case")]
    /// enum AddressKey { City }
    ///
    /// let view = JsonView::<UserKey>::from_slice(
    ///     br#"{ "name": "ripley", "address": { "city": "Portland" } }"#,
    /// );
    ///
    /// let address = view.json::<AddressKey>(&UserKey::Address).unwrap();
    /// assert_eq!(address.resolve::<String>(&AddressKey::City).unwrap(), "Portland");
    /// ```
    pub fn json<K2>(&self, key: &K) -> Option<JsonView<K2>>
    where
        K2: DeserializeOwned + Clone + Eq + Hash + Debug,
    {
        let entries = self.lock();
        let value = entries.get(key)?.clone();
        drop(entries);
        JsonView::<K2>::of_value(value)
    }

    /// Reinterprets the array of objects at `key` as a sequence of views
    /// keyed by `K2`.
    ///
    /// Returns `None` if the key is absent or the entry is not a JSON
    /// array. Non-object elements are dropped, exactly as in
    /// [`array_from_slice`](JsonView::array_from_slice).
    pub fn array<K2>(&self, key: &K) -> Option<Vec<JsonView<K2>>>
    where
        K2: DeserializeOwned + Clone + Eq + Hash + Debug,
    {
        let entries = self.lock();
        let items = match entries.get(key)? {
            Value::Array(items) => items.clone(),
            _ => return None,
        };
        drop(entries);
        Some(items.into_iter().filter_map(JsonView::<K2>::of_value).collect())
    }
}

impl<K> StoreAccess<K> for JsonView<K>
where
    K: DeserializeOwned + Clone + Eq + Hash + Debug,
{
    fn contains_key(&self, key: &K) -> bool {
        self.lock().contains_key(key)
    }

    fn remove(&self, key: &K) -> bool {
        self.lock().remove(key).is_some()
    }

    fn require(&self, keys: &[K]) -> StoreResult<&Self> {
        let entries = self.lock();
        let missing: Vec<&K> = keys.iter().filter(|k| !entries.contains_key(*k)).collect();
        if missing.is_empty() {
            Ok(self)
        } else {
            Err(StoreError::missing_keys(missing))
        }
    }

    fn keys(&self) -> Vec<K> {
        self.lock().keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

impl<K> Clone for JsonView<K> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<K> Default for JsonView<K>
where
    K: DeserializeOwned + Clone + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for JsonView<K>
where
    K: DeserializeOwned + Clone + Eq + Hash + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonView")
            .field("entry_count", &self.len())
            .finish()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
