use crate::any_value::AnyValue;
use crate::error::{StoreError, StoreResult};
use crate::traits::StoreAccess;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A thread-safe map from `K` to values of *any* type.
///
/// `Cache` is the fully heterogeneous member of the family: each entry
/// holds an [`AnyValue`], and reads narrow back to a concrete type at the
/// call site. A request for the wrong type is not an error on the `get`
/// path — it yields `None`, exactly like an absent key. Callers that need
/// the mismatch surfaced use [`resolve`](Cache::resolve).
///
/// Despite the name there is no eviction and no capacity bound; a `Cache`
/// is a lock-protected mapping that grows until entries are removed.
///
/// # Examples
///
/// ```
/// use sovran_store::Cache;
///
/// let cache = Cache::<String>::new();
/// cache.set("number".to_string(), 42i32);
/// cache.set("text".to_string(), "Hello, world!".to_string());
///
/// assert_eq!(cache.get::<i32>(&"number".to_string()), Some(42));
/// assert_eq!(cache.get::<String>(&"number".to_string()), None);
/// assert_eq!(
///     cache.get::<String>(&"text".to_string()).as_deref(),
///     Some("Hello, world!")
/// );
/// ```
pub struct Cache<K> {
    entries: Arc<Mutex<HashMap<K, AnyValue>>>,
}

impl<K> Cache<K>
where
    K: Clone + Eq + Hash + Debug,
{
    /// Creates a new, empty cache.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    // See Store::lock: single-step mutations keep the map coherent even
    // through a poisoned guard.
    fn lock(&self) -> MutexGuard<'_, HashMap<K, AnyValue>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Unconditional upsert: stores `value` type-erased, replacing any
    /// existing entry for `key` regardless of its previous type.
    pub fn set<T: Any + Send + Sync>(&self, key: K, value: T) {
        self.lock().insert(key, AnyValue::new(value));
    }

    /// Stores `Some(value)`, or removes the entry on `None`.
    ///
    /// Absence is the canonical representation of "no value" at the
    /// type-erasure boundary: an empty optional is never stored as a
    /// distinct runtime type, so no unwrap-on-read applies later.
    pub fn set_opt<T: Any + Send + Sync>(&self, key: K, value: Option<T>) {
        match value {
            Some(value) => self.set(key, value),
            None => {
                self.remove(&key);
            }
        }
    }

    /// Returns a clone of the stored value narrowed to `T`.
    ///
    /// `None` means the key is absent *or* the stored value is not a `T`;
    /// the exploratory path does not distinguish the two.
    pub fn get<T: Any + Send + Sync + Clone>(&self, key: &K) -> Option<T> {
        self.lock()
            .get(key)
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    /// Returns the stored value narrowed to `T`, or an error describing
    /// exactly what went wrong.
    ///
    /// # Errors
    ///
    /// - [`StoreError::MissingKeys`] if `key` is absent.
    /// - [`StoreError::InvalidType`] if the stored value is not a `T`;
    ///   carries the requested type and the name of the type actually
    ///   stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_store::{Cache, StoreError};
    ///
    /// let cache = Cache::<String>::new();
    /// cache.set("greeting".to_string(), "hello".to_string());
    ///
    /// assert_eq!(
    ///     cache.resolve::<String>(&"greeting".to_string()).as_deref(),
    ///     Ok("hello")
    /// );
    /// assert!(matches!(
    ///     cache.resolve::<i32>(&"greeting".to_string()),
    ///     Err(StoreError::InvalidType { .. })
    /// ));
    /// ```
    pub fn resolve<T: Any + Send + Sync + Clone>(&self, key: &K) -> StoreResult<T> {
        let entries = self.lock();
        let value = entries
            .get(key)
            .ok_or_else(|| StoreError::missing_key(key))?;
        value
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| StoreError::invalid_type::<T>(value.type_name()))
    }

    /// Accesses a value of type `T` with a read-only closure, without
    /// requiring `T: Clone`.
    ///
    /// # Errors
    ///
    /// Same contract as [`resolve`](Cache::resolve).
    pub fn with<T: Any, F, R>(&self, key: &K, f: F) -> StoreResult<R>
    where
        F: FnOnce(&T) -> R,
    {
        let entries = self.lock();
        let value = entries
            .get(key)
            .ok_or_else(|| StoreError::missing_key(key))?;
        match value.downcast_ref::<T>() {
            Some(concrete) => Ok(f(concrete)),
            None => Err(StoreError::invalid_type::<T>(value.type_name())),
        }
    }

    /// Accesses a value of type `T` with a read-write closure.
    ///
    /// The closure runs while the cache's lock is held, so the
    /// modification is atomic with respect to every other operation on
    /// this cache.
    ///
    /// # Errors
    ///
    /// Same contract as [`resolve`](Cache::resolve).
    pub fn with_mut<T: Any, F, R>(&self, key: &K, f: F) -> StoreResult<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut entries = self.lock();
        let value = entries
            .get_mut(key)
            .ok_or_else(|| StoreError::missing_key(key))?;
        let type_name = value.type_name();
        match value.downcast_mut::<T>() {
            Some(concrete) => Ok(f(concrete)),
            None => Err(StoreError::invalid_type::<T>(type_name)),
        }
    }

    /// The subset of entries whose value narrows to `T`, with their keys.
    ///
    /// This is a filter, not a validation: entries of other types are
    /// silently excluded.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_store::Cache;
    ///
    /// let cache = Cache::<&'static str>::new();
    /// cache.set("a", 1i32);
    /// cache.set("b", "x".to_string());
    /// cache.set("c", 2i32);
    ///
    /// let ints = cache.values_of::<i32>();
    /// assert_eq!(ints.len(), 2);
    /// assert_eq!(ints["a"], 1);
    /// assert_eq!(ints["c"], 2);
    /// ```
    pub fn values_of<T: Any + Send + Sync + Clone>(&self) -> HashMap<K, T> {
        self.lock()
            .iter()
            .filter_map(|(key, value)| {
                value
                    .downcast_ref::<T>()
                    .map(|concrete| (key.clone(), concrete.clone()))
            })
            .collect()
    }
}

impl<K> StoreAccess<K> for Cache<K>
where
    K: Clone + Eq + Hash + Debug,
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

impl<K> Clone for Cache<K> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<K> Default for Cache<K>
where
    K: Clone + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for Cache<K>
where
    K: Clone + Eq + Hash + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("entry_count", &self.len())
            .finish()
    }
}
