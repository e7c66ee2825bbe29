use crate::error::{StoreError, StoreResult};
use crate::traits::StoreAccess;
use std::collections::HashMap;
use std::fmt;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A thread-safe map from `K` to values of a single type `V`.
///
/// `Store` is the homogeneous member of the family: every value has the
/// same type, so reads need no narrowing and `resolve` can only fail with
/// missing keys. For heterogeneous storage see [`Cache`](crate::Cache);
/// for JSON-backed storage see [`JsonView`](crate::JsonView).
///
/// All entries live behind one mutex; every operation acquires it, runs to
/// completion, and releases it. Cloning a `Store` clones the handle, not
/// the map — clones observe and mutate the same entries.
///
/// # Examples
///
/// ```
/// use sovran_store::Store;
///
/// let store = Store::<String, i32>::new();
/// store.set("visits".to_string(), 1);
///
/// assert_eq!(store.get(&"visits".to_string()), Some(1));
/// assert_eq!(store.get(&"missing".to_string()), None);
///
/// // Modify in place without replacing the value
/// store.with_mut(&"visits".to_string(), |v| *v += 1).unwrap();
/// assert_eq!(store.get(&"visits".to_string()), Some(2));
/// ```
pub struct Store<K, V> {
    entries: Arc<Mutex<HashMap<K, V>>>,
}

impl<K, V> Store<K, V>
where
    K: Clone + Eq + Hash + Debug,
    V: Send + Sync,
{
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Creates a store seeded with an initial mapping.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use sovran_store::Store;
    ///
    /// let mut seed = HashMap::new();
    /// seed.insert("a".to_string(), 1);
    /// let store = Store::with_entries(seed);
    /// assert_eq!(store.get(&"a".to_string()), Some(1));
    /// ```
    pub fn with_entries(entries: HashMap<K, V>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    // No operation can leave the map partially written, so a poisoned
    // guard still protects a coherent map. Recover it.
    fn lock(&self) -> MutexGuard<'_, HashMap<K, V>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a clone of the stored value, or `None` if the key is
    /// absent.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.lock().get(key).cloned()
    }

    /// Returns the stored value, or [`StoreError::MissingKeys`] naming
    /// `key` if it is absent.
    pub fn resolve(&self, key: &K) -> StoreResult<V>
    where
        V: Clone,
    {
        self.lock()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::missing_key(key))
    }

    /// Unconditional upsert: stores `value`, replacing any existing entry
    /// for `key`.
    pub fn set(&self, key: K, value: V) {
        self.lock().insert(key, value);
    }

    /// Stores `Some(value)`, or removes the entry on `None`.
    ///
    /// Absence is the canonical representation of "no value": an empty
    /// optional is never stored as a distinct entry, so a later `get`
    /// reports `None` and `contains_key` reports `false`.
    pub fn set_opt(&self, key: K, value: Option<V>) {
        match value {
            Some(value) => self.set(key, value),
            None => {
                self.remove(&key);
            }
        }
    }

    /// Gets a value by executing a closure with read access.
    ///
    /// Useful for inspecting values or computing derived values without
    /// requiring `V: Clone`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_store::Store;
    ///
    /// let store = Store::<String, Vec<i32>>::new();
    /// store.set("numbers".to_string(), vec![1, 2, 3]);
    ///
    /// let len = store.with(&"numbers".to_string(), |v| v.len()).unwrap();
    /// assert_eq!(len, 3);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingKeys`] if the key doesn't exist.
    pub fn with<F, R>(&self, key: &K, f: F) -> StoreResult<R>
    where
        F: FnOnce(&V) -> R,
    {
        let entries = self.lock();
        let value = entries
            .get(key)
            .ok_or_else(|| StoreError::missing_key(key))?;
        Ok(f(value))
    }

    /// Gets a value by executing a closure with write access.
    ///
    /// The closure runs while the store's lock is held, so the
    /// modification is atomic with respect to every other operation on
    /// this store.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_store::Store;
    ///
    /// let store = Store::<String, Vec<i32>>::new();
    /// store.set("numbers".to_string(), vec![1, 2, 3]);
    ///
    /// store.with_mut(&"numbers".to_string(), |v| v.push(4)).unwrap();
    /// assert_eq!(store.get(&"numbers".to_string()), Some(vec![1, 2, 3, 4]));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingKeys`] if the key doesn't exist.
    pub fn with_mut<F, R>(&self, key: &K, f: F) -> StoreResult<R>
    where
        F: FnOnce(&mut V) -> R,
    {
        let mut entries = self.lock();
        let value = entries
            .get_mut(key)
            .ok_or_else(|| StoreError::missing_key(key))?;
        Ok(f(value))
    }

    /// Applies a function to all key-value pairs in the store.
    ///
    /// The lock is held for the whole iteration; the first error returned
    /// by `f` stops it.
    pub fn apply<F>(&self, mut f: F) -> StoreResult<()>
    where
        F: FnMut(&K, &V) -> StoreResult<()>,
    {
        let entries = self.lock();
        for (key, value) in entries.iter() {
            f(key, value)?;
        }
        Ok(())
    }

    /// A snapshot of all values currently in the store.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.lock().values().cloned().collect()
    }

    /// A snapshot of the full mapping.
    pub fn entries(&self) -> HashMap<K, V>
    where
        V: Clone,
    {
        self.lock().clone()
    }
}

impl<K, V> StoreAccess<K> for Store<K, V>
where
    K: Clone + Eq + Hash + Debug,
    V: Send + Sync,
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

impl<K, V> Clone for Store<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<K, V> Default for Store<K, V>
where
    K: Clone + Eq + Hash + Debug,
    V: Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for Store<K, V>
where
    K: Clone + Eq + Hash + Debug,
    V: Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("entry_count", &self.len())
            .finish()
    }
}
