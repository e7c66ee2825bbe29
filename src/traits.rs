use crate::error::StoreResult;

/// The capability shared by every store in this crate.
///
/// `Store`, `Cache`, and `JsonView` each implement this contract
/// independently: membership tests, removal, and batch requirement checks.
/// Typed access (`get`, `resolve`, `values_of`) stays on the concrete
/// types, because what "narrowing" means differs per store — a runtime
/// downcast for type-erased slots, deserialization for JSON slots.
///
/// # Examples
///
/// ```
/// use sovran_store::{Store, StoreAccess, StoreError};
///
/// fn audit<K, S>(store: &S, required: &[K]) -> Result<usize, StoreError>
/// where
///     S: StoreAccess<K>,
/// {
///     // Chain: all required keys must be present before we report size.
///     Ok(store.require(required)?.len())
/// }
///
/// let store = Store::<String, i32>::new();
/// store.set("a".to_string(), 1);
/// assert_eq!(audit(&store, &["a".to_string()]).unwrap(), 1);
/// assert!(audit(&store, &["b".to_string()]).is_err());
/// ```
pub trait StoreAccess<K> {
    /// Returns `true` if the store currently holds a value for `key`.
    fn contains_key(&self, key: &K) -> bool;

    /// Deletes the entry if present. Removing an absent key is a no-op.
    ///
    /// Returns `true` if the key was present and removed.
    fn remove(&self, key: &K) -> bool;

    /// Checks that every key in `keys` is present, under a single lock
    /// acquisition.
    ///
    /// On success returns `self`, so the check chains into a subsequent
    /// access. On failure returns [`StoreError::MissingKeys`] listing
    /// every absent key — a batch check, not first-failure.
    ///
    /// [`StoreError::MissingKeys`]: crate::StoreError::MissingKeys
    fn require(&self, keys: &[K]) -> StoreResult<&Self>;

    /// Convenience for [`require`](Self::require) with a single key.
    fn require_key(&self, key: &K) -> StoreResult<&Self> {
        self.require(std::slice::from_ref(key))
    }

    /// A snapshot of all keys currently in the store.
    fn keys(&self) -> Vec<K>;

    /// The number of entries in the store.
    fn len(&self) -> usize;

    /// Returns `true` if the store contains no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
