use crate::any_key::RegistryKey;
use crate::any_value::AnyValue;
use crate::error::{StoreError, StoreResult};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

/// A named collection of type-erased stores.
///
/// The process-wide instance ([`Registry::global`]) lets independently
/// compiled modules share stores by identifier without holding references
/// to each other: one side [`set`](Registry::set)s a store under a name,
/// the other side [`get`](Registry::get)s it back and narrows to the
/// concrete store type it expects. Identifiers are [`RegistryKey`]s — any
/// hashable value works.
///
/// Every call is individually atomic under the registry's lock, but call
/// *sequences* are not: a `get`-then-`set` that replaces an entry based on
/// what was read can race with a concurrent writer, and the last `set`
/// wins. That window only concerns replacing whole entries — the stores
/// themselves are shared-state handles, so mutating a store through any
/// handle is serialized by that store's own lock, not the registry's.
///
/// # Examples
///
/// ```
/// use sovran_store::{Cache, Registry};
///
/// let sessions = Cache::<String>::new();
/// sessions.set("user".to_string(), 42u64);
/// Registry::global().set("sessions", sessions);
///
/// // Elsewhere, without a reference to the publisher:
/// let sessions = Registry::global().get::<Cache<String>>("sessions").unwrap();
/// assert_eq!(sessions.get::<u64>(&"user".to_string()), Some(42));
/// ```
pub struct Registry {
    stores: Mutex<HashMap<RegistryKey, AnyValue>>,
}

impl Registry {
    /// Creates a fresh, empty registry.
    ///
    /// Useful for tests and for scoping a registry to a subsystem; most
    /// callers want [`Registry::global`].
    pub fn new() -> Self {
        Self {
            stores: Mutex::new(HashMap::new()),
        }
    }

    /// The process-wide registry, created empty on first use and alive
    /// until process exit.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::new)
    }

    // See Store::lock: single-step mutations keep the map coherent even
    // through a poisoned guard.
    fn lock(&self) -> MutexGuard<'_, HashMap<RegistryKey, AnyValue>> {
        self.stores.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` if a store is registered under `id`.
    pub fn contains_key(&self, id: impl Into<RegistryKey>) -> bool {
        self.lock().contains_key(&id.into())
    }

    /// Returns a handle to the store registered under `id`, narrowed to
    /// `S`.
    ///
    /// `None` means no entry exists *or* the registered store is not an
    /// `S`; the exploratory path does not distinguish the two. The
    /// returned handle shares state with the registered one.
    pub fn get<S: Any + Send + Sync + Clone>(&self, id: impl Into<RegistryKey>) -> Option<S> {
        self.lock()
            .get(&id.into())
            .and_then(|store| store.downcast_ref::<S>())
            .cloned()
    }

    /// Returns the store registered under `id` narrowed to `S`, or an
    /// error describing exactly what went wrong.
    ///
    /// # Errors
    ///
    /// - [`StoreError::MissingKeys`] if nothing is registered under `id`.
    /// - [`StoreError::InvalidType`] if the registered store is not an
    ///   `S`.
    pub fn resolve<S: Any + Send + Sync + Clone>(
        &self,
        id: impl Into<RegistryKey>,
    ) -> StoreResult<S> {
        let id = id.into();
        let stores = self.lock();
        let store = stores.get(&id).ok_or_else(|| StoreError::missing_key(&id))?;
        store
            .downcast_ref::<S>()
            .cloned()
            .ok_or_else(|| StoreError::invalid_type::<S>(store.type_name()))
    }

    /// Registers `store` under `id`, replacing any previous entry
    /// unconditionally.
    ///
    /// The value is type-erased on the way in; no behavioral bound is
    /// asked of it beyond `Any + Send + Sync`.
    pub fn set<S: Any + Send + Sync>(&self, id: impl Into<RegistryKey>, store: S) {
        let id = id.into();
        tracing::trace!(id = ?id, store = std::any::type_name::<S>(), "registering store");
        self.lock().insert(id, AnyValue::new(store));
    }

    /// The number of registered stores.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("store_count", &self.len())
            .finish()
    }
}
