use std::any::{Any, TypeId};
use std::fmt;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};

/// Object-safe shim over `Eq + Hash + Debug`, so identifiers of different
/// concrete types can live in one map.
trait DynKey: Any + Send + Sync {
    fn dyn_eq(&self, other: &dyn DynKey) -> bool;
    fn dyn_hash(&self, state: &mut dyn Hasher);
    fn as_any(&self) -> &dyn Any;
    fn render(&self) -> String;
}

impl<T> DynKey for T
where
    T: Any + Eq + Hash + Debug + Send + Sync,
{
    fn dyn_eq(&self, other: &dyn DynKey) -> bool {
        match other.as_any().downcast_ref::<T>() {
            Some(other) => self == other,
            None => false,
        }
    }

    // The concrete TypeId participates in the hash, matching dyn_eq:
    // identity is (type, value), not value alone.
    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<T>().hash(&mut state);
        self.hash(&mut state);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn render(&self) -> String {
        format!("{:?}", self)
    }
}

/// A registry identifier erased down to `Eq + Hash`.
///
/// The [`Registry`](crate::Registry) accepts any hashable identifier — a
/// string, a domain enum, a tuple — by erasing it into a `RegistryKey`.
/// Two keys are equal only when their concrete types match *and* the
/// values compare equal; `Mode::A` and `"A"` can never collide.
///
/// Both string forms normalize to one representation, so a store
/// registered under `"cache"` is found under `String::from("cache")` and
/// vice versa.
///
/// # Examples
///
/// ```
/// use sovran_store::RegistryKey;
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// enum Subsystem {
///     Analytics,
/// }
///
/// let by_name = RegistryKey::from("analytics");
/// let by_enum = RegistryKey::new(Subsystem::Analytics);
/// assert_ne!(by_name, by_enum);
/// assert_eq!(by_name, RegistryKey::from("analytics".to_string()));
/// ```
pub struct RegistryKey(Box<dyn DynKey>);

impl RegistryKey {
    /// Erase an arbitrary hashable identifier into a `RegistryKey`.
    pub fn new<T>(key: T) -> Self
    where
        T: Any + Eq + Hash + Debug + Send + Sync,
    {
        Self(Box::new(key))
    }
}

impl PartialEq for RegistryKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.dyn_eq(other.0.as_ref())
    }
}

impl Eq for RegistryKey {}

impl Hash for RegistryKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.dyn_hash(state);
    }
}

impl fmt::Debug for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.render())
    }
}

impl From<&str> for RegistryKey {
    fn from(key: &str) -> Self {
        Self::new(key.to_string())
    }
}

impl From<String> for RegistryKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}
