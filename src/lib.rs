//! # sovran-store
//!
//! A thread-safe key/value store family with type-erased storage, JSON
//! views keyed by strongly-typed key sets, and a process-wide registry of
//! named stores.
//!
//! Three stores share one contract ([`StoreAccess`]) and one failure
//! taxonomy ([`StoreError`]):
//!
//! - [`Store<K, V>`](Store) — homogeneous: every value is a `V`.
//! - [`Cache<K>`](Cache) — heterogeneous: values are type-erased and
//!   narrowed back to concrete types at the call site.
//! - [`JsonView<K>`](JsonView) — values are raw decoded JSON, parsed from
//!   a byte buffer and filtered against a key enumeration.
//!
//! Each store owns one mutex; every operation acquires it, runs to
//! completion, and releases it. Stores are `Clone`, and clones share
//! state — handing a clone to another thread or publishing it in the
//! [`Registry`] shares the underlying map, not a copy.
//!
//! ## Exploratory vs. required access
//!
//! `get`/`contains_key` never fail: absence and failed narrowing both come
//! back as `None`/`false`. `resolve`/`require` surface failures as
//! [`StoreError`] values carrying the missing keys or the
//! expected/actual type pair. Pick per call site; there is no implicit
//! default substitution on either path.
//!
//! ## Basic usage
//!
//! ```rust
//! use sovran_store::{Cache, StoreAccess, StoreError};
//!
//! let cache = Cache::<String>::new();
//!
//! // Store values of different types
//! cache.set("number".to_string(), 42i32);
//! cache.set("text".to_string(), "Hello, world!".to_string());
//! cache.set("data".to_string(), vec![1, 2, 3, 4, 5]);
//!
//! // Retrieve them in a type-safe way
//! assert_eq!(cache.get::<i32>(&"number".to_string()), Some(42));
//! assert_eq!(cache.get::<bool>(&"number".to_string()), None); // wrong type
//!
//! // Or demand presence and type, with a diagnostic on failure
//! match cache.resolve::<bool>(&"number".to_string()) {
//!     Ok(value) => println!("Value: {}", value),
//!     Err(StoreError::MissingKeys { keys }) => println!("Absent: {:?}", keys),
//!     Err(StoreError::InvalidType { expected, actual }) => {
//!         println!("Wanted {}, slot holds {}", expected, actual)
//!     }
//! }
//!
//! // Batch-require keys before a sequence of reads
//! let report = cache
//!     .require(&["number".to_string(), "text".to_string()])
//!     .map(|c| c.values_of::<i32>());
//! assert_eq!(report.unwrap().len(), 1);
//! ```
//!
//! ## Navigating JSON by key enumerations
//!
//! A [`JsonView`] decodes a byte buffer and keeps only the fields its key
//! enumeration names. Nested objects are entered by naming a different key
//! enumeration for the sub-tree — each level re-keys the level below it,
//! and there is no path syntax:
//!
//! ```rust
//! use serde::Deserialize;
//! use sovran_store::JsonView;
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
//! #[serde(rename_all = "snake_case")]
//! enum UserKey { Name, Address }
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
//! #[serde(rename_all = "snake_case")]
//! enum AddressKey { City, Zip }
//!
//! let payload = br#"{
//!     "name": "ripley",
//!     "address": { "city": "Portland", "zip": "97201" },
//!     "ignored": true
//! }"#;
//!
//! let user = JsonView::<UserKey>::from_slice(payload);
//! assert_eq!(user.resolve::<String>(&UserKey::Name).unwrap(), "ripley");
//!
//! let address = user.json::<AddressKey>(&UserKey::Address).unwrap();
//! assert_eq!(address.get::<String>(&AddressKey::Zip).as_deref(), Some("97201"));
//! ```
//!
//! ## Sharing stores between components
//!
//! The [`Registry`] is a process-wide map from arbitrary hashable
//! identifiers to type-erased stores. Publishers and consumers only need
//! to agree on the identifier and the concrete store type:
//!
//! ```rust
//! use sovran_store::{Registry, Store};
//!
//! fn publisher() {
//!     let limits = Store::<String, u32>::new();
//!     limits.set("max_connections".to_string(), 100);
//!     Registry::global().set("limits", limits);
//! }
//!
//! fn consumer() -> Option<u32> {
//!     let limits = Registry::global().get::<Store<String, u32>>("limits")?;
//!     limits.get(&"max_connections".to_string())
//! }
//!
//! publisher();
//! assert_eq!(consumer(), Some(100));
//! ```
//!
//! Registry reads and writes are individually atomic; read-then-write
//! sequences are not. See [`Registry`] for the exact contract.

mod any_key;
mod any_value;
mod cache;
mod error;
mod json;
mod registry;
mod store;
mod traits;

pub use any_key::RegistryKey;
pub use any_value::AnyValue;
pub use cache::Cache;
pub use error::{StoreError, StoreResult};
pub use json::JsonView;
pub use registry::Registry;
pub use store::Store;
pub use traits::StoreAccess;

// Re-exports for convenience: the downcast machinery and the raw JSON
// value type callers narrow from.
pub use serde_json::Value;
pub use std::any::{Any, TypeId};
