use sovran_store::{Store, StoreAccess, StoreError};
use std::collections::HashMap;

#[test]
fn test_basic_operations() {
    let store = Store::<String, i32>::new();

    // Test empty state
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);

    // Test insertion and retrieval
    store.set("test".to_string(), 42);
    assert_eq!(store.get(&"test".to_string()), Some(42));

    // Test contains_key
    assert!(store.contains_key(&"test".to_string()));
    assert!(!store.contains_key(&"nope".to_string()));

    // Test removal
    assert!(store.remove(&"test".to_string()));
    assert!(!store.remove(&"test".to_string()));
    assert!(store.is_empty());
}

#[test]
fn test_set_replaces_existing_value() {
    let store = Store::<String, i32>::new();

    store.set("key".to_string(), 1);
    store.set("key".to_string(), 2);

    assert_eq!(store.get(&"key".to_string()), Some(2));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_remove_absent_key_is_a_noop() {
    let store = Store::<String, i32>::new();
    store.set("keep".to_string(), 1);

    assert!(!store.remove(&"nope".to_string()));

    // The store is observably unchanged
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&"keep".to_string()), Some(1));
}

#[test]
fn test_with_entries_seeds_the_store() {
    let mut seed = HashMap::new();
    seed.insert("a".to_string(), 1);
    seed.insert("b".to_string(), 2);

    let store = Store::with_entries(seed);
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(&"a".to_string()), Some(1));
    assert_eq!(store.get(&"b".to_string()), Some(2));
}

#[test]
fn test_resolve_reports_missing_key() {
    let store = Store::<String, i32>::new();

    match store.resolve(&"absent".to_string()) {
        Err(StoreError::MissingKeys { keys }) => {
            assert_eq!(keys, vec![format!("{:?}", "absent")]);
        }
        other => panic!("expected MissingKeys, got {:?}", other),
    }

    store.set("present".to_string(), 7);
    assert_eq!(store.resolve(&"present".to_string()), Ok(7));
}

#[test]
fn test_require_reports_every_missing_key() {
    let store = Store::<String, i32>::new();
    store.set("have".to_string(), 1);

    let wanted = ["have".to_string(), "m1".to_string(), "m2".to_string()];
    match store.require(&wanted) {
        Err(StoreError::MissingKeys { keys }) => {
            assert_eq!(keys.len(), 2);
            assert!(keys.contains(&format!("{:?}", "m1")));
            assert!(keys.contains(&format!("{:?}", "m2")));
        }
        other => panic!("expected MissingKeys, got {:?}", other),
    }
}

#[test]
fn test_require_chains_on_success() -> Result<(), StoreError> {
    let store = Store::<String, i32>::new();
    store.set("a".to_string(), 1);
    store.set("b".to_string(), 2);

    let value = store
        .require(&["a".to_string(), "b".to_string()])?
        .resolve(&"b".to_string())?;
    assert_eq!(value, 2);

    let value = store.require_key(&"a".to_string())?.resolve(&"a".to_string())?;
    assert_eq!(value, 1);

    Ok(())
}

#[test]
fn test_set_opt_none_removes() {
    let store = Store::<String, i32>::new();

    store.set("key".to_string(), 42);
    store.set_opt("key".to_string(), None);
    assert!(!store.contains_key(&"key".to_string()));

    // Setting None for an absent key stays a no-op
    store.set_opt("other".to_string(), None);
    assert!(!store.contains_key(&"other".to_string()));

    store.set_opt("key".to_string(), Some(7));
    assert_eq!(store.get(&"key".to_string()), Some(7));
}

#[test]
fn test_with_and_with_mut() -> Result<(), StoreError> {
    let store = Store::<String, Vec<i32>>::new();
    store.set("numbers".to_string(), vec![1, 2, 3]);

    // Read without cloning
    let length = store.with(&"numbers".to_string(), |v| v.len())?;
    assert_eq!(length, 3);

    // Modify in place
    let new_len = store.with_mut(&"numbers".to_string(), |v| {
        v.push(4);
        v.len()
    })?;
    assert_eq!(new_len, 4);
    assert_eq!(store.get(&"numbers".to_string()), Some(vec![1, 2, 3, 4]));

    // Key not found on both paths
    let err = store.with(&"nope".to_string(), |_: &Vec<i32>| ());
    assert!(matches!(err, Err(StoreError::MissingKeys { .. })));
    let err = store.with_mut(&"nope".to_string(), |_: &mut Vec<i32>| ());
    assert!(matches!(err, Err(StoreError::MissingKeys { .. })));

    Ok(())
}

#[test]
fn test_apply_visits_every_entry() -> Result<(), StoreError> {
    let store = Store::<String, i32>::new();
    store.set("one".to_string(), 1);
    store.set("two".to_string(), 2);

    let mut seen = Vec::new();
    store.apply(|key, value| {
        seen.push((key.clone(), *value));
        Ok(())
    })?;

    seen.sort();
    assert_eq!(
        seen,
        vec![("one".to_string(), 1), ("two".to_string(), 2)]
    );

    // Errors from the closure propagate
    let err = store.apply(|_, _| {
        Err(StoreError::MissingKeys {
            keys: vec!["sentinel".to_string()],
        })
    });
    assert!(matches!(err, Err(StoreError::MissingKeys { .. })));

    Ok(())
}

#[test]
fn test_keys_values_entries_snapshots() {
    let store = Store::<String, i32>::new();
    store.set("one".to_string(), 1);
    store.set("two".to_string(), 2);
    store.set("three".to_string(), 3);

    let mut keys = store.keys();
    let mut values = store.values();
    keys.sort();
    values.sort();

    let mut expected_keys = vec!["one", "three", "two"];
    expected_keys.sort();
    assert_eq!(keys, expected_keys);
    assert_eq!(values, vec![1, 2, 3]);

    let entries = store.entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries["two"], 2);

    // The snapshot is detached from the live store
    store.set("four".to_string(), 4);
    assert_eq!(entries.len(), 3);
}

#[test]
fn test_clone_shares_state() {
    let store = Store::<String, i32>::new();
    let cloned = store.clone();

    store.set("test".to_string(), 42);
    assert_eq!(cloned.get(&"test".to_string()), Some(42));

    cloned.remove(&"test".to_string());
    assert!(!store.contains_key(&"test".to_string()));
}

#[test]
fn test_thread_safety() {
    use std::sync::Arc;
    use std::thread;

    let store = Arc::new(Store::<String, i32>::new());
    store.set("counter".to_string(), 0);

    let mut handles = vec![];
    for _ in 0..10 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                store
                    .with_mut(&"counter".to_string(), |counter| *counter += 1)
                    .unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // 10 threads * 100 in-place increments, each atomic under the lock
    assert_eq!(store.get(&"counter".to_string()), Some(1000));
}

#[test]
fn test_custom_key_types() {
    let store = Store::<i32, String>::new();
    store.set(1, "one".to_string());
    store.set(2, "two".to_string());
    assert_eq!(store.get(&1).as_deref(), Some("one"));

    let store = Store::<(i32, i32), String>::new();
    store.set((1, 2), "point".to_string());
    assert_eq!(store.get(&(1, 2)).as_deref(), Some("point"));
}

#[test]
fn test_default_implementation() {
    let store: Store<String, i32> = Default::default();
    assert!(store.is_empty());

    store.set("test".to_string(), 42);
    assert_eq!(store.get(&"test".to_string()), Some(42));
}

#[test]
fn test_error_display() {
    let missing = StoreError::MissingKeys {
        keys: vec!["\"a\"".to_string(), "\"b\"".to_string()],
    };
    assert_eq!(
        format!("{}", missing),
        "missing required keys: [\"a\", \"b\"]"
    );

    let invalid = StoreError::InvalidType {
        expected: "i32",
        actual: "alloc::string::String".to_string(),
    };
    assert_eq!(
        format!("{}", invalid),
        "invalid type: expected `i32`, found alloc::string::String"
    );

    assert!(format!("{:?}", missing).contains("MissingKeys"));
}

#[test]
fn test_debug_format() {
    let store = Store::<String, i32>::new();
    store.set("x".to_string(), 1);
    let debug = format!("{:?}", store);
    assert!(debug.contains("Store"));
    assert!(debug.contains("entry_count"));
}
