use serde::Deserialize;
use serde_json::{json, Value};
use sovran_store::{JsonView, StoreAccess, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ChannelKey {
    Name,
    Number,
    Bool,
    Address,
    Moderators,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
enum AddressKey {
    City,
    Zip,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ModeratorKey {
    Handle,
    Since,
}

fn channel_payload() -> Vec<u8> {
    serde_json::to_vec(&json!({
        "name": "Twitch",
        "number": 5,
        "bool": false,
        "address": { "city": "San Francisco", "zip": "94103" },
        "moderators": [
            { "handle": "ana", "since": 2019 },
            { "handle": "bo", "since": 2021 },
            "not-an-object"
        ],
        "unmodeled_field": "dropped"
    }))
    .unwrap()
}

#[test]
fn test_round_trip_through_bytes() -> Result<(), StoreError> {
    let view = JsonView::<ChannelKey>::from_slice(&channel_payload());

    assert_eq!(view.resolve::<String>(&ChannelKey::Name)?, "Twitch");
    assert_eq!(view.resolve::<i64>(&ChannelKey::Number)?, 5);
    assert!(!view.resolve::<bool>(&ChannelKey::Bool)?);

    Ok(())
}

#[test]
fn test_unmodeled_fields_are_dropped() {
    let view = JsonView::<ChannelKey>::from_slice(&channel_payload());

    // name, number, bool, address, moderators — not unmodeled_field
    assert_eq!(view.len(), 5);
    let keys = view.keys();
    assert!(keys.contains(&ChannelKey::Name));
    assert!(keys.contains(&ChannelKey::Moderators));
}

#[test]
fn test_absent_key_semantics() {
    let view = JsonView::<AddressKey>::from_slice(br#"{ "city": "Lisbon" }"#);

    assert_eq!(view.get::<String>(&AddressKey::Zip), None);
    assert!(!view.contains_key(&AddressKey::Zip));
    assert!(matches!(
        view.resolve::<String>(&AddressKey::Zip),
        Err(StoreError::MissingKeys { .. })
    ));
}

#[test]
fn test_type_mismatch_semantics() {
    let view = JsonView::<ChannelKey>::from_slice(&channel_payload());

    // "name" holds a string; narrowing to a number degrades or diagnoses
    assert_eq!(view.get::<i64>(&ChannelKey::Name), None);
    match view.resolve::<i64>(&ChannelKey::Name) {
        Err(StoreError::InvalidType { expected, actual }) => {
            assert_eq!(expected, "i64");
            assert_eq!(actual, "\"Twitch\"");
        }
        other => panic!("expected InvalidType, got {:?}", other),
    }
}

#[test]
fn test_parse_failure_yields_empty_view() {
    let view = JsonView::<ChannelKey>::from_slice(b"{ not json at all");
    assert!(view.is_empty());

    // A parseable non-object degrades the same way
    let view = JsonView::<ChannelKey>::from_slice(b"[1, 2, 3]");
    assert!(view.is_empty());
}

#[test]
fn test_array_from_slice() {
    let bytes = serde_json::to_vec(&json!([
        { "handle": "ana", "since": 2019 },
        42,
        { "handle": "bo" }
    ]))
    .unwrap();

    let views = JsonView::<ModeratorKey>::array_from_slice(&bytes);

    // The bare number is dropped; both objects survive
    assert_eq!(views.len(), 2);
    assert_eq!(
        views[0].get::<String>(&ModeratorKey::Handle).as_deref(),
        Some("ana")
    );
    assert_eq!(views[1].get::<i64>(&ModeratorKey::Since), None);

    // Outer parse failure yields an empty sequence
    assert!(JsonView::<ModeratorKey>::array_from_slice(b"oops").is_empty());
    assert!(JsonView::<ModeratorKey>::array_from_slice(b"{}").is_empty());
}

#[test]
fn test_nested_object_extraction() -> Result<(), StoreError> {
    let view = JsonView::<ChannelKey>::from_slice(&channel_payload());

    let address = view.json::<AddressKey>(&ChannelKey::Address).unwrap();
    assert_eq!(address.resolve::<String>(&AddressKey::City)?, "San Francisco");
    assert_eq!(address.resolve::<String>(&AddressKey::Zip)?, "94103");

    // A scalar field does not yield a nested view
    assert!(view.json::<AddressKey>(&ChannelKey::Name).is_none());

    Ok(())
}

#[test]
fn test_nested_extraction_equals_independent_parse() -> Result<(), StoreError> {
    let address_bytes =
        serde_json::to_vec(&json!({ "city": "San Francisco", "zip": "94103" })).unwrap();

    let nested = JsonView::<ChannelKey>::from_slice(&channel_payload())
        .json::<AddressKey>(&ChannelKey::Address)
        .unwrap();
    let direct = JsonView::<AddressKey>::from_slice(&address_bytes);

    assert_eq!(
        nested.resolve::<String>(&AddressKey::City)?,
        direct.resolve::<String>(&AddressKey::City)?
    );
    assert_eq!(nested.len(), direct.len());

    Ok(())
}

#[test]
fn test_child_view_is_detached_from_parent() {
    let view = JsonView::<ChannelKey>::from_slice(&channel_payload());
    let address = view.json::<AddressKey>(&ChannelKey::Address).unwrap();

    // Mutating the child leaves the parent's entry untouched
    address.set(AddressKey::City, "Oakland");
    let re_extracted = view.json::<AddressKey>(&ChannelKey::Address).unwrap();
    assert_eq!(
        re_extracted.get::<String>(&AddressKey::City).as_deref(),
        Some("San Francisco")
    );
}

#[test]
fn test_nested_array_extraction() {
    let view = JsonView::<ChannelKey>::from_slice(&channel_payload());

    let moderators = view.array::<ModeratorKey>(&ChannelKey::Moderators).unwrap();
    // "not-an-object" is dropped
    assert_eq!(moderators.len(), 2);
    assert_eq!(
        moderators[1].get::<String>(&ModeratorKey::Handle).as_deref(),
        Some("bo")
    );
    assert_eq!(moderators[0].get::<i64>(&ModeratorKey::Since), Some(2019));

    // A non-array field does not yield views
    assert!(view.array::<ModeratorKey>(&ChannelKey::Name).is_none());
    assert!(view.array::<ModeratorKey>(&ChannelKey::Address).is_none());
}

#[test]
fn test_set_and_remove() {
    let view = JsonView::<AddressKey>::new();

    view.set(AddressKey::City, "Lisbon");
    view.set(AddressKey::Zip, "1100-048");
    assert_eq!(view.len(), 2);
    assert_eq!(
        view.get::<String>(&AddressKey::City).as_deref(),
        Some("Lisbon")
    );

    // Upsert replaces
    view.set(AddressKey::City, "Porto");
    assert_eq!(
        view.get::<String>(&AddressKey::City).as_deref(),
        Some("Porto")
    );

    assert!(view.remove(&AddressKey::Zip));
    assert!(!view.remove(&AddressKey::Zip));
    assert_eq!(view.len(), 1);
}

#[test]
fn test_null_values() {
    let view = JsonView::<AddressKey>::from_slice(br#"{ "city": null }"#);

    // null is stored — the key is present
    assert!(view.contains_key(&AddressKey::City));
    assert_eq!(view.get::<Option<String>>(&AddressKey::City), Some(None));
    assert_eq!(view.get::<String>(&AddressKey::City), None);

    match view.resolve::<String>(&AddressKey::City) {
        Err(StoreError::InvalidType { actual, .. }) => assert_eq!(actual, "null"),
        other => panic!("expected InvalidType, got {:?}", other),
    }
}

#[test]
fn test_values_of_filters_by_shape() {
    let view = JsonView::<ChannelKey>::from_slice(&channel_payload());

    let strings = view.values_of::<String>();
    assert_eq!(strings.len(), 1);
    assert_eq!(strings[&ChannelKey::Name], "Twitch");

    let numbers = view.values_of::<i64>();
    assert_eq!(numbers.len(), 1);
    assert_eq!(numbers[&ChannelKey::Number], 5);
}

#[test]
fn test_require_reports_every_missing_key() {
    let view = JsonView::<AddressKey>::from_slice(br#"{}"#);

    match view.require(&[AddressKey::City, AddressKey::Zip]) {
        Err(StoreError::MissingKeys { keys }) => {
            assert_eq!(keys.len(), 2);
            assert!(keys.contains(&"City".to_string()));
            assert!(keys.contains(&"Zip".to_string()));
        }
        other => panic!("expected MissingKeys, got {:?}", other),
    }
}

#[test]
fn test_raw_value_access() {
    let view = JsonView::<ChannelKey>::from_slice(&channel_payload());

    // Narrowing to Value hands back the raw decoded tree
    let raw = view.get::<Value>(&ChannelKey::Address).unwrap();
    assert_eq!(raw["city"], "San Francisco");
}

#[test]
fn test_clone_shares_state() {
    let view = JsonView::<AddressKey>::new();
    let cloned = view.clone();

    view.set(AddressKey::City, "Lisbon");
    assert_eq!(
        cloned.get::<String>(&AddressKey::City).as_deref(),
        Some("Lisbon")
    );
}
