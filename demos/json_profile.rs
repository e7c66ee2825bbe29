//! Demonstrates navigating a JSON document with typed key sets.
//!
//! Each nesting level gets its own key enumeration; descending into a
//! sub-object or an array of objects produces fresh views keyed by the
//! enumeration for that level. Fields outside the enumeration are simply
//! not part of the view.
//!
//! Run with: cargo run --example json_profile

use serde::Deserialize;
use sovran_store::{JsonView, StoreAccess, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ProfileKey {
    Username,
    Address,
    Repositories,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
enum AddressKey {
    City,
    Country,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RepoKey {
    Name,
    Stars,
}

const PAYLOAD: &[u8] = br#"{
    "username": "ripley",
    "internal_id": "u-551",
    "address": { "city": "Portland", "country": "US" },
    "repositories": [
        { "name": "nostromo", "stars": 129 },
        { "name": "narcissus", "stars": 12 },
        "corrupted entry"
    ]
}"#;

fn main() -> Result<(), StoreError> {
    let profile = JsonView::<ProfileKey>::from_slice(PAYLOAD);

    // "internal_id" is not a ProfileKey member, so it never made it in
    println!("fields kept: {}", profile.len());

    let username = profile.resolve::<String>(&ProfileKey::Username)?;
    println!("user: {}", username);

    // Descend into the address object with its own key set
    if let Some(address) = profile.json::<AddressKey>(&ProfileKey::Address) {
        let city = address.resolve::<String>(&AddressKey::City)?;
        let country = address.resolve::<String>(&AddressKey::Country)?;
        println!("location: {}, {}", city, country);
    }

    // Arrays of objects become one view per element; the corrupted
    // string element is dropped along the way
    if let Some(repos) = profile.array::<RepoKey>(&ProfileKey::Repositories) {
        println!("repositories: {}", repos.len());
        for repo in &repos {
            let name = repo.resolve::<String>(&RepoKey::Name)?;
            let stars = repo.get::<u32>(&RepoKey::Stars).unwrap_or(0);
            println!("  {} ({} stars)", name, stars);
        }
    }

    Ok(())
}
