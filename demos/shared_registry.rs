//! Demonstrates sharing stores between modules through the global
//! registry.
//!
//! The publisher and the consumer never hold references to each other;
//! they agree only on an identifier and a concrete store type. With a
//! tracing subscriber installed, registrations show up at trace level.
//!
//! Run with: cargo run --example shared_registry

use sovran_store::{Registry, Store, StoreError};
use std::thread;

fn main() -> Result<(), StoreError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    // Module A publishes its rate limits under a well-known name
    let limits = Store::<String, u32>::new();
    limits.set("requests_per_minute".to_string(), 600);
    limits.set("burst".to_string(), 50);
    Registry::global().set("limits", limits);

    // Module B, on another thread, finds them by name alone
    let reader = thread::spawn(|| -> Result<u32, StoreError> {
        let limits = Registry::global().resolve::<Store<String, u32>>("limits")?;
        limits.resolve(&"requests_per_minute".to_string())
    });
    let rpm = reader.join().expect("reader thread panicked")?;
    println!("rate limit seen by module B: {}/min", rpm);

    // Handles share state: module B's view tracks module A's updates
    let handle = Registry::global()
        .get::<Store<String, u32>>("limits")
        .expect("limits registered above");
    handle.set("requests_per_minute".to_string(), 300);

    let rpm = Registry::global()
        .resolve::<Store<String, u32>>("limits")?
        .resolve(&"requests_per_minute".to_string())?;
    println!("after the update: {}/min", rpm);

    // Asking for the wrong concrete type is a miss, not a crash
    let wrong = Registry::global().get::<Store<String, String>>("limits");
    println!("narrowed to the wrong store type: {:?}", wrong.is_some());

    Ok(())
}
