//! Demonstrates using a Cache as shared application state.
//!
//! A Cache holds values of different types under one set of keys, so
//! independent components can share a single state container without
//! agreeing on a value type up front.
//!
//! Run with: cargo run --example app_state

use sovran_store::{Cache, StoreAccess, StoreError};
use std::sync::Arc;

fn main() -> Result<(), StoreError> {
    // One state container shared by every component
    let state = Arc::new(Cache::<String>::new());

    state.set("app.name".to_string(), "demo".to_string());
    state.set("app.debug".to_string(), true);
    state.set("session.count".to_string(), 0u64);

    let sessions = SessionTracker::new(Arc::clone(&state));
    let reporter = StatusReporter::new(Arc::clone(&state));

    sessions.open("alice")?;
    sessions.open("bob")?;
    reporter.report()?;

    // Typed filtering: pull out only the string-valued entries
    let strings = state.values_of::<String>();
    println!("\nString-valued entries:");
    for (key, value) in &strings {
        println!("  {} = {}", key, value);
    }

    // Optional-aware writes: None clears the slot instead of storing it
    state.set_opt::<bool>("app.debug".to_string(), None);
    println!(
        "debug flag present after clearing: {}",
        state.contains_key(&"app.debug".to_string())
    );

    Ok(())
}

// ============================================================================
// Components sharing the state container
// ============================================================================

struct SessionTracker {
    state: Arc<Cache<String>>,
}

impl SessionTracker {
    fn new(state: Arc<Cache<String>>) -> Self {
        Self { state }
    }

    fn open(&self, user: &str) -> Result<(), StoreError> {
        self.state
            .with_mut(&"session.count".to_string(), |count: &mut u64| {
                *count += 1
            })?;
        self.state
            .set(format!("session.user.{}", user), user.to_string());
        println!("session opened for {}", user);
        Ok(())
    }
}

struct StatusReporter {
    state: Arc<Cache<String>>,
}

impl StatusReporter {
    fn new(state: Arc<Cache<String>>) -> Self {
        Self { state }
    }

    fn report(&self) -> Result<(), StoreError> {
        // Demand the keys this report cannot do without, then read them
        let state = self
            .state
            .require(&["app.name".to_string(), "session.count".to_string()])?;

        let name = state.resolve::<String>(&"app.name".to_string())?;
        let count = state.resolve::<u64>(&"session.count".to_string())?;
        let debug = state.get::<bool>(&"app.debug".to_string()).unwrap_or(false);

        println!("\n{}: {} open sessions (debug: {})", name, count, debug);
        Ok(())
    }
}
