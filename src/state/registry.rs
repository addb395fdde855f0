//! Shared registry of working copies, keyed by database name.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

/// A working copy binding shared through the registry
pub type Binding = Arc<RwLock<Value>>;

/// Process-wide working copies
///
/// ## Concurrency:
/// - `bindings`: RwLock on the name table only
/// - each binding has its own RwLock, so databases never contend on the table
#[derive(Debug, Default)]
pub struct Registry {
    bindings: RwLock<HashMap<String, Binding>>,
}

impl Registry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Binding for `name`, created as an empty object on first use
    pub fn bind(&self, name: &str) -> Binding {
        if let Some(binding) = self.bindings.read().get(name) {
            return Arc::clone(binding);
        }

        let mut bindings = self.bindings.write();
        Arc::clone(
            bindings
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(RwLock::new(Value::Object(Default::default())))),
        )
    }

    /// Snapshot of the document bound to `name`
    pub fn get(&self, name: &str) -> Option<Value> {
        self.bindings
            .read()
            .get(name)
            .map(|binding| binding.read().clone())
    }

    /// The binding itself, without creating it
    pub fn binding(&self, name: &str) -> Option<Binding> {
        self.bindings.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.read().contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.read().keys().cloned().collect();
        names.sort();
        names
    }
}
