//! Working copy stores

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};

use super::{Binding, Registry};
use crate::config::PointerMode;

/// Where mutation operations find the live document
pub trait WorkingStore: Send + Sync + fmt::Debug {
    /// The pointer mode this store implements
    fn mode(&self) -> PointerMode;

    /// The lock guarding the working document
    fn cell(&self) -> &RwLock<Value>;

    /// Replace the working document with a freshly loaded aggregate
    fn publish(&self, doc: Value) {
        *self.cell().write() = doc;
    }

    /// Owned copy of the working document
    fn snapshot(&self) -> Value {
        self.cell().read().clone()
    }
}

/// Working copy private to one database
#[derive(Debug)]
pub struct InnerStore {
    doc: RwLock<Value>,
}

impl InnerStore {
    pub fn new() -> Self {
        Self {
            doc: RwLock::new(Value::Object(Map::new())),
        }
    }
}

impl Default for InnerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkingStore for InnerStore {
    fn mode(&self) -> PointerMode {
        PointerMode::Inner
    }

    fn cell(&self) -> &RwLock<Value> {
        &self.doc
    }
}

/// Working copy published in a [`Registry`]
#[derive(Debug)]
pub struct GlobalStore {
    name: String,
    binding: Binding,
}

impl GlobalStore {
    pub fn new(name: &str, registry: &Registry) -> Self {
        Self {
            name: name.to_string(),
            binding: registry.bind(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl WorkingStore for GlobalStore {
    fn mode(&self) -> PointerMode {
        PointerMode::Global
    }

    fn cell(&self) -> &RwLock<Value> {
        &self.binding
    }

    fn publish(&self, doc: Value) {
        *self.binding.write() = doc;
        tracing::debug!(name = %self.name, "published working copy to registry");
    }
}

/// Pick the store for a pointer mode
pub fn store_for(mode: PointerMode, name: &str, registry: &Arc<Registry>) -> Box<dyn WorkingStore> {
    match mode {
        PointerMode::Inner => Box::new(InnerStore::new()),
        PointerMode::Global => Box::new(GlobalStore::new(name, registry)),
    }
}
