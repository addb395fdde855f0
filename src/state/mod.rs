//! State Module
//!
//! Holds the working copy and decides when two values differ.
//!
//! ## Working copy bindings
//! - `InnerStore`: owned by the database instance
//! - `GlobalStore`: lives in a shared [`Registry`] under the database name, so
//!   anything holding the registry sees the same document
//!
//! The working copy is always an independent owned value: it is copied from the
//! aggregate on load and diffed against it on save.

mod registry;
mod working;

pub use registry::{Binding, Registry};
pub use working::{store_for, GlobalStore, InnerStore, WorkingStore};

use serde_json::Value;

use crate::codec::canonical;

/// Change detection rule
///
/// Two values are the same iff their compact serializations are identical.
/// Object key order counts. An absent value only matches another absent value.
pub fn same_value(a: Option<&Value>, b: Option<&Value>) -> bool {
    canonical(a) == canonical(b)
}
