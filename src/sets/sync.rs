//! Set synchronization
//!
//! ```text
//!            compile (fold_sets)
//!   .sets/*.json  ───────────────▶  aggregate
//!                 ◀───────────────
//!            replace (plan_replace)
//! ```
//!
//! Both directions only touch sets whose value changed, per [`same_value`].

use serde::Serialize;
use serde_json::{Map, Value};

use super::SetsDir;
use crate::error::Result;
use crate::state::same_value;

/// Outcome of a compile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompileReport {
    /// Sets read from disk
    pub scanned: Vec<String>,

    /// Sets whose file content replaced the aggregate value
    pub refreshed: Vec<String>,

    /// Duplicate set files ignored
    pub skipped: Vec<String>,
}

/// Outcome of a replace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplaceReport {
    /// Set files (re)written
    pub written: Vec<String>,

    /// Set files deleted
    pub removed: Vec<String>,

    /// Sets left untouched
    pub unchanged: Vec<String>,
}

/// What a replace has to do
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacePlan {
    /// Keys whose working value differs from, or is missing in, the aggregate
    pub writes: Vec<String>,

    /// Keys present in the aggregate but gone from the working copy
    pub removals: Vec<String>,

    /// Keys with identical values on both sides
    pub unchanged: Vec<String>,
}

/// Fold set files into `aggregate`
///
/// A set only replaces the aggregate value when it differs, so untouched sets
/// keep their position and identity. Returns the refreshed names.
pub fn fold_sets(sets: &SetsDir, names: &[String], aggregate: &mut Map<String, Value>) -> Result<Vec<String>> {
    let mut refreshed = Vec::new();

    for name in names {
        let value = sets.read(name)?;
        if same_value(Some(&value), aggregate.get(name)) {
            continue;
        }
        tracing::debug!(set = %name, "set file differs from aggregate");
        aggregate.insert(name.clone(), value);
        refreshed.push(name.clone());
    }

    Ok(refreshed)
}

/// Diff the aggregate against the working copy, top-level key by key
///
/// Aggregate keys come first in aggregate order, then keys only the working
/// copy has, in working order.
pub fn plan_replace(aggregate: &Map<String, Value>, working: &Map<String, Value>) -> ReplacePlan {
    let mut plan = ReplacePlan::default();

    for (name, value) in aggregate {
        match working.get(name) {
            None => plan.removals.push(name.clone()),
            Some(current) if same_value(Some(value), Some(current)) => plan.unchanged.push(name.clone()),
            Some(_) => plan.writes.push(name.clone()),
        }
    }

    for name in working.keys() {
        if !aggregate.contains_key(name) {
            plan.writes.push(name.clone());
        }
    }

    plan
}
