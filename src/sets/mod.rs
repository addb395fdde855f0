//! Sets Module
//!
//! One JSON file per set under `{root}/.sets`, and the logic folding them into
//! (and out of) the aggregate document.
//!
//! ## Responsibilities
//! - Discover set files
//! - Read, write and remove individual sets
//! - Compile: fold changed set files into the aggregate
//! - Replace: plan which set files a save has to touch

mod dir;
mod sync;

pub use dir::{validate_set_name, validate_set_names, SetListing, SetsDir, RESERVED_DIR, SET_EXTENSION};
pub use sync::{fold_sets, plan_replace, CompileReport, ReplacePlan, ReplaceReport};
