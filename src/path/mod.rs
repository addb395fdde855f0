//! Path Module
//!
//! Dotted-path addressing into a JSON document.
//!
//! ## Syntax
//! ```text
//!   fruits.list.0      steps: [fruits, list]   last: 0
//!   .fruits            steps: []               last: fruits
//!   .  or  ""          root (no last key)
//! ```
//!
//! ## Responsibilities
//! - Parse a path into steps plus a final key
//! - Walk a document, creating missing intermediate objects on the way
//! - Hand back the parent container so callers decide how to use the last key

mod resolver;

pub use resolver::{lookup, resolve, sequence_at, Resolved};

use crate::error::{JsonSetsError, Result};

/// Field separator
pub const SEPARATOR: char = '.';

/// A parsed dotted path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    steps: Vec<String>,
    last: Option<String>,
}

impl JsonPath {
    /// The path addressing the whole document
    pub fn root() -> Self {
        Self {
            steps: Vec::new(),
            last: None,
        }
    }

    /// Parse a dotted path
    ///
    /// A single leading `.` is optional. Empty segments (`a..b`, `a.`) are rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() || raw == "." {
            return Ok(Self::root());
        }

        let trimmed = raw.strip_prefix(SEPARATOR).unwrap_or(raw);
        let mut steps: Vec<String> = trimmed.split(SEPARATOR).map(str::to_owned).collect();
        if steps.iter().any(String::is_empty) {
            return Err(JsonSetsError::MalformedPath(raw.to_string()));
        }

        let last = steps.pop();
        Ok(Self { steps, last })
    }

    /// Intermediate segments
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Final segment, `None` for the root path
    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.last.is_none()
    }

    /// All segments, steps first
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(String::as_str).chain(self.last.as_deref())
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Option<String>) {
        (self.steps, self.last)
    }
}

/// Parse an array index segment
///
/// Only canonical decimal indices count (`0`, `12`, never `01` or `+1`).
pub(crate) fn parse_index(segment: &str) -> Option<usize> {
    let canonical = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment.len() == 1 || !segment.starts_with('0'));
    if canonical {
        segment.parse().ok()
    } else {
        None
    }
}
