//! Document codec
//!
//! Encoding and decoding of set and production files.
//!
//! ## File Format
//! Pretty-printed JSON, 4-space indent, UTF-8, no trailing newline.
//! Object keys keep insertion order, so the same document always produces the
//! same bytes.

use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};

use crate::error::{JsonSetsError, Result};

/// Indentation used for every file written to disk
pub const INDENT: &[u8] = b"    ";

/// Encode a value as pretty-printed JSON
pub fn encode_pretty<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Decode a document read from `origin`
pub fn decode(bytes: &[u8], origin: &Path) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|source| JsonSetsError::Parse {
        path: origin.to_path_buf(),
        source,
    })
}

/// Compact serialization used for change detection
///
/// `None` stands for an absent value.
pub fn canonical(value: Option<&Value>) -> Option<String> {
    value.map(Value::to_string)
}

/// Kind name used in error messages
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
