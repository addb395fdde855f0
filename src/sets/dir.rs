//! Sets directory
//!
//! File-level access to `{root}/.sets/<name>.json`.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::codec;
use crate::error::{JsonSetsError, Result};

/// Subdirectory name that is never a set
pub const RESERVED_DIR: &str = ".prod";

/// Extension of every set file (with the dot)
pub const SET_EXTENSION: &str = ".json";

/// Result of scanning the sets directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetListing {
    /// Set names, sorted
    pub names: Vec<String>,

    /// Names skipped because they collide with an earlier one
    pub duplicates: Vec<String>,
}

/// The sets directory
#[derive(Debug, Clone)]
pub struct SetsDir {
    dir: PathBuf,
}

impl SetsDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Scan the directory for sets
    ///
    /// Skips `.prod`, directories, non-`.json` entries and stems carrying a
    /// second extension. Stems compare exactly, so `Foo` and `foo` are two
    /// sets; a repeated stem is reported as a duplicate and the first wins.
    pub fn list(&self) -> Result<SetListing> {
        let entries = fs::read_dir(&self.dir).map_err(|source| JsonSetsError::SetsListing {
            path: self.dir.clone(),
            source,
        })?;

        let mut file_names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| JsonSetsError::SetsListing {
                path: self.dir.clone(),
                source,
            })?;

            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }

            match entry.file_name().into_string() {
                Ok(name) => file_names.push(name),
                Err(raw) => tracing::debug!("skipping non UTF-8 entry {:?}", raw),
            }
        }
        file_names.sort();

        let mut listing = SetListing::default();
        let mut seen = HashSet::new();
        for file_name in file_names {
            if file_name == RESERVED_DIR {
                continue;
            }
            let Some(stem) = file_name.strip_suffix(SET_EXTENSION) else {
                continue;
            };
            if validate_set_name(stem).is_err() {
                tracing::debug!("skipping {}: not a set name", file_name);
                continue;
            }

            if seen.insert(stem.to_string()) {
                listing.names.push(stem.to_string());
            } else {
                listing.duplicates.push(stem.to_string());
            }
        }

        Ok(listing)
    }

    /// Read and parse one set
    pub fn read(&self, name: &str) -> Result<Value> {
        let path = self.path_for(name)?;
        let bytes = fs::read(&path)?;
        codec::decode(&bytes, &path)
    }

    /// Write one set, pretty-printed
    pub fn write(&self, name: &str, value: &Value) -> Result<()> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, codec::encode_pretty(value)?)?;
        Ok(())
    }

    /// Remove one set file; `false` when it did not exist
    pub fn remove(&self, name: &str) -> Result<bool> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// File backing a set
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        validate_set_name(name)?;
        Ok(self.dir.join(format!("{}{}", name, SET_EXTENSION)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Check every name before any file is touched
pub fn validate_set_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<()> {
    names.into_iter().try_for_each(validate_set_name)
}

/// A set name must be a plain file stem
///
/// Non-empty, no path separator, no `.` (a second extension), and never the
/// reserved directory.
pub fn validate_set_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name != RESERVED_DIR
        && !name.contains(['/', '\\', '.', '\0']);
    if valid {
        Ok(())
    } else {
        Err(JsonSetsError::InvalidSetName(name.to_string()))
    }
}
