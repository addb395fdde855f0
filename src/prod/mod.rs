//! Production File Module
//!
//! The compiled aggregate lives in `{root}/.prod/<name>.json`.
//!
//! ## Responsibilities
//! - Report whether a compile ever ran (file exists)
//! - Load the aggregate, which must be a JSON object
//! - Persist the aggregate, pretty-printed

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::codec;
use crate::error::{JsonSetsError, Result};

/// The production file of one database
#[derive(Debug, Clone)]
pub struct ProductionFile {
    path: PathBuf,
}

impl ProductionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the aggregate
    pub fn read(&self) -> Result<Map<String, Value>> {
        if !self.exists() {
            return Err(JsonSetsError::MissingProduction(self.path.clone()));
        }

        let bytes = fs::read(&self.path)?;
        match codec::decode(&bytes, &self.path)? {
            Value::Object(map) => Ok(map),
            other => Err(JsonSetsError::InvalidAggregate(codec::kind_of(&other))),
        }
    }

    /// Persist the aggregate, creating the file and its directory if needed
    pub fn write(&self, aggregate: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, codec::encode_pretty(aggregate)?)?;
        Ok(())
    }

    /// Raw file content
    pub fn bytes(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
