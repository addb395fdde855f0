//! Error Log
//!
//! Flat, append-only error sink at `{root}/jsonsets.log`.
//!
//! The file is seeded with `Hello !` on creation; every entry is appended as
//! `\n<message>`.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Seed content written when the log is first created
pub const SEED: &str = "Hello !";

/// Append-only log file
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    /// Open the log, creating it with the seed content if absent
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, SEED)?;
        }
        Ok(Self { path })
    }

    /// Append one entry
    ///
    /// Failing to log never fails the caller; the failure is reported through tracing.
    pub fn append(&self, message: &str) {
        let outcome = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .and_then(|mut file| write!(file, "\n{}", message));

        if let Err(e) = outcome {
            tracing::warn!(path = %self.path.display(), "failed to write log entry: {}", e);
        }
    }

    /// Full log content
    pub fn read(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.path)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
