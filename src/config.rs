//! Configuration for jsonsets
//!
//! Centralized configuration with sensible defaults, optionally overridden by
//! a `config.txt` file living in the install root.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use regex::Regex;

use crate::error::{JsonSetsError, Result};

/// Main configuration for a jsonsets database
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Install root for all files.
    /// Internal structure:
    ///   {root_dir}/
    ///     ├── config.txt       (optional overrides)
    ///     ├── jsonsets.log     (error log)
    ///     ├── .sets/           (one `<set>.json` per set)
    ///     └── .prod/           (`<name>.json` compiled aggregate)
    pub root_dir: PathBuf,

    /// Database name, also the production file stem and registry key
    pub name: String,

    // -------------------------------------------------------------------------
    // Working Copy Configuration
    // -------------------------------------------------------------------------
    /// Where the working copy lives
    pub pointer_mode: PointerMode,
}

/// Binding used for the working copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerMode {
    /// Working copy owned by the database instance (`inner_var`)
    #[default]
    Inner,

    /// Working copy published in a shared registry under the database name (`global_var`)
    Global,
}

impl PointerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointerMode::Inner => "inner_var",
            PointerMode::Global => "global_var",
        }
    }
}

impl fmt::Display for PointerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PointerMode {
    type Err = JsonSetsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "inner_var" => Ok(PointerMode::Inner),
            "global_var" => Ok(PointerMode::Global),
            other => Err(JsonSetsError::Config(format!("unknown pointer '{}'", other))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            name: Config::DEFAULT_NAME.to_string(),
            pointer_mode: PointerMode::Inner,
        }
    }
}

impl Config {
    // =========================================================================
    // Layout Constants
    // =========================================================================
    pub const DEFAULT_NAME: &'static str = "dbj";
    pub const CONFIG_FILENAME: &'static str = "config.txt";
    pub const LOG_FILENAME: &'static str = "jsonsets.log";
    pub const SETS_DIR: &'static str = ".sets";
    pub const PROD_DIR: &'static str = ".prod";

    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Build the config for an install root
    ///
    /// Reads `config.txt` when present. `name_override` wins over `prodname=`.
    pub fn from_root(root: impl Into<PathBuf>, name_override: Option<&str>) -> Result<Self> {
        let root = root.into();
        let mut builder = Config::builder().root_dir(&root);

        let config_path = root.join(Self::CONFIG_FILENAME);
        if config_path.exists() {
            let text = fs::read_to_string(&config_path)?;
            builder = builder.apply_overrides(&text)?;
        }

        if let Some(name) = name_override {
            builder = builder.name(name);
        }

        let config = builder.build();
        config.validate()?;
        Ok(config)
    }

    /// The name becomes a file stem under `.prod/`, so it must be a plain word
    pub fn validate(&self) -> Result<()> {
        let plain = !self.name.is_empty()
            && self.name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if plain {
            Ok(())
        } else {
            Err(JsonSetsError::Config(format!("invalid database name '{}'", self.name)))
        }
    }

    /// Directory holding one file per set
    pub fn sets_dir(&self) -> PathBuf {
        self.root_dir.join(Self::SETS_DIR)
    }

    /// Directory holding compiled aggregates
    pub fn prod_dir(&self) -> PathBuf {
        self.root_dir.join(Self::PROD_DIR)
    }

    /// Compiled aggregate for this database
    pub fn prod_path(&self) -> PathBuf {
        self.prod_dir().join(format!("{}.json", self.name))
    }

    pub fn log_path(&self) -> PathBuf {
        self.root_dir.join(Self::LOG_FILENAME)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root_dir.join(Self::CONFIG_FILENAME)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the install root
    pub fn root_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.config.root_dir = path.as_ref().to_path_buf();
        self
    }

    /// Set the database name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set the working copy binding
    pub fn pointer_mode(mut self, mode: PointerMode) -> Self {
        self.config.pointer_mode = mode;
        self
    }

    /// Apply `pointer=` and `prodname=` overrides found anywhere in `text`
    ///
    /// Unknown pointers and empty names are ignored.
    pub fn apply_overrides(mut self, text: &str) -> Result<Self> {
        let pointer = Regex::new(r"pointer=([a-zA-Z_]*)")
            .map_err(|e| JsonSetsError::Config(e.to_string()))?;
        let prodname = Regex::new(r"prodname=([a-zA-Z0-9_]*)")
            .map_err(|e| JsonSetsError::Config(e.to_string()))?;

        if let Some(caps) = pointer.captures(text) {
            match caps[1].parse::<PointerMode>() {
                Ok(mode) => self.config.pointer_mode = mode,
                Err(e) => tracing::warn!("config.txt: {}, keeping {}", e, self.config.pointer_mode),
            }
        }

        if let Some(caps) = prodname.captures(text) {
            if !caps[1].is_empty() {
                self.config.name = caps[1].to_string();
            }
        }

        Ok(self)
    }

    pub fn build(self) -> Config {
        self.config
    }
}
