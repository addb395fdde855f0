//! Database Module
//!
//! The store that coordinates sets, the production file and the working copy.
//!
//! ## Responsibilities
//! - Initial load-or-compile on open
//! - Path-addressed mutations against the working copy
//! - Save: flush changed sets, recompile the production file, reload it
//! - Recovery after the sets directory was edited by hand
//! - Append every failure to the error log

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::codec::kind_of;
use crate::config::{Config, PointerMode};
use crate::error::{JsonSetsError, Result};
use crate::logfile::LogFile;
use crate::path::{self, JsonPath, Resolved};
use crate::prod::ProductionFile;
use crate::sets::{self, CompileReport, ReplaceReport, SetListing, SetsDir};
use crate::state::{self, Registry, WorkingStore};

/// A named JSON document store
///
/// ## Three copies of the data
/// - set files under `.sets/`, one per top-level key
/// - the production file `.prod/<name>.json` and its parsed form, `original`
/// - the working copy, which every mutation targets
///
/// ## Concurrency Model
/// - **Writes** (set/del/push/splice and the whole pipeline): serialized by
///   `write_lock`, so two saves never interleave and no edit lands between a
///   save's replace and its reload
/// - **Reads** (get): only take the working copy read lock
/// - Lock order is write_lock → original → working
pub struct Database {
    /// Database configuration
    config: Config,

    /// Set files
    sets: SetsDir,

    /// Compiled aggregate on disk
    prod: ProductionFile,

    /// Error sink
    log: LogFile,

    /// Last compiled aggregate
    original: RwLock<Map<String, Value>>,

    /// Live document, private or published in `registry`
    working: Box<dyn WorkingStore>,

    registry: Arc<Registry>,

    /// Serializes mutations and pipeline operations
    write_lock: Mutex<()>,
}

impl Database {
    /// Open or create a database with its own registry
    pub fn open(config: Config) -> Result<Self> {
        Self::open_with_registry(config, Registry::new())
    }

    /// Open or create a database whose global-mode working copy lives in `registry`
    ///
    /// On startup:
    /// 1. Check the name, create the sets and production directories, seed the log
    /// 2. Compile the sets if no production file exists yet
    /// 3. Load the production file
    pub fn open_with_registry(config: Config, registry: Arc<Registry>) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(config.sets_dir())?;
        fs::create_dir_all(config.prod_dir())?;

        let log = LogFile::open(config.log_path())?;
        let working = state::store_for(config.pointer_mode, &config.name, &registry);

        let db = Self {
            sets: SetsDir::new(config.sets_dir()),
            prod: ProductionFile::new(config.prod_path()),
            log,
            original: RwLock::new(Map::new()),
            working,
            registry,
            write_lock: Mutex::new(()),
            config,
        };

        if !db.prod.exists() {
            tracing::info!(db = %db.config.name, "no production file, compiling sets");
            db.compile(true)?;
        }
        db.load()?;

        Ok(db)
    }

    /// Open from an install root, honoring `config.txt`
    pub fn open_path(root: &Path, name_override: Option<&str>) -> Result<Self> {
        Self::open(Config::from_root(root, name_override)?)
    }

    // =========================================================================
    // Mutation API
    // =========================================================================

    /// Value at `path`, or the whole working document for the root path
    ///
    /// Reads never create intermediate objects.
    pub fn get(&self, path: &str) -> Result<Option<Value>> {
        let doc = self.working.cell().read();
        let found = path::lookup(path, &doc).map(|value| value.cloned());
        self.record(found)
    }

    /// Write `value` at `path`, creating intermediate objects
    ///
    /// The root path replaces the whole working document, which must stay an
    /// object. Top-level keys must be valid set names.
    pub fn set(&self, path: &str, value: Value) -> Result<()> {
        let _guard = self.record(self.write_guard())?;
        let mut doc = self.working.cell().write();
        let result = check_set_names(path, &value)
            .and_then(|_| path::resolve(path, &mut doc))
            .and_then(|slot| slot.set(value).map(|_| ()));
        self.record(result)
    }

    /// Remove the value at `path`, returning it
    ///
    /// The root path empties the working document.
    pub fn del(&self, path: &str) -> Result<Option<Value>> {
        let _guard = self.record(self.write_guard())?;
        let mut doc = self.working.cell().write();
        let present = path::lookup(path, &doc).map(|found| found.is_some());
        let result = present.and_then(|present| {
            if present {
                path::resolve(path, &mut doc).map(Resolved::remove)
            } else {
                Ok(None)
            }
        });
        self.record(result)
    }

    /// Append to the array at `path`; an array value is concatenated
    pub fn push(&self, path: &str, value: Value) -> Result<()> {
        let _guard = self.record(self.write_guard())?;
        let mut doc = self.working.cell().write();
        let result = path::sequence_at(path, &mut doc).map(|seq| match value {
            Value::Array(items) => seq.extend(items),
            other => seq.push(other),
        });
        self.record(result)
    }

    /// Remove `remove_count` elements at `index` of the array at `path` and insert `value` there
    ///
    /// An array value inserts all its elements in order; the removal happens
    /// once for the whole batch and not at all for an empty batch. Index and
    /// count are clamped to the array. Returns the removed elements.
    pub fn splice(&self, path: &str, index: usize, remove_count: usize, value: Value) -> Result<Vec<Value>> {
        let _guard = self.record(self.write_guard())?;
        let mut doc = self.working.cell().write();
        let result = path::sequence_at(path, &mut doc).map(|seq| {
            let incoming = match value {
                Value::Array(items) if items.is_empty() => return Vec::new(),
                Value::Array(items) => items,
                other => vec![other],
            };
            let start = index.min(seq.len());
            let end = start.saturating_add(remove_count).min(seq.len());
            seq.splice(start..end, incoming).collect()
        });
        self.record(result)
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    /// Scan the sets directory
    pub fn list_sets(&self) -> Result<SetListing> {
        let _guard = self.record(self.write_guard())?;
        let listing = self.record(self.sets.list())?;
        self.note_duplicates(&listing.duplicates);
        Ok(listing)
    }

    /// Rewrite the production file from `original`, first folding in the set
    /// files when `override_sets` is set
    pub fn compile(&self, override_sets: bool) -> Result<CompileReport> {
        let _guard = self.record(self.write_guard())?;
        self.record(self.compile_internal(override_sets))
    }

    /// Flush working copy changes to the set files
    pub fn replace(&self) -> Result<ReplaceReport> {
        let _guard = self.record(self.write_guard())?;
        self.record(self.replace_internal())
    }

    /// Reload the production file into `original` and the working copy
    pub fn load(&self) -> Result<PointerMode> {
        let _guard = self.record(self.write_guard())?;
        self.record(self.load_internal())
    }

    /// Commit the working copy
    ///
    /// Steps:
    /// 1. Replace: write changed sets
    /// 2. Compile without rescanning the sets
    /// 3. Reload
    ///
    /// Nothing after a failed step runs.
    pub fn save(&self) -> Result<ReplaceReport> {
        let _guard = self.record(self.write_guard())?;

        let report = self.replace_internal().map_err(|e| {
            self.note(&format!("Unable to replace {} sets - {}", self.config.name, e));
            e
        })?;
        self.record(self.compile_internal(false))?;
        self.record(self.load_internal())?;

        tracing::debug!(
            db = %self.config.name,
            written = report.written.len(),
            removed = report.removed.len(),
            "saved"
        );
        Ok(report)
    }

    /// Recompile from the set files after they were edited by hand, then reload
    ///
    /// Pending working copy edits are discarded. Failures are only logged.
    pub fn manu(&self) {
        let outcome = self
            .write_guard()
            .and_then(|_guard| self.compile_internal(true).and_then(|_| self.load_internal()));

        if let Err(e) = outcome {
            self.note(&format!("Unable to recompile {} from sets - {}", self.config.name, e));
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn pointer_mode(&self) -> PointerMode {
        self.working.mode()
    }

    /// Copy of the last compiled aggregate
    pub fn original(&self) -> Map<String, Value> {
        self.original.read().clone()
    }

    /// Copy of the working document
    pub fn working(&self) -> Value {
        self.working.snapshot()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn sets(&self) -> &SetsDir {
        &self.sets
    }

    pub fn production(&self) -> &ProductionFile {
        &self.prod
    }

    pub fn log(&self) -> &LogFile {
        &self.log
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn write_guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|e| {
            JsonSetsError::LockPoisoned(format!("Write lock poisoned: {}", e))
        })
    }

    /// Called with the write lock held
    fn compile_internal(&self, override_sets: bool) -> Result<CompileReport> {
        let mut original = self.original.write();
        let mut report = CompileReport::default();

        if override_sets {
            let listing = self.sets.list()?;
            self.note_duplicates(&listing.duplicates);

            report.refreshed = sets::fold_sets(&self.sets, &listing.names, &mut original)?;
            report.scanned = listing.names;
            report.skipped = listing.duplicates;
        } else if !self.prod.exists() {
            return Err(JsonSetsError::MissingProduction(self.prod.path().to_path_buf()));
        }

        self.prod.write(&original)?;
        tracing::debug!(
            db = %self.config.name,
            scanned = report.scanned.len(),
            refreshed = report.refreshed.len(),
            "compiled production file"
        );
        Ok(report)
    }

    /// Called with the write lock held
    fn replace_internal(&self) -> Result<ReplaceReport> {
        let mut original = self.original.write();
        let working = match self.working.snapshot() {
            Value::Object(map) => map,
            other => return Err(JsonSetsError::InvalidAggregate(kind_of(&other))),
        };

        let plan = sets::plan_replace(&original, &working);
        sets::validate_set_names(plan.writes.iter().chain(&plan.removals).map(String::as_str))?;
        for name in &plan.writes {
            if let Some(value) = working.get(name) {
                self.sets.write(name, value)?;
            }
        }
        for name in &plan.removals {
            self.sets.remove(name)?;
        }

        *original = working;
        Ok(ReplaceReport {
            written: plan.writes,
            removed: plan.removals,
            unchanged: plan.unchanged,
        })
    }

    /// Called with the write lock held
    fn load_internal(&self) -> Result<PointerMode> {
        let aggregate = self.prod.read()?;
        self.working.publish(Value::Object(aggregate.clone()));
        *self.original.write() = aggregate;
        Ok(self.working.mode())
    }

    fn note_duplicates(&self, duplicates: &[String]) {
        for name in duplicates {
            let message = format!("Skipped duplicate set file {}.json", name);
            tracing::warn!(db = %self.config.name, "{}", message);
            self.log.append(&message);
        }
    }

    fn note(&self, message: &str) {
        tracing::error!(db = %self.config.name, "{}", message);
        self.log.append(message);
    }

    /// Log the error of a failed operation and pass the result through
    fn record<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.note(&e.to_string());
        }
        result
    }
}

/// The first segment of a path names a set; a root write names all of them
fn check_set_names(path: &str, value: &Value) -> Result<()> {
    match (JsonPath::parse(path)?.segments().next(), value) {
        (Some(name), _) => sets::validate_set_name(name),
        (None, Value::Object(map)) => sets::validate_set_names(map.keys().map(String::as_str)),
        (None, other) => Err(JsonSetsError::InvalidAggregate(kind_of(other))),
    }
}
