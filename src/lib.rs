//! # jsonsets
//!
//! A minimal embedded document store backed by plain JSON files:
//! - One file per named set, compiled into a single production document
//! - Dotted-path get/set/del/push/splice against an in-memory working copy
//! - Change-only synchronization, so untouched set files are never rewritten
//! - Working copy private to the instance or shared through a registry
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Mutation API                            │
//! │              get / set / del / push / splice                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ dotted paths
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Working Copy Store                          │
//! │            (inner binding | shared registry)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ save: replace → compile → load
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  .sets/*    │ compile  │ .prod/name  │
//!   │ (one / set) │ ───────▶ │ (aggregate) │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod logfile;

pub mod codec;
pub mod path;
pub mod state;
pub mod sets;
pub mod prod;
pub mod database;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{JsonSetsError, Result};
pub use config::{Config, PointerMode};
pub use database::Database;
pub use state::Registry;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of jsonsets
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
