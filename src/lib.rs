//! # FastKV
//!
//! A family of interchangeable in-memory key-value stores behind one
//! contract, plus a concurrent workload driver to compare them:
//! - Hash, ordered tree, skip list, trie and two-level LSM backends
//! - Half-open `[start, end)` range scans on every ordered backend
//! - Multi-reader/single-writer locking in every backend
//! - Throughput/latency/footprint report per backend
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Workload Driver (bench)                    │
//! │          keys → concurrent sets → concurrent gets            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  dyn KvStore
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │        set / get / delete / range / flush  (store)           │
//! └──┬──────────┬───────────┬────────────┬───────────┬──────────┘
//!    ▼          ▼           ▼            ▼           ▼
//! ┌──────┐ ┌─────────┐ ┌──────────┐ ┌────────┐ ┌─────────────────┐
//! │ Hash │ │  BTree  │ │ SkipList │ │  Trie  │ │ LSM             │
//! │      │ │         │ │ (arena)  │ │        │ │ memtable→table  │
//! └──────┘ └─────────┘ └──────────┘ └────────┘ └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod bench;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::{Config, TombstoneMode};
pub use store::{KvStore, StoreKind};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of FastKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
