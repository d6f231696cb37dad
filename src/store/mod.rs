//! Store Module
//!
//! The shared contract every backend implements, plus the backends.
//!
//! ## Backends
//! ```text
//! ┌───────────┬──────────────────────┬─────────┬──────────────────────┐
//! │ Name      │ Structure            │ Range   │ Locking              │
//! ├───────────┼──────────────────────┼─────────┼──────────────────────┤
//! │ hash      │ HashMap              │ no      │ RwLock               │
//! │ btree     │ BTreeMap             │ yes     │ RwLock               │
//! │ skiplist  │ arena skip list      │ yes     │ RwLock (outer)       │
//! │ trie      │ char-branching trie  │ yes     │ RwLock               │
//! │ lsm       │ memtable + table     │ yes     │ RwLock (both tables) │
//! └───────────┴──────────────────────┴─────────┴──────────────────────┘
//! ```
//!
//! All operations are synchronous. A writer excludes every other caller;
//! readers only exclude writers.

mod btree;
mod hash;
mod lsm;
mod skiplist;
mod trie;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{KvError, Result};

pub use btree::BTreeStore;
pub use hash::HashStore;
pub use lsm::{Entry, LsmStore};
pub use skiplist::{SkipList, SkipListStore};
pub use trie::TrieStore;

/// Common interface for all key-value stores.
///
/// Keys compare byte-wise; values are opaque strings.
pub trait KvStore: Send + Sync {
    /// Insert or overwrite `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Fetch the value of `key`, or `KvError::NotFound`
    fn get(&self, key: &str) -> Result<String>;

    /// Remove `key`, or `KvError::NotFound` if it is absent
    fn delete(&self, key: &str) -> Result<()>;

    /// Keys in the half-open interval `[start, end)`, ascending.
    ///
    /// Unordered stores return `KvError::Unsupported`.
    fn range(&self, start: &str, end: &str) -> Result<Vec<String>>;

    /// Reconcile internal state. A no-op for single-level stores.
    fn flush(&self) -> Result<()>;

    /// Short backend name used in logs and reports
    fn name(&self) -> &'static str;

    /// Number of live keys
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Estimated heap bytes held by keys, values and structure
    fn approximate_bytes(&self) -> usize;
}

/// The available backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    Hash,
    BTree,
    SkipList,
    Trie,
    Lsm,
}

impl StoreKind {
    /// Every backend, in report order
    pub const ALL: [StoreKind; 5] = [
        StoreKind::Hash,
        StoreKind::BTree,
        StoreKind::SkipList,
        StoreKind::Trie,
        StoreKind::Lsm,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StoreKind::Hash => "hash",
            StoreKind::BTree => "btree",
            StoreKind::SkipList => "skiplist",
            StoreKind::Trie => "trie",
            StoreKind::Lsm => "lsm",
        }
    }

    /// Whether `range` is supported
    pub fn is_ordered(self) -> bool {
        !matches!(self, StoreKind::Hash)
    }

    /// Build an empty store of this kind
    pub fn open(self, config: &Config) -> Arc<dyn KvStore> {
        match self {
            StoreKind::Hash => Arc::new(HashStore::new()),
            StoreKind::BTree => Arc::new(BTreeStore::new()),
            StoreKind::SkipList => Arc::new(SkipListStore::with_config(config)),
            StoreKind::Trie => Arc::new(TrieStore::new()),
            StoreKind::Lsm => Arc::new(LsmStore::with_config(config)),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StoreKind {
    type Err = KvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hash" => Ok(StoreKind::Hash),
            "btree" | "bptree" => Ok(StoreKind::BTree),
            "skiplist" => Ok(StoreKind::SkipList),
            "trie" => Ok(StoreKind::Trie),
            "lsm" => Ok(StoreKind::Lsm),
            other => Err(KvError::Config(format!("unknown store '{}'", other))),
        }
    }
}

/// Per-entry bookkeeping overhead used by `approximate_bytes`
pub(crate) const ENTRY_OVERHEAD: usize = 2 * std::mem::size_of::<String>();
