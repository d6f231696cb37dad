//! LSM store
//!
//! Two levels held in memory:
//!
//! ```text
//!   set/delete ──► ┌────────────────────┐
//!                  │ memtable (HashMap) │  newest state, unsorted
//!                  └─────────┬──────────┘
//!                            │ len >= threshold: sort + merge
//!                            ▼
//!                  ┌────────────────────┐
//!                  │ table (sorted Vec) │  binary-searched
//!                  └────────────────────┘
//! ```
//!
//! Reads check the memtable first, then the table. A flush triggered by a
//! write runs inside that write's lock hold, so it stalls every other
//! caller until the merge finishes.
//!
//! ## Deletes
//! With `TombstoneMode::Explicit` a delete records `Entry::Tombstone`; the
//! table is the bottom level, so the merge drops tombstones outright.
//! With `TombstoneMode::EmptyValue` a delete writes `""`: reads of a deleted
//! key return `""`, and range scans skip empty values.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use tracing::debug;

use super::{KvStore, ENTRY_OVERHEAD};
use crate::config::{Config, TombstoneMode};
use crate::error::{KvError, Result};

/// State of a key in one level
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A live value
    Value(String),

    /// A deletion marker shadowing older levels
    Tombstone,
}

impl Entry {
    fn heap_len(&self) -> usize {
        match self {
            Entry::Value(v) => v.len(),
            Entry::Tombstone => 0,
        }
    }
}

#[derive(Default)]
struct Tables {
    memtable: HashMap<String, Entry>,
    /// Sorted ascending by key, one entry per key
    table: Vec<(String, Entry)>,
    flushes: u64,
}

impl Tables {
    /// Newest state of `key` across both levels
    fn lookup(&self, key: &str) -> Option<&Entry> {
        if let Some(entry) = self.memtable.get(key) {
            return Some(entry);
        }
        self.table
            .binary_search_by(|(k, _)| k.as_str().cmp(key))
            .ok()
            .map(|i| &self.table[i].1)
    }
}

/// Two-level log-structured store
pub struct LsmStore {
    tables: RwLock<Tables>,
    threshold: usize,
    tombstones: TombstoneMode,
}

impl LsmStore {
    /// Store with the default threshold (1000) and explicit tombstones
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        debug!(
            threshold = config.lsm_flush_threshold,
            tombstones = ?config.lsm_tombstones,
            "opening lsm store"
        );
        Self {
            tables: RwLock::new(Tables::default()),
            threshold: config.lsm_flush_threshold.max(1),
            tombstones: config.lsm_tombstones,
        }
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Entries waiting in the memtable, tombstones included
    pub fn memtable_len(&self) -> usize {
        self.tables.read().memtable.len()
    }

    /// Entries in the sorted table
    pub fn table_len(&self) -> usize {
        self.tables.read().table.len()
    }

    /// Keys of the sorted table, in stored order
    pub fn table_keys(&self) -> Vec<String> {
        self.tables
            .read()
            .table
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Number of memtable merges performed so far
    pub fn flush_count(&self) -> u64 {
        self.tables.read().flushes
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn tombstone_mode(&self) -> TombstoneMode {
        self.tombstones
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn is_live(&self, entry: &Entry) -> bool {
        match (entry, self.tombstones) {
            (Entry::Tombstone, _) => false,
            (Entry::Value(v), TombstoneMode::EmptyValue) => !v.is_empty(),
            (Entry::Value(_), TombstoneMode::Explicit) => true,
        }
    }

    /// Write into the memtable, flushing if it reached the threshold
    fn write_locked(&self, tables: &mut Tables, key: &str, entry: Entry) {
        tables.memtable.insert(key.to_string(), entry);
        if tables.memtable.len() >= self.threshold {
            self.flush_locked(tables);
        }
    }

    /// Sort the memtable and merge it into the table (lock held)
    fn flush_locked(&self, tables: &mut Tables) {
        if tables.memtable.is_empty() {
            return;
        }

        let mut batch: Vec<(String, Entry)> = tables.memtable.drain().collect();
        batch.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        let batch_len = batch.len();

        let drop_tombstones = self.tombstones == TombstoneMode::Explicit;
        let older = std::mem::take(&mut tables.table);
        tables.table = merge_sorted(older, batch, drop_tombstones);
        tables.flushes += 1;

        debug!(
            flushed = batch_len,
            table_len = tables.table.len(),
            flushes = tables.flushes,
            "lsm memtable merged"
        );
    }
}

impl Default for LsmStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for LsmStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut tables = self.tables.write();
        self.write_locked(&mut tables, key, Entry::Value(value.to_string()));
        Ok(())
    }

    fn get(&self, key: &str) -> Result<String> {
        let tables = self.tables.read();
        match tables.lookup(key) {
            Some(Entry::Value(v)) => Ok(v.clone()),
            Some(Entry::Tombstone) | None => Err(KvError::NotFound),
        }
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut tables = self.tables.write();
        match self.tombstones {
            TombstoneMode::EmptyValue => {
                self.write_locked(&mut tables, key, Entry::Value(String::new()));
            }
            TombstoneMode::Explicit => {
                if !matches!(tables.lookup(key), Some(Entry::Value(_))) {
                    return Err(KvError::NotFound);
                }
                self.write_locked(&mut tables, key, Entry::Tombstone);
            }
        }
        Ok(())
    }

    fn range(&self, start: &str, end: &str) -> Result<Vec<String>> {
        if start >= end {
            return Ok(Vec::new());
        }
        let tables = self.tables.read();

        let from = tables.table.partition_point(|(k, _)| k.as_str() < start);
        let mut merged: BTreeMap<&str, &Entry> = tables.table[from..]
            .iter()
            .take_while(|(k, _)| k.as_str() < end)
            .map(|(k, e)| (k.as_str(), e))
            .collect();

        // Memtable shadows the table
        for (k, e) in &tables.memtable {
            if k.as_str() >= start && k.as_str() < end {
                merged.insert(k.as_str(), e);
            }
        }

        Ok(merged
            .into_iter()
            .filter(|(_, e)| self.is_live(e))
            .map(|(k, _)| k.to_string())
            .collect())
    }

    fn flush(&self) -> Result<()> {
        let mut tables = self.tables.write();
        self.flush_locked(&mut tables);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "lsm"
    }

    fn len(&self) -> usize {
        let tables = self.tables.read();
        let in_table = tables
            .table
            .iter()
            .filter(|(k, e)| !tables.memtable.contains_key(k) && self.is_live(e))
            .count();
        let in_memtable = tables.memtable.values().filter(|e| self.is_live(e)).count();
        in_table + in_memtable
    }

    fn approximate_bytes(&self) -> usize {
        let tables = self.tables.read();
        tables
            .memtable
            .iter()
            .chain(tables.table.iter().map(|(k, e)| (k, e)))
            .map(|(k, e)| k.len() + e.heap_len() + ENTRY_OVERHEAD)
            .sum()
    }
}

/// Linear two-pointer merge of two key-sorted runs. On equal keys the
/// newer entry wins. Output stays sorted with one entry per key.
fn merge_sorted(
    older: Vec<(String, Entry)>,
    newer: Vec<(String, Entry)>,
    drop_tombstones: bool,
) -> Vec<(String, Entry)> {
    let mut out = Vec::with_capacity(older.len() + newer.len());
    let mut a = older.into_iter().peekable();
    let mut b = newer.into_iter().peekable();

    loop {
        let order = match (a.peek(), b.peek()) {
            (Some(x), Some(y)) => x.0.cmp(&y.0),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => break,
        };
        let next = match order {
            Ordering::Less => a.next(),
            Ordering::Greater => b.next(),
            Ordering::Equal => {
                a.next();
                b.next()
            }
        };
        if let Some((key, entry)) = next {
            if drop_tombstones && entry == Entry::Tombstone {
                continue;
            }
            out.push((key, entry));
        }
    }
    out
}
