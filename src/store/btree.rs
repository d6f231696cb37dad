//! Ordered-tree store
//!
//! BTreeMap keyed by byte-wise string order, behind a single RwLock.

use std::collections::BTreeMap;
use std::ops::Bound;

use parking_lot::RwLock;

use super::{KvStore, ENTRY_OVERHEAD};
use crate::error::{KvError, Result};

/// Balanced-tree store with ascending range scans
#[derive(Default)]
pub struct BTreeStore {
    tree: RwLock<BTreeMap<String, String>>,
}

impl BTreeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for BTreeStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.tree.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<String> {
        self.tree.read().get(key).cloned().ok_or(KvError::NotFound)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.tree
            .write()
            .remove(key)
            .map(|_| ())
            .ok_or(KvError::NotFound)
    }

    fn range(&self, start: &str, end: &str) -> Result<Vec<String>> {
        // BTreeMap::range panics on an inverted interval
        if start >= end {
            return Ok(Vec::new());
        }
        let tree = self.tree.read();
        Ok(tree
            .range::<str, _>((Bound::Included(start), Bound::Excluded(end)))
            .map(|(k, _)| k.clone())
            .collect())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "btree"
    }

    fn len(&self) -> usize {
        self.tree.read().len()
    }

    fn approximate_bytes(&self) -> usize {
        self.tree
            .read()
            .iter()
            .map(|(k, v)| k.len() + v.len() + ENTRY_OVERHEAD)
            .sum()
    }
}
