//! Hash store
//!
//! HashMap behind a single RwLock. No key ordering, so `range` is unsupported.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::{KvStore, ENTRY_OVERHEAD};
use crate::error::{KvError, Result};

/// Unordered in-memory store
#[derive(Default)]
pub struct HashStore {
    data: RwLock<HashMap<String, String>>,
}

impl HashStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for HashStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<String> {
        self.data.read().get(key).cloned().ok_or(KvError::NotFound)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.data
            .write()
            .remove(key)
            .map(|_| ())
            .ok_or(KvError::NotFound)
    }

    fn range(&self, _start: &str, _end: &str) -> Result<Vec<String>> {
        Err(KvError::Unsupported(self.name()))
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "hash"
    }

    fn len(&self) -> usize {
        self.data.read().len()
    }

    fn approximate_bytes(&self) -> usize {
        self.data
            .read()
            .iter()
            .map(|(k, v)| k.len() + v.len() + ENTRY_OVERHEAD)
            .sum()
    }
}
