//! Trie store
//!
//! One node per character; a node carries a value when a key ends there.
//! Children are kept in a `BTreeMap<char, _>` so a pre-order walk visits
//! keys in ascending byte order (UTF-8 preserves code point order).
//!
//! Deleting a key clears its value but leaves the branch in place.

use std::collections::BTreeMap;
use std::ops::Bound;

use parking_lot::RwLock;

use super::KvStore;
use crate::error::{KvError, Result};

#[derive(Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    value: Option<String>,
}

#[derive(Default)]
struct Trie {
    root: TrieNode,
    len: usize,
}

/// Character trie store
#[derive(Default)]
pub struct TrieStore {
    inner: RwLock<Trie>,
}

impl TrieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total nodes, including the root and value-less branches
    pub fn node_count(&self) -> usize {
        let trie = self.inner.read();
        let mut count = 0;
        let mut stack = vec![&trie.root];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.values());
        }
        count
    }
}

impl KvStore for TrieStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut trie = self.inner.write();
        let mut node = &mut trie.root;
        for ch in key.chars() {
            node = node.children.entry(ch).or_default();
        }
        let fresh = node.value.replace(value.to_string()).is_none();
        if fresh {
            trie.len += 1;
        }
        Ok(())
    }

    fn get(&self, key: &str) -> Result<String> {
        let trie = self.inner.read();
        let mut node = &trie.root;
        for ch in key.chars() {
            node = node.children.get(&ch).ok_or(KvError::NotFound)?;
        }
        node.value.clone().ok_or(KvError::NotFound)
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut trie = self.inner.write();
        let mut node = &mut trie.root;
        for ch in key.chars() {
            node = node.children.get_mut(&ch).ok_or(KvError::NotFound)?;
        }
        node.value.take().ok_or(KvError::NotFound)?;
        trie.len -= 1;
        Ok(())
    }

    fn range(&self, start: &str, end: &str) -> Result<Vec<String>> {
        let trie = self.inner.read();
        let mut keys = Vec::new();
        if start < end {
            let mut prefix = String::new();
            collect_range(&trie.root, &mut prefix, start, end, &mut keys);
        }
        Ok(keys)
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "trie"
    }

    fn len(&self) -> usize {
        self.inner.read().len
    }

    fn approximate_bytes(&self) -> usize {
        let trie = self.inner.read();
        let per_child = std::mem::size_of::<(char, TrieNode)>();
        let mut bytes = 0;
        let mut stack = vec![&trie.root];
        while let Some(node) = stack.pop() {
            bytes += node.children.len() * per_child;
            bytes += node.value.as_ref().map_or(0, String::len);
            stack.extend(node.children.values());
        }
        bytes
    }
}

/// In-order walk limited to `[start, end)`.
///
/// Along the path that spells a prefix of `start`, children below the next
/// character of `start` are skipped via the ordered map. The walk stops at
/// the first prefix `>= end`: everything visited after it is larger.
/// Returns false once the walk should stop.
fn collect_range(
    node: &TrieNode,
    prefix: &mut String,
    start: &str,
    end: &str,
    out: &mut Vec<String>,
) -> bool {
    if prefix.as_str() >= end {
        return false;
    }
    if node.value.is_some() && prefix.as_str() >= start {
        out.push(prefix.clone());
    }

    let lower = if start.starts_with(prefix.as_str()) {
        start[prefix.len()..].chars().next()
    } else {
        None
    };
    let bounds = (
        lower.map_or(Bound::Unbounded, Bound::Included),
        Bound::Unbounded,
    );

    for (&ch, child) in node.children.range(bounds) {
        prefix.push(ch);
        let more = collect_range(child, prefix, start, end, out);
        prefix.pop();
        if !more {
            return false;
        }
    }
    true
}
