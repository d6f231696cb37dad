//! Skip list store
//!
//! A probabilistic ordered list with up to 16 levels.
//!
//! ```text
//! Level 3:  HEAD ──────────────────────────────► 50 ──────────► NIL
//! Level 2:  HEAD ──────────► 20 ────────────────► 50 ──────────► NIL
//! Level 1:  HEAD ──► 10 ──► 20 ────► 35 ────────► 50 ──► 60 ──► NIL
//! Level 0:  HEAD ──► 10 ──► 20 ──► 25 ──► 35 ──► 50 ──► 60 ──► 70 ► NIL
//! ```
//!
//! Nodes live in an arena (`Vec<Node>`) and link to each other by index.
//! Every live node is reachable exactly once through the level-0 chain;
//! the higher levels are shortcuts. Freed slots are recycled.
//!
//! `SkipList` itself is unsynchronized (`&mut self` for writes).
//! `SkipListStore` puts the whole list behind one RwLock.

use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::{KvStore, ENTRY_OVERHEAD};
use crate::config::{Config, SKIPLIST_MAX_LEVEL};
use crate::error::{KvError, Result};

/// Arena index of the head sentinel
const HEAD: usize = 0;

/// Default promotion probability (LevelDB uses 1/4 as well)
pub const DEFAULT_PROMOTION: f64 = 0.25;

struct Node {
    key: String,
    value: String,
    /// Next node at each level this node was promoted to
    forward: Vec<Option<usize>>,
}

/// Arena-backed skip list
pub struct SkipList {
    nodes: Vec<Node>,
    free: Vec<usize>,
    /// Levels currently in use (>= 1)
    level: usize,
    max_level: usize,
    promotion: f64,
    len: usize,
    rng: StdRng,
}

impl SkipList {
    /// Create an empty list. `seed = None` draws a seed from the OS.
    pub fn new(max_level: usize, promotion: f64, seed: Option<u64>) -> Self {
        let max_level = max_level.clamp(1, SKIPLIST_MAX_LEVEL);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let head = Node {
            key: String::new(),
            value: String::new(),
            forward: vec![None; max_level],
        };
        Self {
            nodes: vec![head],
            free: Vec::new(),
            level: 1,
            max_level,
            promotion,
            len: 0,
            rng,
        }
    }

    /// Insert or overwrite. Returns true if the key was new.
    pub fn insert(&mut self, key: &str, value: &str) -> bool {
        let mut update = self.trail(key);

        if let Some(next) = self.nodes[update[0]].forward[0] {
            if self.nodes[next].key == key {
                self.nodes[next].value = value.to_string();
                return false;
            }
        }

        let height = self.random_level();
        if height > self.level {
            for slot in update.iter_mut().take(height).skip(self.level) {
                *slot = HEAD;
            }
            debug!(from = self.level, to = height, "skiplist level grew");
            self.level = height;
        }

        let idx = self.alloc(key, value, height);
        for (i, &prev) in update.iter().enumerate().take(height) {
            self.nodes[idx].forward[i] = self.nodes[prev].forward[i];
            self.nodes[prev].forward[i] = Some(idx);
        }
        self.len += 1;
        true
    }

    /// Look up a key
    pub fn get(&self, key: &str) -> Option<&str> {
        let prev = self.trail(key)[0];
        self.nodes[prev]
            .forward[0]
            .filter(|&n| self.nodes[n].key == key)
            .map(|n| self.nodes[n].value.as_str())
    }

    /// Unlink a key at every level it appears on. Returns its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let update = self.trail(key);
        let target = self.nodes[update[0]]
            .forward[0]
            .filter(|&n| self.nodes[n].key == key)?;

        for (i, &prev) in update.iter().enumerate().take(self.level) {
            if self.nodes[prev].forward[i] != Some(target) {
                break;
            }
            self.nodes[prev].forward[i] = self.nodes[target].forward[i];
        }

        let before = self.level;
        while self.level > 1 && self.nodes[HEAD].forward[self.level - 1].is_none() {
            self.level -= 1;
        }
        if self.level < before {
            debug!(from = before, to = self.level, "skiplist level shrank");
        }

        self.len -= 1;
        Some(self.release(target))
    }

    /// Keys in `[start, end)`, ascending
    pub fn range(&self, start: &str, end: &str) -> Vec<String> {
        let mut keys = Vec::new();
        let mut cursor = self.nodes[self.trail(start)[0]].forward[0];
        while let Some(n) = cursor {
            let node = &self.nodes[n];
            if node.key.as_str() >= end {
                break;
            }
            keys.push(node.key.clone());
            cursor = node.forward[0];
        }
        keys
    }

    /// Entries in ascending key order
    pub fn iter(&self) -> SkipListIter<'_> {
        SkipListIter {
            list: self,
            cursor: self.nodes[HEAD].forward[0],
        }
    }

    /// Keys of the nodes linked at `level` (1-based)
    pub fn keys_at_level(&self, level: usize) -> Vec<String> {
        if level == 0 || level > self.level {
            return Vec::new();
        }
        let mut keys = Vec::new();
        let mut cursor = self.nodes[HEAD].forward[level - 1];
        while let Some(n) = cursor {
            keys.push(self.nodes[n].key.clone());
            cursor = self.nodes[n].forward[level - 1];
        }
        keys
    }

    /// Number of levels currently in use
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Approximate heap usage of live nodes
    pub fn size_bytes(&self) -> usize {
        self.iter()
            .map(|(k, v)| k.len() + v.len() + ENTRY_OVERHEAD)
            .sum::<usize>()
            + self
                .nodes
                .iter()
                .map(|n| n.forward.capacity() * std::mem::size_of::<Option<usize>>())
                .sum::<usize>()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Last node before `key` on every active level
    fn trail(&self, key: &str) -> [usize; SKIPLIST_MAX_LEVEL] {
        let mut update = [HEAD; SKIPLIST_MAX_LEVEL];
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            while let Some(next) = self.nodes[x].forward[i] {
                if self.nodes[next].key.as_str() < key {
                    x = next;
                } else {
                    break;
                }
            }
            update[i] = x;
        }
        update
    }

    /// Geometric height: 1 always, each extra level with `promotion` odds
    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level && self.rng.gen::<f64>() < self.promotion {
            level += 1;
        }
        level
    }

    fn alloc(&mut self, key: &str, value: &str, height: usize) -> usize {
        let node = Node {
            key: key.to_string(),
            value: value.to_string(),
            forward: vec![None; height],
        };
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, idx: usize) -> String {
        let node = &mut self.nodes[idx];
        node.key.clear();
        node.forward = Vec::new();
        self.free.push(idx);
        std::mem::take(&mut node.value)
    }
}

impl Default for SkipList {
    fn default() -> Self {
        Self::new(SKIPLIST_MAX_LEVEL, DEFAULT_PROMOTION, None)
    }
}

/// Iterator over skip list entries in sorted order.
///
/// Follows level-0 links only; level 0 holds every entry.
pub struct SkipListIter<'a> {
    list: &'a SkipList,
    cursor: Option<usize>,
}

impl<'a> Iterator for SkipListIter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.list.nodes[self.cursor?];
        self.cursor = node.forward[0];
        Some((node.key.as_str(), node.value.as_str()))
    }
}

/// Skip list store, shareable across threads
pub struct SkipListStore {
    list: RwLock<SkipList>,
}

impl SkipListStore {
    pub fn new() -> Self {
        Self {
            list: RwLock::new(SkipList::default()),
        }
    }

    pub fn with_config(config: &Config) -> Self {
        debug!(
            max_level = config.skiplist_max_level,
            promotion = config.skiplist_promotion,
            "opening skiplist store"
        );
        Self {
            list: RwLock::new(SkipList::new(
                config.skiplist_max_level,
                config.skiplist_promotion,
                config.skiplist_seed,
            )),
        }
    }

    /// Levels currently in use
    pub fn level(&self) -> usize {
        self.list.read().level()
    }
}

impl Default for SkipListStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for SkipListStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.list.write().insert(key, value);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<String> {
        self.list
            .read()
            .get(key)
            .map(str::to_string)
            .ok_or(KvError::NotFound)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.list
            .write()
            .remove(key)
            .map(|_| ())
            .ok_or(KvError::NotFound)
    }

    fn range(&self, start: &str, end: &str) -> Result<Vec<String>> {
        Ok(self.list.read().range(start, end))
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "skiplist"
    }

    fn len(&self) -> usize {
        self.list.read().len()
    }

    fn approximate_bytes(&self) -> usize {
        self.list.read().size_bytes()
    }
}
