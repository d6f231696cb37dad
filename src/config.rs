//! Configuration for FastKV
//!
//! Centralized configuration with sensible defaults, covering both the
//! store tuning knobs and the workload driver parameters.

use std::path::PathBuf;

use crate::bench::Workload;
use crate::error::{KvError, Result};

/// Hard cap on skip list height
pub const SKIPLIST_MAX_LEVEL: usize = 16;

/// Main configuration for a FastKV run
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // LSM Configuration
    // -------------------------------------------------------------------------
    /// Number of memtable entries that triggers a synchronous flush
    pub lsm_flush_threshold: usize,

    /// How the LSM store records deletions
    pub lsm_tombstones: TombstoneMode,

    // -------------------------------------------------------------------------
    // Skip List Configuration
    // -------------------------------------------------------------------------
    /// Maximum number of levels a node may be promoted to (1..=16)
    pub skiplist_max_level: usize,

    /// Probability of promoting a node one more level
    pub skiplist_promotion: f64,

    /// Seed for the per-instance level generator (None = from entropy)
    pub skiplist_seed: Option<u64>,

    // -------------------------------------------------------------------------
    // Workload Configuration
    // -------------------------------------------------------------------------
    /// Keys generated per store
    pub num_keys: usize,

    /// Worker threads issuing operations
    pub concurrency: usize,

    /// Key distribution
    pub workload: Workload,

    /// Characters per random key
    pub key_size: usize,

    /// Characters per value
    pub value_size: usize,

    /// Seed for key/value generation (None = from entropy)
    pub seed: Option<u64>,

    /// Where the delimited results table is written
    pub report_path: PathBuf,
}

/// Deletion strategy of the LSM store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TombstoneMode {
    /// Deletions are explicit markers, distinct from empty values
    Explicit,

    /// Deletions write an empty value; an empty value reads back as present
    EmptyValue,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lsm_flush_threshold: 1000,
            lsm_tombstones: TombstoneMode::Explicit,
            skiplist_max_level: SKIPLIST_MAX_LEVEL,
            skiplist_promotion: 0.25,
            skiplist_seed: None,
            num_keys: 1_000_000,
            concurrency: 4,
            workload: Workload::Random,
            key_size: 16,
            value_size: 128,
            seed: None,
            report_path: PathBuf::from("bench/results.csv"),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject values no store or driver can run with
    pub fn validate(&self) -> Result<()> {
        if self.lsm_flush_threshold == 0 {
            return Err(KvError::Config("lsm_flush_threshold must be > 0".into()));
        }
        if self.skiplist_max_level == 0 || self.skiplist_max_level > SKIPLIST_MAX_LEVEL {
            return Err(KvError::Config(format!(
                "skiplist_max_level must be in 1..={}",
                SKIPLIST_MAX_LEVEL
            )));
        }
        if !(self.skiplist_promotion > 0.0 && self.skiplist_promotion < 1.0) {
            return Err(KvError::Config(
                "skiplist_promotion must be in (0, 1)".into(),
            ));
        }
        if self.num_keys == 0 {
            return Err(KvError::Config("num_keys must be > 0".into()));
        }
        if self.concurrency == 0 {
            return Err(KvError::Config("concurrency must be > 0".into()));
        }
        if self.workload == Workload::Random && self.key_size == 0 {
            return Err(KvError::Config("key_size must be > 0 for random keys".into()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the LSM flush threshold (in entries)
    pub fn lsm_flush_threshold(mut self, entries: usize) -> Self {
        self.config.lsm_flush_threshold = entries;
        self
    }

    /// Set the LSM deletion strategy
    pub fn lsm_tombstones(mut self, mode: TombstoneMode) -> Self {
        self.config.lsm_tombstones = mode;
        self
    }

    /// Set the skip list height cap
    pub fn skiplist_max_level(mut self, level: usize) -> Self {
        self.config.skiplist_max_level = level;
        self
    }

    /// Set the skip list promotion probability
    pub fn skiplist_promotion(mut self, p: f64) -> Self {
        self.config.skiplist_promotion = p;
        self
    }

    /// Seed the skip list level generator
    pub fn skiplist_seed(mut self, seed: u64) -> Self {
        self.config.skiplist_seed = Some(seed);
        self
    }

    /// Set the number of keys per run
    pub fn num_keys(mut self, n: usize) -> Self {
        self.config.num_keys = n;
        self
    }

    /// Set the number of worker threads
    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n;
        self
    }

    /// Set the key distribution
    pub fn workload(mut self, workload: Workload) -> Self {
        self.config.workload = workload;
        self
    }

    /// Set the random key length
    pub fn key_size(mut self, size: usize) -> Self {
        self.config.key_size = size;
        self
    }

    /// Set the value length
    pub fn value_size(mut self, size: usize) -> Self {
        self.config.value_size = size;
        self
    }

    /// Seed key and value generation
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Set the report output path
    pub fn report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.report_path = path.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
