//! Key and value generation

use std::fmt;
use std::str::FromStr;

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::config::Config;
use crate::error::{KvError, Result};

/// Key distribution of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workload {
    /// Uniformly random alphanumeric keys of `key_size` characters
    Random,

    /// `key-0000`, `key-0001`, ... zero-padded to the width of `num_keys`
    Sequential,

    /// `key-%06d` indices drawn from a Zipf(s = 1.2, v = 1) distribution
    Zipfian,
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Workload::Random => "random",
            Workload::Sequential => "sequential",
            Workload::Zipfian => "zipfian",
        })
    }
}

impl FromStr for Workload {
    type Err = KvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Workload::Random),
            "sequential" | "seq" => Ok(Workload::Sequential),
            "zipfian" | "zipf" => Ok(Workload::Zipfian),
            other => Err(KvError::Config(format!("unknown workload '{}'", other))),
        }
    }
}

/// Keys for one run, laid out by index
pub fn generate_keys<R: Rng>(config: &Config, rng: &mut R) -> Vec<String> {
    let n = config.num_keys;
    match config.workload {
        Workload::Sequential => {
            let width = n.to_string().len();
            (0..n).map(|i| format!("key-{:0width$}", i, width = width)).collect()
        }
        Workload::Zipfian => {
            let zipf = Zipf::new(1.2, 1.0, n.saturating_sub(1) as u64);
            (0..n).map(|_| format!("key-{:06}", zipf.sample(rng))).collect()
        }
        Workload::Random => (0..n).map(|_| alphanumeric(rng, config.key_size)).collect(),
    }
}

/// The value written under every key of a run
pub fn generate_value<R: Rng>(config: &Config, rng: &mut R) -> String {
    alphanumeric(rng, config.value_size)
}

fn alphanumeric<R: Rng>(rng: &mut R, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Zipf distribution over `0..=imax` with `P(k) ∝ (v + k)^-s`.
///
/// Sampled by inverting a precomputed cumulative table.
pub struct Zipf {
    cumulative: Vec<f64>,
}

impl Zipf {
    pub fn new(s: f64, v: f64, imax: u64) -> Self {
        let mut total = 0.0;
        let cumulative = (0..=imax)
            .map(|k| {
                total += (v + k as f64).powf(-s);
                total
            })
            .collect();
        Self { cumulative }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let target = rng.gen::<f64>() * total;
        let idx = self.cumulative.partition_point(|&c| c <= target);
        idx.min(self.cumulative.len().saturating_sub(1)) as u64
    }
}
