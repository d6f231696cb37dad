//! Benchmark runner
//!
//! Concurrent write phase, footprint sample, then concurrent timed reads.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};

use super::workload::{generate_keys, generate_value};
use crate::config::Config;
use crate::error::{KvError, Result};
use crate::store::KvStore;

/// Measurements of one run against one store
#[derive(Debug, Clone)]
pub struct BenchResult {
    pub store_name: String,
    pub num_keys: usize,
    pub concurrency: usize,
    pub write_ops_per_sec: f64,
    /// One entry per generated key, same order as the key list
    pub read_latencies: Vec<Duration>,
    pub mem_alloc_bytes: u64,
}

impl BenchResult {
    /// Mean read latency: total read time truncated to whole
    /// milliseconds, divided by the number of reads
    pub fn avg_read_latency_ms(&self) -> f64 {
        if self.read_latencies.is_empty() {
            return 0.0;
        }
        let total: Duration = self.read_latencies.iter().sum();
        total.as_millis() as f64 / self.read_latencies.len() as f64
    }
}

/// Run the write then read phases against `store`
pub fn run_benchmark(store: &dyn KvStore, config: &Config) -> Result<BenchResult> {
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let keys = generate_keys(config, &mut rng);
    let value = generate_value(config, &mut rng);
    let workers = config.concurrency;

    info!(
        store = store.name(),
        num_keys = keys.len(),
        concurrency = workers,
        workload = %config.workload,
        "write phase"
    );

    // Step 1: Concurrent writes
    let started = Instant::now();
    let writes = crossbeam::thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let keys = &keys;
                let value = value.as_str();
                s.spawn(move |_| -> Result<()> {
                    for key in keys.iter().skip(worker).step_by(workers) {
                        store
                            .set(key, value)
                            .map_err(|e| abort(store, "set", key, e))?;
                    }
                    Ok(())
                })
            })
            .collect();
        join_all(handles)
    })
    .map_err(|_| KvError::Workload("write worker panicked".into()))?;
    writes?;
    let elapsed = started.elapsed();
    let write_ops_per_sec = keys.len() as f64 / elapsed.as_secs_f64().max(f64::EPSILON);

    // Step 2: Footprint after writes, before reads
    let mem_alloc_bytes = store.approximate_bytes() as u64;

    info!(store = store.name(), "read phase");

    // Step 3: Concurrent timed reads
    let timings = crossbeam::thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let keys = &keys;
                s.spawn(move |_| -> Result<Vec<(usize, Duration)>> {
                    let mut samples = Vec::with_capacity(keys.len() / workers + 1);
                    for (i, key) in keys.iter().enumerate().skip(worker).step_by(workers) {
                        let t0 = Instant::now();
                        store.get(key).map_err(|e| abort(store, "get", key, e))?;
                        samples.push((i, t0.elapsed()));
                    }
                    Ok(samples)
                })
            })
            .collect();
        join_all(handles)
    })
    .map_err(|_| KvError::Workload("read worker panicked".into()))?;

    let mut read_latencies = vec![Duration::ZERO; keys.len()];
    for samples in timings? {
        for (i, latency) in samples {
            read_latencies[i] = latency;
        }
    }

    let result = BenchResult {
        store_name: store.name().to_string(),
        num_keys: keys.len(),
        concurrency: workers,
        write_ops_per_sec,
        read_latencies,
        mem_alloc_bytes,
    };

    info!(
        store = store.name(),
        writes_per_sec = %format!("{:.2}", result.write_ops_per_sec),
        avg_read_ms = %format!("{:.2}", result.avg_read_latency_ms()),
        mem_alloc_bytes = result.mem_alloc_bytes,
        "run complete"
    );

    Ok(result)
}

/// Join every worker, surfacing the first failure
fn join_all<T>(handles: Vec<crossbeam::thread::ScopedJoinHandle<'_, Result<T>>>) -> Result<Vec<T>> {
    let mut out = Vec::with_capacity(handles.len());
    let mut first_err = None;
    for handle in handles {
        match handle.join() {
            Ok(Ok(v)) => out.push(v),
            Ok(Err(e)) => {
                first_err.get_or_insert(e);
            }
            Err(_) => {
                first_err.get_or_insert(KvError::Workload("worker panicked".into()));
            }
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(out),
    }
}

fn abort(store: &dyn KvStore, op: &str, key: &str, err: KvError) -> KvError {
    error!(store = store.name(), op, key, %err, "store error, aborting run");
    KvError::Workload(format!("{} {} on {} store: {}", op, key, store.name(), err))
}
