//! FastKV Benchmark Binary
//!
//! Runs the workload driver against each selected store and writes the
//! results table.

use std::path::PathBuf;

use clap::Parser;
use fastkv::bench::{run_benchmark, write_report, Workload};
use fastkv::{Config, StoreKind};
use tracing_subscriber::{fmt, EnvFilter};

/// FastKV workload driver
#[derive(Parser, Debug)]
#[command(name = "fastkv-bench")]
#[command(about = "Compare in-memory key-value store backends")]
#[command(version)]
struct Args {
    /// Number of keys per store
    #[arg(short, long, default_value = "1000000")]
    num_keys: usize,

    /// Number of worker threads
    #[arg(short, long, default_value = "4")]
    concurrency: usize,

    /// Key distribution: random, sequential or zipfian
    #[arg(short, long, default_value = "random")]
    workload: Workload,

    /// Characters per random key
    #[arg(long, default_value = "16")]
    key_size: usize,

    /// Characters per value
    #[arg(long, default_value = "128")]
    value_size: usize,

    /// Stores to benchmark (comma separated)
    #[arg(
        short,
        long,
        value_delimiter = ',',
        default_value = "hash,btree,skiplist,trie,lsm"
    )]
    stores: Vec<StoreKind>,

    /// Results table path
    #[arg(short, long, default_value = "bench/results.csv")]
    out: PathBuf,

    /// Seed for key generation and skip list levels
    #[arg(long)]
    seed: Option<u64>,

    /// LSM memtable entries before a flush
    #[arg(long, default_value = "1000")]
    lsm_threshold: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,fastkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("FastKV bench v{}", fastkv::VERSION);

    // Build config from args
    let mut builder = Config::builder()
        .num_keys(args.num_keys)
        .concurrency(args.concurrency)
        .workload(args.workload)
        .key_size(args.key_size)
        .value_size(args.value_size)
        .lsm_flush_threshold(args.lsm_threshold)
        .report_path(&args.out);
    if let Some(seed) = args.seed {
        builder = builder.seed(seed).skiplist_seed(seed);
    }
    let config = builder.build();

    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let mut results = Vec::with_capacity(args.stores.len());
    for kind in &args.stores {
        println!("→ Benchmarking {:<8} store...", kind.name());
        let store = kind.open(&config);

        let res = match run_benchmark(store.as_ref(), &config) {
            Ok(res) => res,
            Err(e) => {
                tracing::error!("Benchmark {} failed: {}", kind, e);
                std::process::exit(1);
            }
        };

        println!(
            "   {}: {:.2} writes/sec, avg read latency {:.2}ms, mem alloc {} bytes",
            res.store_name,
            res.write_ops_per_sec,
            res.avg_read_latency_ms(),
            res.mem_alloc_bytes
        );
        results.push(res);
    }

    if let Err(e) = write_report(&config.report_path, &results) {
        tracing::error!("Failed to write results: {}", e);
        std::process::exit(1);
    }
    println!(
        "All benchmarks complete; results written to {}",
        config.report_path.display()
    );
}
