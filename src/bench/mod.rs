//! Workload Driver Module
//!
//! Drives any `KvStore` through the contract and measures it.
//!
//! ## Phases
//! 1. Generate `num_keys` keys (random, sequential or zipfian) and one value
//! 2. `concurrency` workers write every key (worker c takes c, c+N, c+2N, ...)
//! 3. Sample the store's footprint
//! 4. Same workers read every key back, timing each read
//!
//! Any store error aborts the run.
//!
//! ## Report Format
//! ```text
//! Store,NumKeys,Concurrency,Writes/sec,AvgReadLatency(ms),MemAllocBytes
//! hash,1000000,4,2488301.11,0.00,150000000
//! ```

mod report;
mod runner;
mod workload;

pub use report::{write_report, write_table, REPORT_HEADER};
pub use runner::{run_benchmark, BenchResult};
pub use workload::{generate_keys, generate_value, Workload, Zipf};
