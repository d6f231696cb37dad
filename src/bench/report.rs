//! Results table
//!
//! Comma-delimited, one header row and one row per run.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use super::runner::BenchResult;
use crate::error::Result;

pub const REPORT_HEADER: [&str; 6] = [
    "Store",
    "NumKeys",
    "Concurrency",
    "Writes/sec",
    "AvgReadLatency(ms)",
    "MemAllocBytes",
];

/// Write the table to any sink
pub fn write_table<W: Write>(out: &mut W, results: &[BenchResult]) -> Result<()> {
    writeln!(out, "{}", REPORT_HEADER.join(","))?;
    for r in results {
        writeln!(
            out,
            "{},{},{},{:.2},{:.2},{}",
            r.store_name,
            r.num_keys,
            r.concurrency,
            r.write_ops_per_sec,
            r.avg_read_latency_ms(),
            r.mem_alloc_bytes
        )?;
    }
    Ok(())
}

/// Create (or truncate) `path` and write the table, creating parent dirs
pub fn write_report(path: &Path, results: &[BenchResult]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(File::create(path)?);
    write_table(&mut out, results)?;
    out.flush()?;

    info!(path = %path.display(), rows = results.len(), "report written");
    Ok(())
}
