//! Run counters and reporting.
//!
//! [`JobMetrics`] is shared by reference across worker threads; every
//! counter is an atomic so batches can report without locking. After a run
//! the driver hands out a [`MetricsSnapshot`], which can be printed or saved
//! as JSON.
//!
//! ```no_run
//! use linereduce::metrics::JobMetrics;
//!
//! # fn main() -> anyhow::Result<()> {
//! let metrics = JobMetrics::new();
//! metrics.record_start();
//! metrics.add_lines_read(3);
//! metrics.record_end();
//!
//! let snapshot = metrics.snapshot();
//! snapshot.print();
//! snapshot.save_to_file("metrics.json")?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Thread-safe counters for one run.
#[derive(Debug, Default)]
pub struct JobMetrics {
    lines_read: AtomicU64,
    malformed_records: AtomicU64,
    emitted: AtomicU64,
    groups: AtomicU64,
    records_written: AtomicU64,
    timing: Mutex<Timing>,
}

#[derive(Debug, Default)]
struct Timing {
    start: Option<Instant>,
    end: Option<Instant>,
}

impl JobMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_start(&self) {
        let mut t = self.timing.lock().unwrap_or_else(PoisonError::into_inner);
        t.start = Some(Instant::now());
        t.end = None;
    }

    pub fn record_end(&self) {
        let mut t = self.timing.lock().unwrap_or_else(PoisonError::into_inner);
        t.end = Some(Instant::now());
    }

    /// Time between `record_start` and `record_end` (or now, if the run has
    /// not ended yet).
    pub fn elapsed(&self) -> Option<Duration> {
        let t = self.timing.lock().unwrap_or_else(PoisonError::into_inner);
        let start = t.start?;
        Some(t.end.unwrap_or_else(Instant::now).duration_since(start))
    }

    pub fn add_lines_read(&self, n: u64) {
        self.lines_read.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_malformed(&self, n: u64) {
        self.malformed_records.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_emitted(&self, n: u64) {
        self.emitted.fetch_add(n, Ordering::Relaxed);
    }

    pub fn set_groups(&self, n: u64) {
        self.groups.store(n, Ordering::Relaxed);
    }

    pub fn set_records_written(&self, n: u64) {
        self.records_written.store(n, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lines_read: self.lines_read.load(Ordering::Relaxed),
            malformed_records: self.malformed_records.load(Ordering::Relaxed),
            emitted: self.emitted.load(Ordering::Relaxed),
            groups: self.groups.load(Ordering::Relaxed),
            records_written: self.records_written.load(Ordering::Relaxed),
            elapsed_ms: self.elapsed().map(|d| d.as_millis() as u64),
        }
    }
}

/// Point-in-time copy of [`JobMetrics`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Lines handed to the mapper.
    pub lines_read: u64,
    /// Lines the mapper rejected and the run skipped.
    pub malformed_records: u64,
    /// Mapper emissions, before any combining.
    pub emitted: u64,
    /// Groups handed to the reducer.
    pub groups: u64,
    /// Output records written to the sink.
    pub records_written: u64,
    /// Wall-clock run time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
}

impl MetricsSnapshot {
    /// Print a summary to stderr; stdout may carry job output.
    pub fn print(&self) {
        eprintln!("\n========== Job Metrics ==========");
        if let Some(ms) = self.elapsed_ms {
            eprintln!("Elapsed: {ms} ms");
            eprintln!("---------------------------------");
        }
        eprintln!("lines_read: {}", self.lines_read);
        eprintln!("malformed_records: {}", self.malformed_records);
        eprintln!("emitted: {}", self.emitted);
        eprintln!("groups: {}", self.groups);
        eprintln!("records_written: {}", self.records_written);
        eprintln!("=================================\n");
    }

    /// Save the snapshot as pretty-printed JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file =
            File::create(path).with_context(|| format!("create metrics file {}", path.display()))?;
        let mut w = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut w, self).context("serialize metrics")?;
        w.write_all(b"\n")?;
        w.flush()?;
        Ok(())
    }
}
