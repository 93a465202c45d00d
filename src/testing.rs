//! Testing utilities for line-oriented jobs.
//!
//! - **Fixtures**: builders for fixed-width weather records and tab-delimited
//!   crime records, plus small ready-made datasets
//! - **Harness**: run a [`Job`](crate::driver::Job) against a
//!   [`MemorySink`](crate::io::MemorySink) and inspect the committed text
//!
//! # Quick Start
//!
//! ```
//! use linereduce::config::JobConfig;
//! use linereduce::testing::*;
//! use linereduce::workload;
//!
//! # fn main() -> anyhow::Result<()> {
//! let job = workload::named("max-temperature", &JobConfig::default())?;
//! let out = run_lines(job, sample_weather_lines())?;
//! assert_eq!(out.lines(), vec!["1949\t111", "1950\t22"]);
//! # Ok(())
//! # }
//! ```

pub mod fixtures;
pub mod harness;

pub use fixtures::*;
pub use harness::*;
