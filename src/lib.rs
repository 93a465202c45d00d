//! # linereduce
//!
//! A **single-process map / shuffle / combine / reduce pipeline** for
//! line-oriented text records. Jobs read lines from files, directories, glob
//! patterns or stdin, map each line to `(key, value)` pairs, group the pairs
//! by key in ascending key order, optionally pre-aggregate them with a
//! combiner, reduce each group and write the results to a file or stdout.
//!
//! ## Key Features
//!
//! - **Small traits at the seams** - [`Mapper`], [`Reducer`], [`Combiner`], [`Sink`]
//! - **Built-in jobs** - word count, substring finder, crime radius filters
//!   (count and KML), per-year temperature extremes
//! - **Sequential and parallel execution** - parallel mode maps batches on a
//!   rayon pool and merges them in input order, so output is identical
//! - **All-or-nothing output** - sinks only publish on commit; a failed run
//!   leaves nothing behind
//! - **Compressed inputs** - gzip and bzip2 (optional via feature flags)
//!
//! ## Quick Start
//!
//! ```
//! use linereduce::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let source = RecordSource::from_lines(["hello world", "hello rust"]);
//! let (sink, handle) = MemorySink::new();
//!
//! let job = Job::new("wordcount", WordCount, Sum).with_combiner(Sum);
//! let mut driver = Driver::new(job, RunnerConfig::sequential());
//! driver.run(&source, Box::new(sink))?;
//!
//! assert_eq!(handle.lines(), vec!["hello\t2", "rust\t1", "world\t1"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Lines, keys and values
//!
//! A [`Line`] carries its text plus the input index and byte offset it was
//! read from. Mappers emit [`Key`]s and [`Value`]s; both have a null-marker
//! variant for jobs where only presence matters. [`Key::Null`] sorts first.
//!
//! ### Grouping
//!
//! A reducer chooses its [`GroupingMode`]: one group per key, or a single
//! group holding every emission (used for grand totals and for assembling a
//! single document).
//!
//! ### Driver
//!
//! A [`Driver`] runs a [`Job`] once and moves through
//! [`JobState`]`::{Configured, Running, Completed, Failed}`. Lines a mapper
//! cannot parse are skipped and counted; any other error fails the run.
//!
//! ### Named jobs
//!
//! [`workload::named`] builds the built-in jobs from a [`JobConfig`].

pub mod config;
pub mod driver;
pub mod error;
pub mod io;
pub mod mapper;
pub mod mappers;
pub mod metrics;
pub mod record;
pub mod reducers;
pub mod runner;
pub mod shuffle;
pub mod testing;
pub mod workload;

// Re-exports for a compact public API
pub use config::JobConfig;
pub use driver::{Driver, Job, JobReport, JobState};
pub use error::{MalformedRecord, PipelineError, PipelineResult};
pub use io::{FileSink, MemorySink, MemorySinkHandle, RecordSource, Sink, StdoutSink, open_sink};
pub use mapper::{Emitter, Mapper, VecEmitter, map_line};
pub use mappers::{
    CrimeCounter, CrimeKey, CrimeMatcher, CrimePlacemarks, CrimePredicate, PatternFinder,
    PlacemarkTemplate, RadiusFilter, TemperatureExtractor, WordCount,
};
pub use metrics::{JobMetrics, MetricsSnapshot};
pub use record::{Key, KeyValue, Line, OutputRecord, Value};
pub use reducers::{Combiner, Distinct, GrandTotal, MarkupAssembler, Max, Min, Reducer, Sum};
pub use runner::{ExecMode, Runner, RunnerConfig};
pub use shuffle::{Group, GroupingMode, Shuffle};
