//! Map + shuffle execution.
//!
//! The runner drives a [`Mapper`] over a [`RecordSource`] and returns the
//! filled [`Shuffle`]. Two modes:
//!
//! - [`ExecMode::Sequential`] maps every line on the calling thread into one
//!   shuffle; the combiner (if any) then runs once per complete group.
//! - [`ExecMode::Parallel`] reads lines in batches. Each wave of batches is
//!   mapped on a rayon pool, every batch into its own local shuffle with the
//!   combiner applied locally. Local shuffles are merged in batch order, so
//!   the result is identical to the sequential one.
//!
//! Malformed lines never abort a run: they are counted and logged at
//! `debug`.

use crate::error::{PipelineError, PipelineResult};
use crate::io::RecordSource;
use crate::mapper::{map_line, Mapper};
use crate::metrics::JobMetrics;
use crate::record::Line;
use crate::reducers::Combiner;
use crate::shuffle::{GroupingMode, Shuffle};
use anyhow::anyhow;
use rayon::prelude::*;
use tracing::debug;

/// Lines per batch when none is configured.
pub const DEFAULT_BATCH_LINES: usize = 8192;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecMode {
    #[default]
    Sequential,
    /// `threads: None` uses one thread per CPU.
    Parallel { threads: Option<usize> },
}

/// Execution settings, separate from the job's own constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunnerConfig {
    pub mode: ExecMode,
    pub batch_lines: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            mode: ExecMode::Sequential,
            batch_lines: DEFAULT_BATCH_LINES,
        }
    }
}

impl RunnerConfig {
    pub fn sequential() -> Self {
        Self::default()
    }

    pub fn parallel(threads: Option<usize>) -> Self {
        Self {
            mode: ExecMode::Parallel { threads },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_batch_lines(mut self, batch_lines: usize) -> Self {
        self.batch_lines = batch_lines;
        self
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.batch_lines == 0 {
            return Err(PipelineError::config("batch size must be at least one line"));
        }
        if let ExecMode::Parallel { threads: Some(0) } = self.mode {
            return Err(PipelineError::config("thread count must be at least one"));
        }
        Ok(())
    }
}

/// What a run needs to produce a shuffle.
pub struct MapStage<'a> {
    pub mapper: &'a dyn Mapper,
    pub combiner: Option<&'a dyn Combiner>,
    pub grouping: GroupingMode,
    pub metrics: &'a JobMetrics,
}

pub struct Runner {
    pub config: RunnerConfig,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(RunnerConfig::default())
    }
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Map every line of `source` and group the emissions.
    pub fn shuffle(&self, source: &RecordSource, stage: &MapStage<'_>) -> PipelineResult<Shuffle> {
        self.config.validate()?;
        match self.config.mode {
            ExecMode::Sequential => exec_seq(source, stage),
            ExecMode::Parallel { threads } => {
                let threads = threads.unwrap_or_else(num_cpus::get).max(1);
                exec_parallel(source, stage, threads, self.config.batch_lines)
            }
        }
    }
}

/// Map one line into `shuffle`, skipping it if the mapper rejects it.
fn map_into(line: &Line, stage: &MapStage<'_>, shuffle: &mut Shuffle) {
    match map_line(stage.mapper, line) {
        Ok(pairs) => shuffle.extend_from_line(line, pairs),
        Err(e) => {
            stage.metrics.add_malformed(1);
            debug!(
                mapper = stage.mapper.name(),
                source = line.source,
                offset = line.offset,
                error = %e,
                "skipping malformed record"
            );
        }
    }
}

/// Sequential executor (one shuffle, combiner over complete groups)
fn exec_seq(source: &RecordSource, stage: &MapStage<'_>) -> PipelineResult<Shuffle> {
    let mut shuffle = Shuffle::new(stage.grouping);
    for line in source.lines() {
        let line = line?;
        stage.metrics.add_lines_read(1);
        map_into(&line, stage, &mut shuffle);
    }
    stage.metrics.add_emitted(shuffle.emitted());
    if let Some(combiner) = stage.combiner {
        shuffle.combine(combiner)?;
    }
    Ok(shuffle)
}

/// One batch → one local shuffle
fn map_batch(batch: Vec<Line>, stage: &MapStage<'_>) -> PipelineResult<Shuffle> {
    let mut local = Shuffle::new(stage.grouping);
    stage.metrics.add_lines_read(batch.len() as u64);
    for line in &batch {
        map_into(line, stage, &mut local);
    }
    if let Some(combiner) = stage.combiner {
        local.combine(combiner)?;
    }
    Ok(local)
}

/// Parallel executor (waves of batches on a rayon pool → ordered merge)
fn exec_parallel(
    source: &RecordSource,
    stage: &MapStage<'_>,
    threads: usize,
    batch_lines: usize,
) -> PipelineResult<Shuffle> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| PipelineError::Other(anyhow!("build thread pool: {e}")))?;
    let wave_size = threads * 2;
    debug!(threads, batch_lines, "parallel map");

    let mut merged = Shuffle::new(stage.grouping);
    let mut lines = source.lines();
    let mut exhausted = false;
    while !exhausted {
        let mut wave: Vec<Vec<Line>> = Vec::with_capacity(wave_size);
        while wave.len() < wave_size {
            let mut batch = Vec::with_capacity(batch_lines);
            for line in lines.by_ref().take(batch_lines) {
                batch.push(line?);
            }
            if batch.len() < batch_lines {
                exhausted = true;
            }
            if !batch.is_empty() {
                wave.push(batch);
            }
            if exhausted {
                break;
            }
        }

        let locals: Vec<PipelineResult<Shuffle>> = pool.install(|| {
            wave.into_par_iter()
                .map(|batch| map_batch(batch, stage))
                .collect()
        });
        for local in locals {
            let local = local?;
            stage.metrics.add_emitted(local.emitted());
            merged.merge(local);
        }
    }
    Ok(merged)
}
