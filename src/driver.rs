//! The job driver.
//!
//! A [`Driver`] owns one configured [`Job`] and runs it exactly once:
//!
//! ```text
//! Configured ──run──▶ Running ──ok──▶ Completed
//!                        │
//!                        └──error──▶ Failed
//! ```
//!
//! Output is staged in the sink and committed only after the last record
//! was written. A run that fails drops the sink uncommitted, so nothing
//! appears at the destination.

use crate::error::{PipelineError, PipelineResult};
use crate::io::{RecordSource, Sink};
use crate::mapper::Mapper;
use crate::metrics::{JobMetrics, MetricsSnapshot};
use crate::reducers::{Combiner, Reducer};
use crate::runner::{MapStage, Runner, RunnerConfig};
use std::fmt::{Display, Formatter, Result as FormatResult};
use tracing::{info, warn};

/// A mapper, an optional combiner and a reducer.
pub struct Job {
    pub name: String,
    pub mapper: Box<dyn Mapper>,
    pub combiner: Option<Box<dyn Combiner>>,
    pub reducer: Box<dyn Reducer>,
}

impl Job {
    pub fn new(
        name: impl Into<String>,
        mapper: impl Mapper + 'static,
        reducer: impl Reducer + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            mapper: Box::new(mapper),
            combiner: None,
            reducer: Box::new(reducer),
        }
    }

    #[must_use]
    pub fn with_combiner(mut self, combiner: impl Combiner + 'static) -> Self {
        self.combiner = Some(Box::new(combiner));
        self
    }
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        f.debug_struct("Job")
            .field("name", &self.name)
            .field("mapper", &self.mapper.name())
            .field("combiner", &self.combiner.as_ref().map(|c| c.name()))
            .field("reducer", &self.reducer.name())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobState {
    Configured,
    Running,
    Completed,
    Failed,
}

impl Display for JobState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        f.write_str(match self {
            Self::Configured => "configured",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        })
    }
}

/// Summary of a completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobReport {
    pub job: String,
    pub metrics: MetricsSnapshot,
}

pub struct Driver {
    job: Job,
    runner: Runner,
    state: JobState,
    metrics: JobMetrics,
}

impl Driver {
    pub fn new(job: Job, runner: RunnerConfig) -> Self {
        Self {
            job,
            runner: Runner::new(runner),
            state: JobState::Configured,
            metrics: JobMetrics::new(),
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    /// Counters of the current or last run.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Run the job over `source`, writing into `sink`.
    ///
    /// Fails with a configuration error if this driver already ran.
    pub fn run(&mut self, source: &RecordSource, sink: Box<dyn Sink>) -> PipelineResult<JobReport> {
        if self.state != JobState::Configured {
            return Err(PipelineError::config(format!(
                "job {} cannot run: driver is {}",
                self.job.name, self.state
            )));
        }
        self.state = JobState::Running;
        self.metrics.record_start();
        info!(
            job = %self.job.name,
            mapper = self.job.mapper.name(),
            reducer = self.job.reducer.name(),
            inputs = source.inputs().len(),
            "job started"
        );

        let result = self.execute(source, sink);
        self.metrics.record_end();
        let metrics = self.metrics.snapshot();
        match result {
            Ok(()) => {
                self.state = JobState::Completed;
                info!(
                    job = %self.job.name,
                    lines = metrics.lines_read,
                    malformed = metrics.malformed_records,
                    groups = metrics.groups,
                    records = metrics.records_written,
                    elapsed_ms = metrics.elapsed_ms.unwrap_or(0),
                    "job completed"
                );
                Ok(JobReport {
                    job: self.job.name.clone(),
                    metrics,
                })
            }
            Err(e) => {
                self.state = JobState::Failed;
                warn!(job = %self.job.name, error = %e, "job failed; output not committed");
                Err(e)
            }
        }
    }

    fn execute(&self, source: &RecordSource, mut sink: Box<dyn Sink>) -> PipelineResult<()> {
        let stage = MapStage {
            mapper: self.job.mapper.as_ref(),
            combiner: self.job.combiner.as_deref(),
            grouping: self.job.reducer.grouping(),
            metrics: &self.metrics,
        };
        let shuffle = self.runner.shuffle(source, &stage)?;
        if self.metrics.snapshot().lines_read == 0 {
            warn!(job = %self.job.name, "input contained no lines");
        }

        let groups = shuffle.into_groups();
        self.metrics.set_groups(groups.len() as u64);
        let mut write_err = None;
        for group in groups {
            self.job
                .reducer
                .reduce(&group.key, group.values, &mut |record| {
                    if write_err.is_some() {
                        return;
                    }
                    if let Err(e) = sink.write(&record) {
                        write_err = Some(e);
                    }
                })?;
            if let Some(e) = write_err.take() {
                return Err(e);
            }
        }
        self.metrics.set_records_written(sink.records_written());
        sink.commit()
    }
}
