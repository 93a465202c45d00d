//! Run a job in memory and look at what it committed.

use crate::driver::{Driver, Job, JobReport};
use crate::error::PipelineResult;
use crate::io::{MemorySink, RecordSource};
use crate::runner::RunnerConfig;

/// Committed output of an in-memory run.
#[derive(Clone, Debug)]
pub struct RunOutput {
    pub text: String,
    pub report: JobReport,
}

impl RunOutput {
    /// Output split into lines.
    pub fn lines(&self) -> Vec<&str> {
        self.text.lines().collect()
    }
}

/// Run `job` over `source` into a [`MemorySink`].
pub fn run_in_memory(
    job: Job,
    source: &RecordSource,
    runner: RunnerConfig,
) -> PipelineResult<RunOutput> {
    let (sink, handle) = MemorySink::new();
    let mut driver = Driver::new(job, runner);
    let report = driver.run(source, Box::new(sink))?;
    Ok(RunOutput {
        text: handle.text().unwrap_or_default(),
        report,
    })
}

/// Run `job` over the given lines, sequentially.
pub fn run_lines<S: AsRef<str>>(
    job: Job,
    lines: impl IntoIterator<Item = S>,
) -> PipelineResult<RunOutput> {
    run_in_memory(job, &RecordSource::from_lines(lines), RunnerConfig::sequential())
}

/// Assert two runs committed byte-identical output.
///
/// # Panics
///
/// If the outputs differ.
pub fn assert_same_output(left: &RunOutput, right: &RunOutput) {
    assert_eq!(
        left.text, right.text,
        "outputs of {} and {} differ",
        left.report.job, right.report.job
    );
}
