//! Driver lifecycle and commit semantics.

use linereduce::config::JobConfig;
use linereduce::testing::*;
use linereduce::*;
use std::fs;
use tempfile::TempDir;

fn wordcount() -> Job {
    Job::new("wordcount", WordCount, Sum).with_combiner(Sum)
}

#[test]
fn test_state_transitions_on_success() -> anyhow::Result<()> {
    let (sink, handle) = MemorySink::new();
    let mut driver = Driver::new(wordcount(), RunnerConfig::sequential());
    assert_eq!(driver.state(), JobState::Configured);

    driver.run(&RecordSource::from_lines(["a b a"]), Box::new(sink))?;
    assert_eq!(driver.state(), JobState::Completed);
    assert!(handle.is_committed());
    assert_eq!(handle.lines(), vec!["a\t2", "b\t1"]);
    Ok(())
}

#[test]
fn test_driver_runs_only_once() -> anyhow::Result<()> {
    let source = RecordSource::from_lines(["a"]);
    let mut driver = Driver::new(wordcount(), RunnerConfig::sequential());
    driver.run(&source, Box::new(MemorySink::new().0))?;

    let err = driver
        .run(&source, Box::new(MemorySink::new().0))
        .unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(driver.state(), JobState::Completed);
    Ok(())
}

#[test]
fn test_reduce_error_fails_without_commit() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let target = dir.path().join("out.txt");

    // Pattern finder emits null values; Sum cannot add them.
    let job = Job::new("broken", PatternFinder::new("cool"), Sum);
    let mut driver = Driver::new(job, RunnerConfig::sequential());
    let err = driver
        .run(
            &RecordSource::from_lines(["cool"]),
            Box::new(FileSink::create(&target)?),
        )
        .unwrap_err();

    assert!(matches!(err, PipelineError::Reduce { .. }));
    assert_eq!(driver.state(), JobState::Failed);
    assert!(!target.exists());
    assert_eq!(fs::read_dir(dir.path())?.count(), 0, "staging file left behind");
    Ok(())
}

#[test]
fn test_missing_input_fails_without_commit() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let present = dir.path().join("present.txt");
    fs::write(&present, "a b\n")?;
    let target = dir.path().join("out.txt");

    let source = RecordSource::from_files([present, dir.path().join("vanished.txt")]);
    let mut driver = Driver::new(wordcount(), RunnerConfig::sequential());
    let err = driver
        .run(&source, Box::new(FileSink::create(&target)?))
        .unwrap_err();

    assert!(matches!(err, PipelineError::SourceUnavailable { .. }));
    assert_eq!(driver.state(), JobState::Failed);
    assert!(!target.exists());
    Ok(())
}

#[test]
fn test_failed_run_keeps_previous_output() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let target = dir.path().join("out.txt");
    fs::write(&target, "previous\n")?;

    let job = Job::new("broken", PatternFinder::new("cool"), Sum);
    let mut driver = Driver::new(job, RunnerConfig::sequential());
    assert!(
        driver
            .run(
                &RecordSource::from_lines(["cool"]),
                Box::new(FileSink::create(&target)?)
            )
            .is_err()
    );
    assert_eq!(fs::read_to_string(&target)?, "previous\n");
    Ok(())
}

#[test]
fn test_rerun_is_byte_identical() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("crimes.tsv");
    fs::write(&input, sample_crime_rows().join("\n"))?;
    let target = dir.path().join("out").join("result.kml");

    let mut outputs = Vec::new();
    for _ in 0..2 {
        let job = workload::named("assault-kml", &JobConfig::default())?;
        let mut driver = Driver::new(job, RunnerConfig::sequential());
        driver.run(
            &RecordSource::from_files([&input]),
            Box::new(FileSink::create(&target)?),
        )?;
        outputs.push(fs::read(&target)?);
    }
    assert_eq!(outputs[0], outputs[1]);
    assert!(!outputs[0].is_empty());
    Ok(())
}

#[test]
fn test_report_counts() -> anyhow::Result<()> {
    let out = run_lines(wordcount(), ["a b", "", "c a"])?;
    let m = out.report.metrics;
    assert_eq!(m.lines_read, 3);
    assert_eq!(m.malformed_records, 0);
    assert_eq!(m.emitted, 4);
    assert_eq!(m.groups, 3);
    assert_eq!(m.records_written, 3);
    assert!(m.elapsed_ms.is_some());
    Ok(())
}

#[test]
fn test_lines_from_several_inputs_keep_input_order() -> anyhow::Result<()> {
    let source = RecordSource::default()
        .with_text("first", "x y\n")
        .with_text("second", "y z\n");
    let out = run_in_memory(wordcount(), &source, RunnerConfig::sequential())?;
    assert_eq!(out.lines(), vec!["x\t1", "y\t2", "z\t1"]);
    Ok(())
}
