//! Parallel mode must commit exactly what sequential mode commits.

use linereduce::config::JobConfig;
use linereduce::testing::*;
use linereduce::workload::NAMES;
use linereduce::*;

fn dataset_for(job: &str) -> Vec<String> {
    match job {
        "wordcount" | "pattern" => (0..200)
            .flat_map(|i| word_corpus().into_iter().map(move |l| format!("{l} w{}", i % 7)))
            .collect(),
        "max-temperature" | "min-temperature" => (0..300)
            .map(|i| weather_line(1940 + (i % 13) as u16, (i * 37 % 700) - 300, '1'))
            .collect(),
        _ => (0..40).flat_map(|_| sample_crime_rows()).collect(),
    }
}

fn run(job: &str, runner: RunnerConfig) -> anyhow::Result<RunOutput> {
    let job = workload::named(job, &JobConfig::default())?;
    let source = RecordSource::from_lines(dataset_for(&job.name));
    Ok(run_in_memory(job, &source, runner)?)
}

#[test]
fn test_every_job_matches_sequential() -> anyhow::Result<()> {
    for name in NAMES {
        let seq = run(name, RunnerConfig::sequential())?;
        for (threads, batch) in [(1, 1), (2, 3), (4, 7), (8, 1000)] {
            let par = run(name, RunnerConfig::parallel(Some(threads)).with_batch_lines(batch))?;
            assert_same_output(&seq, &par);
            assert_eq!(seq.report.metrics.lines_read, par.report.metrics.lines_read);
            assert_eq!(seq.report.metrics.emitted, par.report.metrics.emitted);
        }
    }
    Ok(())
}

#[test]
fn test_kml_fragment_order_is_input_order() -> anyhow::Result<()> {
    let config = JobConfig::default();
    let rows: Vec<String> = (0..50)
        .map(|i| {
            crime_line(
                config.ref_x,
                config.ref_y,
                "AGGRAVATED ASSAULT",
                &format!("40.{i:03}"),
                "-79.9",
            )
        })
        .collect();
    let source = RecordSource::from_lines(&rows);
    let out = run_in_memory(
        workload::named("assault-kml", &config)?,
        &source,
        RunnerConfig::parallel(Some(4)).with_batch_lines(3),
    )?;

    let lats: Vec<&str> = out
        .text
        .lines()
        .filter_map(|l| l.strip_prefix("<coordinates>-79.9,"))
        .map(|l| l.trim_end_matches(",0</coordinates>"))
        .collect();
    let expected: Vec<String> = (0..50).map(|i| format!("40.{i:03}")).collect();
    assert_eq!(lats, expected);
    Ok(())
}

#[test]
fn test_zero_batch_size_is_rejected() {
    let err = run("wordcount", RunnerConfig::parallel(None).with_batch_lines(0)).unwrap_err();
    let err = err.downcast::<PipelineError>().unwrap();
    assert!(err.is_configuration());
}

#[test]
fn test_malformed_counts_match() -> anyhow::Result<()> {
    let mut lines = dataset_for("max-temperature");
    for i in (0..lines.len()).step_by(10) {
        lines[i] = "short".to_string();
    }
    let source = RecordSource::from_lines(&lines);
    let config = JobConfig::default();

    let seq = run_in_memory(
        workload::named("max-temperature", &config)?,
        &source,
        RunnerConfig::sequential(),
    )?;
    let par = run_in_memory(
        workload::named("max-temperature", &config)?,
        &source,
        RunnerConfig::parallel(Some(3)).with_batch_lines(4),
    )?;
    assert_same_output(&seq, &par);
    assert_eq!(seq.report.metrics.malformed_records, 30);
    assert_eq!(par.report.metrics.malformed_records, 30);
    Ok(())
}
