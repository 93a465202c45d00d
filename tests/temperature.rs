//! Fixed-width temperature extraction and the min/max reducers.

use linereduce::config::JobConfig;
use linereduce::error::{MalformedRecord, PipelineError};
use linereduce::reducers::reduce_all;
use linereduce::testing::*;
use linereduce::*;

fn extractor() -> TemperatureExtractor {
    TemperatureExtractor::from_config(&JobConfig::default())
}

fn group(key: &str, values: &[i64]) -> Group {
    Group {
        key: Key::text(key),
        values: values.iter().map(|v| Value::Int(*v)).collect(),
    }
}

#[test]
fn test_extracts_year_and_reading() -> anyhow::Result<()> {
    let pairs = map_line(&extractor(), &Line::new(0, 0, weather_line(1950, 50, '1')))?;
    assert_eq!(pairs, vec![KeyValue::new("1950", 50i64)]);
    Ok(())
}

#[test]
fn test_negative_reading() -> anyhow::Result<()> {
    let pairs = map_line(&extractor(), &Line::new(0, 0, weather_line(1901, -78, '1')))?;
    assert_eq!(pairs, vec![KeyValue::new("1901", -78i64)]);
    Ok(())
}

#[test]
fn test_missing_and_rejected_quality_are_dropped() -> anyhow::Result<()> {
    assert!(map_line(&extractor(), &Line::new(0, 0, weather_line(1950, 9999, '1')))?.is_empty());
    assert!(map_line(&extractor(), &Line::new(0, 0, weather_line(1950, 10, '2')))?.is_empty());
    for q in ['0', '1', '4', '5', '9'] {
        let pairs = map_line(&extractor(), &Line::new(0, 0, weather_line(1950, 10, q)))?;
        assert_eq!(pairs.len(), 1, "quality {q}");
    }
    Ok(())
}

#[test]
fn test_short_line_is_malformed() {
    let err = map_line(&extractor(), &Line::new(0, 0, "0029029070999991901")).unwrap_err();
    assert_eq!(
        err,
        MalformedRecord::LineTooShort {
            needed: 93,
            len: 19
        }
    );
}

#[test]
fn test_non_numeric_reading_is_malformed() {
    let mut line = weather_line(1950, 50, '1');
    line.replace_range(88..92, "00x0");
    let err = map_line(&extractor(), &Line::new(0, 0, line)).unwrap_err();
    assert!(matches!(
        err,
        MalformedRecord::NotANumber {
            field: "temperature",
            ..
        }
    ));
}

#[test]
fn test_max_and_min_fold() -> anyhow::Result<()> {
    let max = reduce_all(&Max, vec![group("1950", &[50, 72, -3])])?;
    assert_eq!(max, vec![OutputRecord::new(Key::text("1950"), Value::Int(72))]);

    let min = reduce_all(&Min, vec![group("1950", &[50, 72, -3])])?;
    assert_eq!(min, vec![OutputRecord::new(Key::text("1950"), Value::Int(-3))]);
    Ok(())
}

#[test]
fn test_max_temperature_job() -> anyhow::Result<()> {
    let job = workload::named("max-temperature", &JobConfig::default())?;
    let out = run_lines(job, sample_weather_lines())?;
    assert_eq!(out.lines(), vec!["1949\t111", "1950\t22"]);
    Ok(())
}

#[test]
fn test_min_temperature_job_scales_readings() -> anyhow::Result<()> {
    let job = workload::named("min-temperature", &JobConfig::default())?;
    let out = run_lines(job, sample_weather_lines())?;
    // 78 -> 7 and -11 -> -1 (integer division truncates toward zero).
    assert_eq!(out.lines(), vec!["1949\t7", "1950\t-1"]);
    Ok(())
}

#[test]
fn test_scaling_happens_after_missing_check() -> anyhow::Result<()> {
    let scaled = extractor().scaled_by(10);
    assert!(map_line(&scaled, &Line::new(0, 0, weather_line(1950, 9999, '1')))?.is_empty());
    let pairs = map_line(&scaled, &Line::new(0, 0, weather_line(1950, 9990, '1')))?;
    assert_eq!(pairs, vec![KeyValue::new("1950", 999i64)]);
    Ok(())
}

#[test]
fn test_malformed_lines_are_counted_not_fatal() -> anyhow::Result<()> {
    let mut lines = sample_weather_lines();
    lines.push("too short".to_string());
    lines.push(String::new());
    let job = workload::named("max-temperature", &JobConfig::default())?;
    let out = run_lines(job, lines)?;
    assert_eq!(out.lines(), vec!["1949\t111", "1950\t22"]);
    assert_eq!(out.report.metrics.malformed_records, 2);
    assert_eq!(out.report.metrics.lines_read, 9);
    Ok(())
}

#[test]
fn test_wrong_value_kind_fails_reduce() {
    let err = reduce_all(
        &Sum,
        vec![Group {
            key: Key::text("k"),
            values: vec![Value::Int(1), Value::Text("x".into())],
        }],
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::Reduce { stage: "sum", .. }));
}

#[test]
fn test_custom_quality_codes() -> anyhow::Result<()> {
    let config = JobConfig {
        accepted_quality_codes: JobConfig::parse_quality_codes("2")?,
        ..JobConfig::default()
    };
    let job = workload::named("max-temperature", &config)?;
    let out = run_lines(job, sample_weather_lines())?;
    assert_eq!(out.lines(), vec!["1949\t500"]);
    Ok(())
}
