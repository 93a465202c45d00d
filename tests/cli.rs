//! End-to-end runs of the `linereduce` binary.

use linereduce::testing::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_linereduce"))
}

#[test]
fn test_wordcount_to_file() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out").join("counts.txt");
    fs::write(&input, "b a\na\n")?;

    let status = bin()
        .args(["--job", "wordcount"])
        .arg(&input)
        .arg(&output)
        .status()?;
    assert!(status.success());
    assert_eq!(fs::read_to_string(&output)?, "a\t2\nb\t1\n");
    Ok(())
}

#[test]
fn test_stdout_output_and_overrides() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("crimes.tsv");
    fs::write(&input, sample_crime_rows().join("\n"))?;

    let out = bin()
        .args(["--job", "assault-count", "--radius", "0"])
        .arg(&input)
        .arg("-")
        .output()?;
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout)?, "0\n");
    Ok(())
}

#[test]
fn test_parallel_flag_and_metrics() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("weather.txt");
    fs::write(&input, sample_weather_lines().join("\n"))?;
    let metrics = dir.path().join("metrics.json");

    let out = bin()
        .args(["--job", "max-temperature", "--parallel", "--threads", "2"])
        .args(["--batch-lines", "2", "--metrics"])
        .arg(&metrics)
        .arg(&input)
        .arg("-")
        .output()?;
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout)?, "1949\t111\n1950\t22\n");

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&metrics)?)?;
    assert_eq!(json["lines_read"], serde_json::json!(7));
    Ok(())
}

#[test]
fn test_failures_exit_with_one() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let output = dir.path().join("out.txt");

    // Unknown job.
    let status = bin()
        .args(["--job", "nope", "in.txt"])
        .arg(&output)
        .status()?;
    assert_eq!(status.code(), Some(1));

    // Missing input.
    let status = bin()
        .args(["--job", "wordcount"])
        .arg(dir.path().join("absent.txt"))
        .arg(&output)
        .status()?;
    assert_eq!(status.code(), Some(1));
    assert!(!output.exists());

    // Usage error: output missing.
    let status = bin().args(["--job", "wordcount"]).status()?;
    assert_eq!(status.code(), Some(1));
    Ok(())
}

#[test]
fn test_help_exits_zero() -> anyhow::Result<()> {
    let out = bin().arg("--help").output()?;
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8(out.stdout)?.contains("--job"));
    Ok(())
}

#[test]
fn test_unwritable_metrics_keep_success() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("in.txt");
    let output = dir.path().join("counts.txt");
    fs::write(&input, "a\n")?;
    // A directory cannot be replaced by the metrics file.
    let metrics = dir.path().join("taken");
    fs::create_dir(&metrics)?;

    let status = bin()
        .args(["--job", "wordcount", "--metrics"])
        .arg(&metrics)
        .arg(&input)
        .arg(&output)
        .status()?;
    assert_eq!(status.code(), Some(0));
    assert_eq!(fs::read_to_string(&output)?, "a\t1\n");
    Ok(())
}

#[test]
fn test_non_ascii_quality_codes_in_config_file_fail() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("weather.txt");
    fs::write(&input, sample_weather_lines().join("\n"))?;
    let config = dir.path().join("job.json");
    fs::write(&config, r#"{ "accepted_quality_codes": ["é"] }"#)?;
    let output = dir.path().join("out.txt");

    let status = bin()
        .args(["--job", "max-temperature", "--config"])
        .arg(&config)
        .arg(&input)
        .arg(&output)
        .status()?;
    assert_eq!(status.code(), Some(1));
    assert!(!output.exists());
    Ok(())
}
