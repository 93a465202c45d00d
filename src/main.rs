use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use linereduce::config::JobConfig;
use linereduce::driver::Driver;
use linereduce::error::PipelineError;
use linereduce::io::{RecordSource, open_sink};
use linereduce::runner::{ExecMode, RunnerConfig};
use linereduce::workload;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Run a line-oriented map/reduce job over text inputs
#[derive(Parser, Debug)]
#[command(name = "linereduce", version)]
#[command(about = "Run a built-in map/shuffle/reduce job over line-oriented text", long_about = None)]
struct Cli {
    /// Job to run (wordcount, pattern, assault-count, assault-kml,
    /// robbery-total, robbery-by-type, max-temperature, min-temperature)
    #[arg(short, long)]
    job: String,

    /// One or more inputs (files, directories, glob patterns or `-`),
    /// followed by the output path (`-` for stdout)
    #[arg(value_name = "INPUT... OUTPUT", num_args = 2.., required = true)]
    paths: Vec<String>,

    /// JSON file with job constants; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Substring searched by the pattern job
    #[arg(long)]
    substring: Option<String>,

    /// Reference point X (feet, local planar projection)
    #[arg(long, allow_negative_numbers = true)]
    ref_x: Option<f64>,

    /// Reference point Y (feet, local planar projection)
    #[arg(long, allow_negative_numbers = true)]
    ref_y: Option<f64>,

    /// Radius around the reference point, in meters
    #[arg(long)]
    radius: Option<f64>,

    /// Accepted temperature quality codes, e.g. "01459"
    #[arg(long)]
    quality_codes: Option<String>,

    /// Map batches on a thread pool
    #[arg(short, long)]
    parallel: bool,

    /// Worker threads for --parallel (default: one per CPU)
    #[arg(long, requires = "parallel")]
    threads: Option<usize>,

    /// Lines per batch in parallel mode
    #[arg(long)]
    batch_lines: Option<usize>,

    /// Save run metrics as JSON to this file
    #[arg(long)]
    metrics: Option<PathBuf>,

    /// Enable verbose output (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = if verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    } else {
        EnvFilter::new(default_level)
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .with_thread_ids(verbose >= 3)
        .init();
}

fn build_config(cli: &Cli) -> Result<JobConfig> {
    let mut config = match &cli.config {
        Some(path) => JobConfig::from_json_file(path)?,
        None => JobConfig::default(),
    };
    if let Some(s) = &cli.substring {
        config.substring = s.clone();
    }
    if let Some(x) = cli.ref_x {
        config.ref_x = x;
    }
    if let Some(y) = cli.ref_y {
        config.ref_y = y;
    }
    if let Some(r) = cli.radius {
        config.radius_meters = r;
    }
    if let Some(codes) = &cli.quality_codes {
        config.accepted_quality_codes = JobConfig::parse_quality_codes(codes)?;
    }
    config.validate()?;
    Ok(config)
}

fn build_runner(cli: &Cli) -> RunnerConfig {
    let mut runner = if cli.parallel {
        RunnerConfig {
            mode: ExecMode::Parallel {
                threads: cli.threads,
            },
            ..RunnerConfig::default()
        }
    } else {
        RunnerConfig::sequential()
    };
    if let Some(n) = cli.batch_lines {
        runner.batch_lines = n;
    }
    runner
}

fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;
    let runner = build_runner(&cli);
    runner.validate()?;
    let job = workload::named(&cli.job, &config)?;
    debug!(?job, ?runner, "job configured");

    let (inputs, output) = match cli.paths.split_last() {
        Some((output, inputs)) if !inputs.is_empty() => (inputs, output),
        _ => anyhow::bail!("expected at least one input and an output"),
    };
    let source = RecordSource::from_args(inputs)?;
    let sink = open_sink(output)?;

    let mut driver = Driver::new(job, runner);
    let report = driver.run(&source, sink)?;
    info!(job = %report.job, output = %output, "done");
    if cli.verbose > 0 {
        report.metrics.print();
    }

    // The output is already committed; a lost metrics file does not fail the job.
    if let Some(path) = &cli.metrics {
        if let Err(e) = report.metrics.save_to_file(path) {
            warn!(path = %path.display(), error = %format!("{e:#}"), "could not write metrics");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
            // Printing to a closed pipe is not worth reporting.
            let _ = e.print();
            return code;
        }
    };

    init_tracing(cli.verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("linereduce: {e:#}");
            let is_usage = e
                .downcast_ref::<PipelineError>()
                .is_some_and(PipelineError::is_configuration);
            if is_usage {
                eprintln!("Usage: linereduce [OPTIONS] --job <JOB> <INPUT>... <OUTPUT>");
                eprintln!("For more information, try '--help'.");
            }
            ExitCode::FAILURE
        }
    }
}
