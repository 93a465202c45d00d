//! Maps job names to configured [`Job`]s.
//!
//! ```
//! use linereduce::config::JobConfig;
//! use linereduce::workload;
//!
//! # fn main() -> anyhow::Result<()> {
//! let job = workload::named("wordcount", &JobConfig::default())?;
//! assert_eq!(job.mapper.name(), "word-count");
//! # Ok(())
//! # }
//! ```

use crate::config::JobConfig;
use crate::driver::Job;
use crate::error::{PipelineError, PipelineResult};
use crate::mappers::{
    CrimeCounter, CrimeKey, CrimeMatcher, CrimePlacemarks, CrimePredicate, PatternFinder,
    PlacemarkTemplate, RadiusFilter, TemperatureExtractor, WordCount,
};
use crate::record::Key;
use crate::reducers::{Distinct, GrandTotal, MarkupAssembler, Max, Min, Sum};

/// Every name [`named`] accepts.
pub const NAMES: &[&str] = &[
    "wordcount",
    "pattern",
    "assault-count",
    "assault-kml",
    "robbery-total",
    "robbery-by-type",
    "max-temperature",
    "min-temperature",
];

const ASSAULT: &str = "aggravated assault";
const ROBBERY_TYPES: [&str; 2] = ["rape", "robbery"];

fn assault_predicate(config: &JobConfig) -> CrimePredicate {
    CrimePredicate::new(&config.header_token, CrimeMatcher::contains([ASSAULT]))
        .within(RadiusFilter::from_config(config))
}

fn robbery_predicate(config: &JobConfig) -> CrimePredicate {
    CrimePredicate::new(&config.header_token, CrimeMatcher::exact(ROBBERY_TYPES))
}

/// Gets the job named `name`, built from `config`.
///
/// Returns [`None`] if no job with the given name exists.
pub fn try_named(name: &str, config: &JobConfig) -> Option<Job> {
    let job = match name {
        "wordcount" => Job::new(name, WordCount, Sum).with_combiner(Sum),
        "pattern" => Job::new(name, PatternFinder::new(&config.substring), Distinct),
        "assault-count" => Job::new(
            name,
            CrimeCounter::new(assault_predicate(config), CrimeKey::Fixed(Key::text("assault"))),
            GrandTotal,
        ),
        "assault-kml" => Job::new(
            name,
            CrimePlacemarks::new(
                assault_predicate(config),
                PlacemarkTemplate::from_config(config),
            ),
            MarkupAssembler,
        ),
        "robbery-total" => Job::new(
            name,
            CrimeCounter::new(robbery_predicate(config), CrimeKey::Fixed(Key::Null)),
            GrandTotal,
        )
        .with_combiner(Sum),
        "robbery-by-type" => Job::new(
            name,
            CrimeCounter::new(robbery_predicate(config), CrimeKey::Offense),
            Sum,
        )
        .with_combiner(Sum),
        "max-temperature" => Job::new(name, TemperatureExtractor::from_config(config), Max)
            .with_combiner(Max),
        "min-temperature" => Job::new(
            name,
            TemperatureExtractor::from_config(config).scaled_by(10),
            Min,
        )
        .with_combiner(Min),
        _ => return None,
    };
    Some(job)
}

/// Gets the job named `name`, built from `config`.
///
/// Returns a configuration error if no job with the given name exists.
pub fn named(name: &str, config: &JobConfig) -> PipelineResult<Job> {
    try_named(name, config).ok_or_else(|| {
        PipelineError::config(format!(
            "no job named `{name}` (expected one of: {})",
            NAMES.join(", ")
        ))
    })
}
