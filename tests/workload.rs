//! Named job registry.

use linereduce::config::JobConfig;
use linereduce::workload::{self, NAMES};
use linereduce::*;

#[test]
fn test_every_name_resolves() -> anyhow::Result<()> {
    let config = JobConfig::default();
    for name in NAMES {
        let job = workload::named(name, &config)?;
        assert_eq!(job.name, *name);
    }
    Ok(())
}

#[test]
fn test_unknown_name_is_configuration_error() {
    assert!(workload::try_named("grep", &JobConfig::default()).is_none());
    let err = workload::named("grep", &JobConfig::default()).unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("wordcount"));
}

#[test]
fn test_job_composition() -> anyhow::Result<()> {
    let config = JobConfig::default();
    let parts = |name: &str| -> anyhow::Result<(&'static str, Option<&'static str>, &'static str)> {
        let job = workload::named(name, &config)?;
        Ok((
            job.mapper.name(),
            job.combiner.as_ref().map(|c| c.name()),
            job.reducer.name(),
        ))
    };

    assert_eq!(parts("wordcount")?, ("word-count", Some("sum"), "sum"));
    assert_eq!(parts("pattern")?, ("pattern-finder", None, "distinct"));
    assert_eq!(parts("assault-count")?, ("crime-counter", None, "grand-total"));
    assert_eq!(parts("assault-kml")?, ("crime-placemarks", None, "markup"));
    assert_eq!(parts("robbery-total")?, ("crime-counter", Some("sum"), "grand-total"));
    assert_eq!(parts("robbery-by-type")?, ("crime-counter", Some("sum"), "sum"));
    assert_eq!(parts("max-temperature")?, ("temperature", Some("max"), "max"));
    assert_eq!(parts("min-temperature")?, ("temperature", Some("min"), "min"));
    Ok(())
}

#[test]
fn test_single_group_reducers() -> anyhow::Result<()> {
    let config = JobConfig::default();
    for name in ["assault-count", "assault-kml", "robbery-total"] {
        let job = workload::named(name, &config)?;
        assert_eq!(job.reducer.grouping(), GroupingMode::Single, "{name}");
    }
    let job = workload::named("robbery-by-type", &config)?;
    assert_eq!(job.reducer.grouping(), GroupingMode::PerKey);
    Ok(())
}
