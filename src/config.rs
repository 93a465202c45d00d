//! Job configuration.
//!
//! Every constant the exercises used to hard-code (search substring,
//! reference point, radius, accepted quality codes, ...) lives in
//! [`JobConfig`] and is handed to mappers at construction time.
//!
//! A config is built in three layers:
//!
//! 1. [`JobConfig::default`] -- the values the exercises shipped with.
//! 2. An optional JSON file ([`JobConfig::from_json_file`]); missing fields
//!    keep their defaults.
//! 3. Command-line overrides applied by the binary.
//!
//! [`JobConfig::validate`] runs last and rejects anything a mapper could not
//! work with.

use crate::error::{PipelineError, PipelineResult};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// X coordinate of the reference point (3803 Forbes Avenue), in feet.
pub const DEFAULT_REF_X: f64 = 1_354_326.897;
/// Y coordinate of the reference point, in feet.
pub const DEFAULT_REF_Y: f64 = 411_447.7828;
/// Radius around the reference point, in meters.
pub const DEFAULT_RADIUS_METERS: f64 = 350.0;
/// Feet to meters.
pub const FEET_TO_METERS: f64 = 0.3048;
/// Reserved temperature reading meaning "no data".
pub const MISSING_TEMPERATURE: i64 = 9999;

/// Tunable constants for the built-in mappers and reducers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Substring searched (case-insensitively) by the pattern finder.
    pub substring: String,
    /// Reference point X in the local planar projection.
    pub ref_x: f64,
    /// Reference point Y in the local planar projection.
    pub ref_y: f64,
    /// Records must lie strictly closer than this, in meters.
    pub radius_meters: f64,
    /// Factor converting projection units to meters.
    pub feet_to_meters: f64,
    /// Quality codes accepted by the temperature extractor.
    pub accepted_quality_codes: Vec<char>,
    /// Sentinel temperature reading meaning "missing".
    pub missing_temperature: i64,
    /// A tab-delimited line whose first field equals this is a header.
    pub header_token: String,
    /// `<name>` of every generated placemark.
    pub placemark_name: String,
    /// `<description>` of every generated placemark.
    pub placemark_description: String,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            substring: "cool".to_string(),
            ref_x: DEFAULT_REF_X,
            ref_y: DEFAULT_REF_Y,
            radius_meters: DEFAULT_RADIUS_METERS,
            feet_to_meters: FEET_TO_METERS,
            accepted_quality_codes: vec!['0', '1', '4', '5', '9'],
            missing_temperature: MISSING_TEMPERATURE,
            header_token: "X".to_string(),
            placemark_name: "Aggravated Assault".to_string(),
            placemark_description: "Occurred within 350 meters of 3803 Forbes Avenue in Oakland"
                .to_string(),
        }
    }
}

impl JobConfig {
    /// Load a config from a JSON file. Fields absent from the file keep
    /// their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open config {}", path.display()))
            .map_err(|e| PipelineError::config(format!("{e:#}")))?;
        serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse config {}", path.display()))
            .map_err(|e| PipelineError::config(format!("{e:#}")))
    }

    /// Parse a compact quality-code list such as `"01459"` or `"0,1,4"`.
    pub fn parse_quality_codes(spec: &str) -> PipelineResult<Vec<char>> {
        let codes: Vec<char> = spec
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .collect();
        if codes.is_empty() {
            return Err(PipelineError::config("quality code list is empty"));
        }
        check_quality_codes(&codes)?;
        Ok(codes)
    }

    /// Reject values no mapper can work with.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.substring.is_empty() {
            return Err(PipelineError::config("substring must not be empty"));
        }
        if !self.ref_x.is_finite() || !self.ref_y.is_finite() {
            return Err(PipelineError::config("reference point must be finite"));
        }
        if !self.radius_meters.is_finite() || self.radius_meters < 0.0 {
            return Err(PipelineError::config(format!(
                "radius must be a finite, non-negative number of meters (got {})",
                self.radius_meters
            )));
        }
        if !self.feet_to_meters.is_finite() || self.feet_to_meters <= 0.0 {
            return Err(PipelineError::config("unit conversion factor must be positive"));
        }
        if self.accepted_quality_codes.is_empty() {
            return Err(PipelineError::config("at least one quality code must be accepted"));
        }
        check_quality_codes(&self.accepted_quality_codes)?;
        if self.header_token.is_empty() {
            return Err(PipelineError::config("header token must not be empty"));
        }
        Ok(())
    }
}

/// Quality codes are single bytes in the record, so each must be ASCII.
fn check_quality_codes(codes: &[char]) -> PipelineResult<()> {
    match codes.iter().find(|c| !c.is_ascii()) {
        Some(bad) => Err(PipelineError::config(format!(
            "quality code {bad:?} is not an ASCII character"
        ))),
        None => Ok(()),
    }
}
