//! Fixed-width weather-station records (NCDC layout).
//!
//! Columns used, as byte ranges: year `[15, 19)`, signed air temperature in
//! tenths `[87, 92)` (the sign byte is `+` or `-`), quality code `[92]`.

use crate::config::JobConfig;
use crate::error::MalformedRecord;
use crate::mapper::{Emitter, Mapper};
use crate::record::{Key, Line, Value};
use std::ops::Range;

const YEAR: Range<usize> = 15..19;
const SIGN: usize = 87;
const TEMPERATURE_END: usize = 92;
const QUALITY: usize = 92;
const MIN_LEN: usize = QUALITY + 1;

/// Emits `(year, temperature)` for readings that are present and of
/// acceptable quality.
#[derive(Clone, Debug)]
pub struct TemperatureExtractor {
    accepted_quality: Vec<char>,
    missing: i64,
    divisor: i64,
}

impl TemperatureExtractor {
    /// `accepted_quality` is matched against the single quality byte, so only
    /// ASCII codes can ever match; [`JobConfig::validate`] rejects the rest.
    pub fn new(accepted_quality: &[char], missing: i64) -> Self {
        Self {
            accepted_quality: accepted_quality.to_vec(),
            missing,
            divisor: 1,
        }
    }

    pub fn from_config(config: &JobConfig) -> Self {
        Self::new(&config.accepted_quality_codes, config.missing_temperature)
    }

    /// Divide every emitted reading by `divisor` (integer division). The
    /// missing-value check always sees the raw reading.
    pub fn scaled_by(mut self, divisor: i64) -> Self {
        self.divisor = divisor.max(1);
        self
    }

    /// Parse one record into `(year, raw reading, quality code)`.
    pub fn parse<'a>(&self, text: &'a str) -> Result<(&'a str, i64, u8), MalformedRecord> {
        let bytes = text.as_bytes();
        if bytes.len() < MIN_LEN {
            return Err(MalformedRecord::LineTooShort {
                needed: MIN_LEN,
                len: bytes.len(),
            });
        }
        let year = text
            .get(YEAR)
            .filter(|y| y.is_ascii())
            .ok_or(MalformedRecord::NotAscii { column: "year" })?;

        let start = if bytes[SIGN] == b'+' { SIGN + 1 } else { SIGN };
        let raw = text
            .get(start..TEMPERATURE_END)
            .ok_or(MalformedRecord::NotAscii {
                column: "temperature",
            })?;
        let reading = raw
            .parse::<i64>()
            .map_err(|_| MalformedRecord::NotANumber {
                field: "temperature",
                text: raw.to_string(),
            })?;
        Ok((year, reading, bytes[QUALITY]))
    }
}

impl Mapper for TemperatureExtractor {
    fn name(&self) -> &'static str {
        "temperature"
    }

    fn map(&self, line: &Line, out: &mut dyn Emitter) -> Result<(), MalformedRecord> {
        let (year, reading, quality) = self.parse(&line.text)?;
        if reading != self.missing && self.accepted_quality.contains(&char::from(quality)) {
            out.emit(Key::text(year), Value::Int(reading / self.divisor));
        }
        Ok(())
    }
}
