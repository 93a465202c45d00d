//! Crime-record filters over tab-delimited police reports.
//!
//! Record layout (0-based fields): `0` X and `1` Y in a local planar
//! projection measured in feet, `4` offense description, `7` latitude,
//! `8` longitude. Other fields are ignored.
//!
//! Both mappers share [`CrimePredicate`]: skip the header line, require at
//! least five fields, match the offense, and optionally require the record
//! to lie strictly inside a radius around a reference point.

use crate::config::JobConfig;
use crate::error::MalformedRecord;
use crate::mapper::{Emitter, Mapper};
use crate::record::{Key, Line, Value};

const MIN_FIELDS: usize = 5;
const OFFENSE: usize = 4;
const LATITUDE: usize = 7;
const LONGITUDE: usize = 8;

/// How the offense field is matched.
#[derive(Clone, Debug, PartialEq)]
pub enum CrimeMatcher {
    /// Lowercase offense contains any of the targets.
    Contains(Vec<String>),
    /// Offense equals any of the targets, ignoring case.
    Exact(Vec<String>),
}

impl CrimeMatcher {
    pub fn contains<S: AsRef<str>>(targets: impl IntoIterator<Item = S>) -> Self {
        Self::Contains(lowercase_all(targets))
    }

    pub fn exact<S: AsRef<str>>(targets: impl IntoIterator<Item = S>) -> Self {
        Self::Exact(lowercase_all(targets))
    }

    pub fn matches(&self, offense: &str) -> bool {
        let offense = offense.to_lowercase();
        match self {
            Self::Contains(targets) => targets.iter().any(|t| offense.contains(t.as_str())),
            Self::Exact(targets) => targets.iter().any(|t| offense == *t),
        }
    }
}

fn lowercase_all<S: AsRef<str>>(targets: impl IntoIterator<Item = S>) -> Vec<String> {
    targets
        .into_iter()
        .map(|t| t.as_ref().to_lowercase())
        .collect()
}

/// Distance test against a fixed reference point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusFilter {
    pub ref_x: f64,
    pub ref_y: f64,
    pub radius_meters: f64,
    pub feet_to_meters: f64,
}

impl RadiusFilter {
    pub fn from_config(config: &JobConfig) -> Self {
        Self {
            ref_x: config.ref_x,
            ref_y: config.ref_y,
            radius_meters: config.radius_meters,
            feet_to_meters: config.feet_to_meters,
        }
    }

    /// Planar distance from the reference point, in meters.
    pub fn distance_meters(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.ref_x;
        let dy = y - self.ref_y;
        (dx * dx + dy * dy).sqrt() * self.feet_to_meters
    }

    /// Strictly inside the radius.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.distance_meters(x, y) < self.radius_meters
    }
}

fn parse_coordinate(field: &'static str, text: &str) -> Result<f64, MalformedRecord> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| MalformedRecord::NotANumber {
            field,
            text: text.to_string(),
        })
}

/// Header skip, offense match and optional radius test.
#[derive(Clone, Debug)]
pub struct CrimePredicate {
    pub header_token: String,
    pub matcher: CrimeMatcher,
    pub radius: Option<RadiusFilter>,
}

impl CrimePredicate {
    pub fn new(header_token: impl Into<String>, matcher: CrimeMatcher) -> Self {
        Self {
            header_token: header_token.into(),
            matcher,
            radius: None,
        }
    }

    pub fn within(mut self, radius: RadiusFilter) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Split `line` and decide whether it qualifies.
    ///
    /// Returns the fields of a qualifying record, `None` for header lines
    /// and non-matching records.
    pub fn select<'a>(&self, line: &'a str) -> Result<Option<Vec<&'a str>>, MalformedRecord> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields[0] == self.header_token {
            return Ok(None);
        }
        if fields.len() < MIN_FIELDS {
            return Err(MalformedRecord::TooFewFields {
                expected: MIN_FIELDS,
                found: fields.len(),
            });
        }
        if !self.matcher.matches(fields[OFFENSE]) {
            return Ok(None);
        }
        if let Some(radius) = &self.radius {
            let x = parse_coordinate("x", fields[0])?;
            let y = parse_coordinate("y", fields[1])?;
            if !radius.contains(x, y) {
                return Ok(None);
            }
        }
        Ok(Some(fields))
    }
}

/// Which key a [`CrimeCounter`] emits under.
#[derive(Clone, Debug, PartialEq)]
pub enum CrimeKey {
    /// Every match under one fixed key.
    Fixed(Key),
    /// The lowercase offense, for per-type counts.
    Offense,
}

/// Emits `(key, 1)` for every qualifying record.
#[derive(Clone, Debug)]
pub struct CrimeCounter {
    predicate: CrimePredicate,
    key: CrimeKey,
}

impl CrimeCounter {
    pub fn new(predicate: CrimePredicate, key: CrimeKey) -> Self {
        Self { predicate, key }
    }
}

impl Mapper for CrimeCounter {
    fn name(&self) -> &'static str {
        "crime-counter"
    }

    fn map(&self, line: &Line, out: &mut dyn Emitter) -> Result<(), MalformedRecord> {
        if let Some(fields) = self.predicate.select(&line.text)? {
            let key = match &self.key {
                CrimeKey::Fixed(k) => k.clone(),
                CrimeKey::Offense => Key::Text(fields[OFFENSE].to_lowercase()),
            };
            out.emit(key, Value::Int(1));
        }
        Ok(())
    }
}

/// Fixed KML placemark template; only the coordinates vary per record.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacemarkTemplate {
    pub name: String,
    pub description: String,
}

impl PlacemarkTemplate {
    pub fn from_config(config: &JobConfig) -> Self {
        Self {
            name: config.placemark_name.clone(),
            description: config.placemark_description.clone(),
        }
    }

    /// Render one placemark. `lat` and `lon` are inserted verbatim; markup
    /// characters in them are not escaped.
    pub fn render(&self, lat: &str, lon: &str) -> String {
        format!(
            "<Placemark>\n<name>{}</name>\n<description>{}</description>\n<Point>\n<coordinates>{},{},0</coordinates>\n</Point>\n</Placemark>",
            self.name, self.description, lon, lat
        )
    }
}

/// Emits one KML placemark fragment per qualifying record, under the
/// null-marker key so all fragments land in one document.
#[derive(Clone, Debug)]
pub struct CrimePlacemarks {
    predicate: CrimePredicate,
    template: PlacemarkTemplate,
}

impl CrimePlacemarks {
    pub fn new(predicate: CrimePredicate, template: PlacemarkTemplate) -> Self {
        Self { predicate, template }
    }
}

impl Mapper for CrimePlacemarks {
    fn name(&self) -> &'static str {
        "crime-placemarks"
    }

    fn map(&self, line: &Line, out: &mut dyn Emitter) -> Result<(), MalformedRecord> {
        let Some(fields) = self.predicate.select(&line.text)? else {
            return Ok(());
        };
        if fields.len() <= LONGITUDE {
            return Err(MalformedRecord::TooFewFields {
                expected: LONGITUDE + 1,
                found: fields.len(),
            });
        }
        let fragment = self.template.render(fields[LATITUDE], fields[LONGITUDE]);
        out.emit(Key::Null, Value::Text(fragment));
        Ok(())
    }
}
