//! Record builders and small datasets for the built-in jobs.

use crate::config::{DEFAULT_REF_X, DEFAULT_REF_Y};

const STATION: &str = "002902907099999";
const FILLER: &str = "010106004+64333+023450FM-12+000599999V0202701N015919999999N0000001N9";
const TRAILER: &str = "+99999102001ADDGF108991999999999999999999";

/// Build one fixed-width weather record.
///
/// The year lands in columns `[15, 19)`, the signed reading (tenths of a
/// degree) in `[87, 92)` and the quality code in column 92.
///
/// # Example
///
/// ```
/// use linereduce::testing::weather_line;
///
/// let line = weather_line(1950, 50, '1');
/// assert_eq!(&line[15..19], "1950");
/// assert_eq!(&line[87..93], "+00501");
/// ```
#[must_use]
pub fn weather_line(year: u16, temperature: i64, quality: char) -> String {
    let sign = if temperature < 0 { '-' } else { '+' };
    format!(
        "{STATION}{year:04}{FILLER}{sign}{:04}{quality}{TRAILER}",
        temperature.unsigned_abs()
    )
}

/// Header row of the crime dataset.
pub const CRIME_HEADER: &str = "X\tY\tTime\tStreet\tOffense\tDate\tTract\tLat\tLong";

/// Build one tab-delimited crime record with nine fields.
#[must_use]
pub fn crime_line(x: f64, y: f64, offense: &str, lat: &str, lon: &str) -> String {
    format!("{x}\t{y}\t1:30\t3800 BLOCK FORBES AV\t{offense}\t3/7/2011\t40500\t{lat}\t{lon}")
}

/// A small crime dataset around the default reference point.
///
/// Contains the header, three aggravated assaults within 350 m (one of them
/// spelled in lowercase), one assault far away, two robberies and one rape
/// far away, and unrelated records.
#[must_use]
pub fn sample_crime_rows() -> Vec<String> {
    let (x, y) = (DEFAULT_REF_X, DEFAULT_REF_Y);
    vec![
        CRIME_HEADER.to_string(),
        crime_line(x, y, "AGGRAVATED ASSAULT", "40.444", "-79.948"),
        crime_line(x + 300.0, y, "AGGRAVATED ASSAULT", "40.445", "-79.947"),
        crime_line(x, y - 500.0, "aggravated assault", "40.443", "-79.949"),
        crime_line(x + 5000.0, y + 5000.0, "AGGRAVATED ASSAULT", "40.460", "-79.920"),
        crime_line(x + 10.0, y + 10.0, "ROBBERY", "40.444", "-79.948"),
        crime_line(x + 9000.0, y, "Robbery", "40.450", "-79.900"),
        crime_line(x + 9000.0, y + 9000.0, "RAPE", "40.470", "-79.890"),
        crime_line(x + 20.0, y, "THEFT", "40.444", "-79.948"),
        crime_line(x, y + 40.0, "ROBBERY WITH WEAPON", "40.444", "-79.948"),
    ]
}

/// Sentences for word-count and pattern tests.
#[must_use]
pub fn word_corpus() -> Vec<&'static str> {
    vec![
        "the cool cat sat on the mat",
        "Cool heads prevail",
        "the  schoolhouse\tis  uncool",
        "",
        "hello world hello",
    ]
}

/// Weather records for 1949 and 1950, including a missing reading and a
/// rejected quality code.
#[must_use]
pub fn sample_weather_lines() -> Vec<String> {
    vec![
        weather_line(1950, 0, '1'),
        weather_line(1950, 22, '1'),
        weather_line(1950, -11, '1'),
        weather_line(1949, 111, '1'),
        weather_line(1949, 78, '1'),
        weather_line(1949, 9999, '1'),
        weather_line(1949, 500, '2'),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_line_layout() {
        let line = weather_line(1901, -78, '1');
        assert_eq!(&line[15..19], "1901");
        assert_eq!(&line[87..92], "-0078");
        assert_eq!(&line[92..93], "1");
        assert!(line.len() > 93);
    }

    #[test]
    fn test_crime_line_has_nine_fields() {
        let line = crime_line(1.0, 2.0, "ROBBERY", "40.0", "-79.0");
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields.len(), 9);
        assert_eq!(fields[4], "ROBBERY");
        assert_eq!(fields[7], "40.0");
        assert_eq!(fields[8], "-79.0");
    }

    #[test]
    fn test_sample_crime_rows_start_with_header() {
        let rows = sample_crime_rows();
        assert_eq!(rows[0], CRIME_HEADER);
        assert!(rows.len() > 5);
    }

    #[test]
    fn test_word_corpus() {
        let words = word_corpus();
        assert!(words.iter().any(|s| s.contains("cool")));
    }
}
