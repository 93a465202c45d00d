//! Built-in mappers.
//!
//! - [`WordCount`] -- `(token, 1)` per whitespace token.
//! - [`PatternFinder`] -- `(token, null)` per token containing a substring.
//! - [`CrimeCounter`] -- `(key, 1)` per crime record passing a
//!   [`CrimePredicate`].
//! - [`CrimePlacemarks`] -- a KML placemark per qualifying crime record.
//! - [`TemperatureExtractor`] -- `(year, reading)` from fixed-width weather
//!   records.
//!
//! All of them take their constants at construction; none read global
//! state.

mod crime;
mod pattern;
mod temperature;
mod word_count;

pub use crime::{
    CrimeCounter, CrimeKey, CrimeMatcher, CrimePlacemarks, CrimePredicate, PlacemarkTemplate,
    RadiusFilter,
};
pub use pattern::PatternFinder;
pub use temperature::TemperatureExtractor;
pub use word_count::WordCount;
