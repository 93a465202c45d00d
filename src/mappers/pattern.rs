use crate::error::MalformedRecord;
use crate::mapper::{Emitter, Mapper};
use crate::record::{Key, Line, Value};

/// Emits `(token, null)` for every whitespace-separated token whose
/// lowercase form contains the target substring.
///
/// The key keeps the token's original spelling; pairing this mapper with
/// [`Distinct`](crate::reducers::Distinct) yields each matching token once.
#[derive(Clone, Debug)]
pub struct PatternFinder {
    needle: String,
}

impl PatternFinder {
    /// `substring` is matched case-insensitively.
    pub fn new(substring: impl AsRef<str>) -> Self {
        Self {
            needle: substring.as_ref().to_lowercase(),
        }
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    pub fn matches(&self, token: &str) -> bool {
        token.to_lowercase().contains(&self.needle)
    }
}

impl Mapper for PatternFinder {
    fn name(&self) -> &'static str {
        "pattern-finder"
    }

    fn map(&self, line: &Line, out: &mut dyn Emitter) -> Result<(), MalformedRecord> {
        for token in line.text.split_whitespace().filter(|t| self.matches(t)) {
            out.emit(Key::text(token), Value::Null);
        }
        Ok(())
    }
}
