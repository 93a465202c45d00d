use crate::error::MalformedRecord;
use crate::mapper::{Emitter, Mapper};
use crate::record::{Key, Line, Value};

/// Emits `(token, 1)` for every whitespace-separated token.
#[derive(Clone, Copy, Debug, Default)]
pub struct WordCount;

impl Mapper for WordCount {
    fn name(&self) -> &'static str {
        "word-count"
    }

    fn map(&self, line: &Line, out: &mut dyn Emitter) -> Result<(), MalformedRecord> {
        for word in line.text.split_whitespace() {
            out.emit(Key::text(word), Value::Int(1));
        }
        Ok(())
    }
}
