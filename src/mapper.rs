//! The mapper contract.
//!
//! A [`Mapper`] turns one [`Line`] into zero or more `(key, value)`
//! emissions through an [`Emitter`]. Mappers are stateless: the same line
//! always produces the same emissions, and lines are mapped independently
//! of their neighbours, which is what lets the runner map batches on
//! several threads.

use crate::error::MalformedRecord;
use crate::record::{Key, KeyValue, Line, Value};

/// Capability handed to a mapper for emitting pairs.
pub trait Emitter {
    fn emit(&mut self, key: Key, value: Value);
}

/// Collects emissions into a vector.
#[derive(Debug, Default)]
pub struct VecEmitter {
    pub pairs: Vec<KeyValue>,
}

impl Emitter for VecEmitter {
    fn emit(&mut self, key: Key, value: Value) {
        self.pairs.push(KeyValue { key, value });
    }
}

/// Line-at-a-time map function.
pub trait Mapper: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Map one line.
    ///
    /// A line the mapper cannot parse is reported as `Err`; the caller skips
    /// it. Emissions made before an error are discarded by the runner.
    fn map(&self, line: &Line, out: &mut dyn Emitter) -> Result<(), MalformedRecord>;
}

/// Convenience: map a single line into a vector.
pub fn map_line<M: Mapper + ?Sized>(
    mapper: &M,
    line: &Line,
) -> Result<Vec<KeyValue>, MalformedRecord> {
    let mut out = VecEmitter::default();
    mapper.map(line, &mut out)?;
    Ok(out.pairs)
}
