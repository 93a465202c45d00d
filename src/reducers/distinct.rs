use super::Reducer;
use crate::error::PipelineResult;
use crate::record::{Key, OutputRecord, Value};

/// Emits `(key, null)` once per group, ignoring the values.
#[derive(Clone, Copy, Debug, Default)]
pub struct Distinct;

impl Reducer for Distinct {
    fn name(&self) -> &'static str {
        "distinct"
    }

    fn reduce(
        &self,
        key: &Key,
        _values: Vec<Value>,
        out: &mut dyn FnMut(OutputRecord),
    ) -> PipelineResult<()> {
        out(OutputRecord::new(key.clone(), Value::Null));
        Ok(())
    }
}
