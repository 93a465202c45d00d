use super::{int_values, Reducer};
use crate::error::PipelineResult;
use crate::record::{Key, OutputRecord, Value};
use crate::shuffle::GroupingMode;

/// Sums every emission of the run into one `(null, total)` record.
///
/// Runs in [`GroupingMode::Single`], so an empty input still produces
/// `(null, 0)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GrandTotal;

impl Reducer for GrandTotal {
    fn name(&self) -> &'static str {
        "grand-total"
    }

    fn grouping(&self) -> GroupingMode {
        GroupingMode::Single
    }

    fn reduce(
        &self,
        key: &Key,
        values: Vec<Value>,
        out: &mut dyn FnMut(OutputRecord),
    ) -> PipelineResult<()> {
        let total = int_values(self.name(), key, values)?.fold(0i64, i64::wrapping_add);
        out(OutputRecord::new(Key::Null, Value::Int(total)));
        Ok(())
    }
}
