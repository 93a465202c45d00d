//! Integer folds: Sum, Max, Min

use super::{int_values, Combiner, Reducer};
use crate::error::PipelineResult;
use crate::record::{Key, OutputRecord, Value};

/// Shared shape of the integer folds.
///
/// - `create` is the identity the fold starts from.
/// - `add_input` folds one value into the accumulator.
///
/// Partial results are plain values of the same kind, so merging two
/// partials is `add_input` again.
pub trait IntFold: Send + Sync {
    const NAME: &'static str;

    fn create(&self) -> i64;

    fn add_input(&self, acc: i64, v: i64) -> i64;

    fn fold(&self, key: &Key, values: Vec<Value>) -> PipelineResult<i64> {
        Ok(int_values(Self::NAME, key, values)?.fold(self.create(), |acc, v| self.add_input(acc, v)))
    }
}

fn reduce_fold<F: IntFold>(
    f: &F,
    key: &Key,
    values: Vec<Value>,
    out: &mut dyn FnMut(OutputRecord),
) -> PipelineResult<()> {
    let acc = f.fold(key, values)?;
    out(OutputRecord::new(key.clone(), Value::Int(acc)));
    Ok(())
}

fn combine_fold<F: IntFold>(f: &F, key: &Key, values: Vec<Value>) -> PipelineResult<Vec<Value>> {
    Ok(vec![Value::Int(f.fold(key, values)?)])
}

/* ===================== Sum ===================== */

/// Sum of values per key, starting at 0. Overflow wraps.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sum;

impl IntFold for Sum {
    const NAME: &'static str = "sum";

    fn create(&self) -> i64 {
        0
    }

    fn add_input(&self, acc: i64, v: i64) -> i64 {
        acc.wrapping_add(v)
    }
}

impl Reducer for Sum {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn reduce(
        &self,
        key: &Key,
        values: Vec<Value>,
        out: &mut dyn FnMut(OutputRecord),
    ) -> PipelineResult<()> {
        reduce_fold(self, key, values, out)
    }
}

impl Combiner for Sum {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn combine(&self, key: &Key, values: Vec<Value>) -> PipelineResult<Vec<Value>> {
        combine_fold(self, key, values)
    }
}

/* ===================== Max ===================== */

/// Maximum value per key, starting from `i64::MIN`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Max;

impl IntFold for Max {
    const NAME: &'static str = "max";

    fn create(&self) -> i64 {
        i64::MIN
    }

    fn add_input(&self, acc: i64, v: i64) -> i64 {
        acc.max(v)
    }
}

impl Reducer for Max {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn reduce(
        &self,
        key: &Key,
        values: Vec<Value>,
        out: &mut dyn FnMut(OutputRecord),
    ) -> PipelineResult<()> {
        reduce_fold(self, key, values, out)
    }
}

impl Combiner for Max {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn combine(&self, key: &Key, values: Vec<Value>) -> PipelineResult<Vec<Value>> {
        combine_fold(self, key, values)
    }
}

/* ===================== Min ===================== */

/// Minimum value per key, starting from `i64::MAX`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Min;

impl IntFold for Min {
    const NAME: &'static str = "min";

    fn create(&self) -> i64 {
        i64::MAX
    }

    fn add_input(&self, acc: i64, v: i64) -> i64 {
        acc.min(v)
    }
}

impl Reducer for Min {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn reduce(
        &self,
        key: &Key,
        values: Vec<Value>,
        out: &mut dyn FnMut(OutputRecord),
    ) -> PipelineResult<()> {
        reduce_fold(self, key, values, out)
    }
}

impl Combiner for Min {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn combine(&self, key: &Key, values: Vec<Value>) -> PipelineResult<Vec<Value>> {
        combine_fold(self, key, values)
    }
}
