//! Reducers and combiners.
//!
//! A [`Reducer`] turns one [`Group`](crate::shuffle::Group) into zero or more
//! [`OutputRecord`]s. A [`Combiner`] is an optional partial reduction run on
//! groups before the final reduce; it must agree with the reducer it is
//! paired with (associative and commutative).
//!
//! Built-ins:
//! - [`Sum`], [`Max`], [`Min`] -- integer folds; also usable as combiners.
//! - [`Distinct`] -- one `(key, null)` record per group.
//! - [`GrandTotal`] -- a single `(null, total)` record over all emissions.
//! - [`MarkupAssembler`] -- wraps all fragments into one KML document.

mod basic;
mod distinct;
mod markup;
mod total;

pub use basic::{Max, Min, Sum};
pub use distinct::Distinct;
pub use markup::{MarkupAssembler, KML_FOOTER, KML_HEADER};
pub use total::GrandTotal;

use crate::error::{PipelineError, PipelineResult};
use crate::record::{Key, OutputRecord, Value};
use crate::shuffle::GroupingMode;

/// Group-at-a-time reduce function.
pub trait Reducer: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// How the shuffle should group emissions for this reducer.
    fn grouping(&self) -> GroupingMode {
        GroupingMode::PerKey
    }

    /// Reduce one group. `values` arrive in input order.
    fn reduce(
        &self,
        key: &Key,
        values: Vec<Value>,
        out: &mut dyn FnMut(OutputRecord),
    ) -> PipelineResult<()>;
}

/// Per-key partial reduction.
pub trait Combiner: Send + Sync {
    fn name(&self) -> &'static str;

    fn combine(&self, key: &Key, values: Vec<Value>) -> PipelineResult<Vec<Value>>;
}

/// Reduce every group of `groups` in order, collecting the output.
pub fn reduce_all<R: Reducer + ?Sized>(
    reducer: &R,
    groups: Vec<crate::shuffle::Group>,
) -> PipelineResult<Vec<OutputRecord>> {
    let mut out = Vec::new();
    for group in groups {
        reducer.reduce(&group.key, group.values, &mut |rec| out.push(rec))?;
    }
    Ok(out)
}

/// Extract integers, failing on the first value of another kind.
pub(crate) fn int_values(
    stage: &'static str,
    key: &Key,
    values: Vec<Value>,
) -> PipelineResult<impl Iterator<Item = i64>> {
    let mut ints = Vec::with_capacity(values.len());
    for v in values {
        match v.as_int() {
            Some(n) => ints.push(n),
            None => {
                return Err(PipelineError::Reduce {
                    stage,
                    key: key.to_string(),
                    reason: format!("expected an int value, found {}", v.kind()),
                });
            }
        }
    }
    Ok(ints.into_iter())
}
