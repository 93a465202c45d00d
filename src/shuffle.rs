//! Shuffle / group stage.
//!
//! Emissions are appended to an ordered map keyed by [`Key`], so groups come
//! out in ascending key order. Each value remembers where it came from
//! ([`Origin`]); a shuffle built from several partial shuffles merged in
//! batch order therefore yields the same groups, values in the same order,
//! as one built sequentially over the whole input.

use crate::error::PipelineResult;
use crate::reducers::Combiner;
use crate::record::{Key, KeyValue, Line, Value};
use std::collections::BTreeMap;
use std::mem::take;

/// How emissions are grouped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GroupingMode {
    /// One group per distinct key.
    #[default]
    PerKey,
    /// Every emission folds into a single group under [`Key::Null`]. Exactly
    /// one group is produced, even for empty input.
    Single,
}

/// Position of an emitted value: input index, byte offset of the line and
/// the emission's index within that line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Origin {
    pub source: usize,
    pub offset: u64,
    pub index: u32,
}

impl Origin {
    pub fn of(line: &Line, index: u32) -> Self {
        let (source, offset) = line.origin();
        Self {
            source,
            offset,
            index,
        }
    }
}

/// A key and all values emitted under it, in input order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub key: Key,
    pub values: Vec<Value>,
}

/// Ordered key -> values buffer.
#[derive(Debug, Default)]
pub struct Shuffle {
    mode: GroupingMode,
    groups: BTreeMap<Key, Vec<(Origin, Value)>>,
    emitted: u64,
}

impl Shuffle {
    pub fn new(mode: GroupingMode) -> Self {
        Self {
            mode,
            groups: BTreeMap::new(),
            emitted: 0,
        }
    }

    /// Number of values appended so far (before any combining).
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Number of distinct groups currently held.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Append one value.
    pub fn emit(&mut self, origin: Origin, key: Key, value: Value) {
        let key = match self.mode {
            GroupingMode::PerKey => key,
            GroupingMode::Single => Key::Null,
        };
        self.groups.entry(key).or_default().push((origin, value));
        self.emitted += 1;
    }

    /// Append every pair a mapper produced for `line`.
    pub fn extend_from_line(&mut self, line: &Line, pairs: Vec<KeyValue>) {
        for (i, kv) in pairs.into_iter().enumerate() {
            self.emit(Origin::of(line, i as u32), kv.key, kv.value);
        }
    }

    /// Append another shuffle's groups after this one's.
    ///
    /// Callers merge partial shuffles in input order; origins then stay
    /// ascending within each group.
    pub fn merge(&mut self, other: Shuffle) {
        self.emitted += other.emitted;
        for (key, values) in other.groups {
            match self.groups.get_mut(&key) {
                Some(existing) => existing.extend(values),
                None => {
                    self.groups.insert(key, values);
                }
            }
        }
    }

    /// Replace each group's values with the combiner's partial result.
    ///
    /// Combined values inherit the origin of the group's first value.
    pub fn combine(&mut self, combiner: &dyn Combiner) -> PipelineResult<()> {
        for (key, entries) in self.groups.iter_mut() {
            let Some(first) = entries.first().map(|(o, _)| *o) else {
                continue;
            };
            let values = take(entries).into_iter().map(|(_, v)| v).collect();
            *entries = combiner
                .combine(key, values)?
                .into_iter()
                .map(|v| (first, v))
                .collect();
        }
        Ok(())
    }

    /// Consume the buffer, producing groups in ascending key order with
    /// values sorted by origin.
    pub fn into_groups(self) -> Vec<Group> {
        let mut groups: Vec<Group> = self
            .groups
            .into_iter()
            .map(|(key, mut entries)| {
                entries.sort_by_key(|(origin, _)| *origin);
                Group {
                    key,
                    values: entries.into_iter().map(|(_, v)| v).collect(),
                }
            })
            .collect();
        if self.mode == GroupingMode::Single && groups.is_empty() {
            groups.push(Group {
                key: Key::Null,
                values: Vec::new(),
            });
        }
        groups
    }
}
