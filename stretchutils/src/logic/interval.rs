use super::Record;
use serde::Serialize;
use std::collections::BTreeMap;

/// Half-open chainage range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Interval {
    pub start: u64,
    pub end: u64,
}

impl Interval {
    pub fn new(start: u64, end: u64) -> Self {
        Interval { start, end }
    }

    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Common part of two intervals, `None` unless it has a positive length.
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        let start = self.start.max(other.start);
        let common = Interval::new(start, self.end.min(other.end));
        if common.is_empty() {
            None
        } else {
            Some(common)
        }
    }
}

/// Interval reported together with its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Span {
    pub start: u64,
    pub end: u64,
    pub len: u64,
}

impl From<Interval> for Span {
    fn from(interval: Interval) -> Self {
        Span {
            start: interval.start,
            end: interval.end,
            len: interval.len(),
        }
    }
}

/// Merges intervals into sorted, disjoint coverage.
///
/// Touching intervals are merged as well: `[0, 10)` and `[10, 20)` become
/// `[0, 20)`. The input is left untouched.
pub fn merge_intervals(intervals: &[Interval]) -> Vec<Interval> {
    let mut sorted = intervals.to_vec();
    sorted.sort_by_key(|x| x.start);

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for current in sorted {
        match merged.last_mut() {
            Some(last) if current.start <= last.end => {
                last.end = last.end.max(current.end);
            }
            _ => merged.push(current),
        }
    }
    merged
}

/// Total length covered by `intervals`, overlaps counted once.
pub fn covered_length(intervals: &[Interval]) -> u64 {
    merge_intervals(intervals).iter().map(|x| x.len()).sum()
}

/// Collects stretches per layer and exports each layer's merged coverage.
pub struct LayerMerger {
    layers: BTreeMap<String, Vec<Interval>>,
}

impl LayerMerger {
    pub fn new() -> LayerMerger {
        LayerMerger {
            layers: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, record: &Record) {
        if !record.is_valid() {
            return;
        }
        if let Some(intervals) = self.layers.get_mut(&record.layer) {
            intervals.push(record.interval());
        } else {
            self.layers
                .insert(record.layer.clone(), vec![record.interval()]);
        }
    }

    /// Merged coverage of every layer, in layer name order.
    pub fn merged(&self) -> BTreeMap<&str, Vec<Span>> {
        self.layers
            .iter()
            .map(|(layer, intervals)| {
                (
                    layer.as_str(),
                    merge_intervals(intervals)
                        .into_iter()
                        .map(Span::from)
                        .collect(),
                )
            })
            .collect()
    }
}

impl Default for LayerMerger {
    fn default() -> Self {
        LayerMerger::new()
    }
}
