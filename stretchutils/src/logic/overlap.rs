use super::interval::{merge_intervals, Span};
use super::{intervals_by_layer, Record};
use itertools::Itertools;
use log::debug;
use std::collections::BTreeMap;

/// Stretches of each layer that were declared more than once.
///
/// Every pair of a layer's stretches is intersected and the intersections
/// are merged. Layers without overlaps map to an empty list.
pub fn find_overlaps_within_layer(records: &[Record]) -> BTreeMap<String, Vec<Span>> {
    let mut result = BTreeMap::new();
    for (layer, intervals) in intervals_by_layer(records) {
        let overlaps: Vec<_> = intervals
            .iter()
            .tuple_combinations()
            .filter_map(|(a, b)| a.intersect(b))
            .collect();
        let merged: Vec<Span> = merge_intervals(&overlaps)
            .into_iter()
            .map(Span::from)
            .collect();
        debug!("{}: {} overlapping stretches", layer, merged.len());
        result.insert(layer.to_string(), merged);
    }
    result
}
