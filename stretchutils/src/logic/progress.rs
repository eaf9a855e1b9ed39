use super::interval::covered_length;
use super::{intervals_by_layer, percentage, Record};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Bill and month selection. An empty list does not filter on that axis.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordFilter {
    pub bills: HashSet<String>,
    pub months: HashSet<String>,
}

impl RecordFilter {
    pub fn new<B, M>(bills: B, months: M) -> Self
    where
        B: IntoIterator,
        B::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        RecordFilter {
            bills: bills.into_iter().map(Into::into).collect(),
            months: months.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bills.is_empty() && self.months.is_empty()
    }

    /// Records without a bill (or month) tag always pass that axis.
    pub fn accepts(&self, record: &Record) -> bool {
        let pass = |selected: &HashSet<String>, tag: &Option<String>| match tag {
            Some(tag) if !selected.is_empty() => selected.contains(tag),
            _ => true,
        };
        pass(&self.bills, &record.bill) && pass(&self.months, &record.month)
    }
}

pub fn filter_records(records: &[Record], filter: &RecordFilter) -> Vec<Record> {
    records
        .iter()
        .filter(|x| filter.accepts(x))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coverage {
    pub len: u64,
    pub pct: f64,
}

impl Coverage {
    fn new(len: u64, route_extent: u64) -> Self {
        Coverage {
            len,
            pct: percentage(len, route_extent),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BillLayer {
    pub bill: String,
    pub layer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillLayerCoverage {
    pub bill: String,
    pub layer: String,
    pub len: u64,
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub route_extent: u64,
    pub overall_len: u64,
    pub overall_pct: f64,
    pub per_layer: BTreeMap<String, Coverage>,
    pub per_layer_per_bill: Vec<BillLayerCoverage>,
}

/// Completion of the route for the given (already filtered) records.
///
/// Overall and per-layer figures use merged coverage, so a stretch laid
/// twice counts once. The per-bill figures sum the raw stretch lengths
/// instead: they report the billed quantity, which includes overlaps.
/// Percentages are 0 when `route_extent` is 0.
pub fn compute_progress(records: &[Record], route_extent: u64) -> ProgressSummary {
    let per_layer: BTreeMap<String, Coverage> = intervals_by_layer(records)
        .into_iter()
        .map(|(layer, intervals)| {
            (
                layer.to_string(),
                Coverage::new(covered_length(&intervals), route_extent),
            )
        })
        .collect();

    let all_intervals: Vec<_> = records
        .iter()
        .filter(|x| x.is_valid())
        .map(|x| x.interval())
        .collect();
    let overall_len = covered_length(&all_intervals);

    let mut by_bill_layer: BTreeMap<BillLayer, u64> = BTreeMap::new();
    for one in records.iter().filter(|x| x.is_valid()) {
        if let Some(bill) = one.bill.as_ref() {
            let key = BillLayer {
                bill: bill.clone(),
                layer: one.layer.clone(),
            };
            *by_bill_layer.entry(key).or_insert(0) += one.len();
        }
    }
    let per_layer_per_bill = by_bill_layer
        .into_iter()
        .map(|(key, len)| BillLayerCoverage {
            bill: key.bill,
            layer: key.layer,
            len,
            pct: percentage(len, route_extent),
        })
        .collect();

    ProgressSummary {
        route_extent,
        overall_len,
        overall_pct: percentage(overall_len, route_extent),
        per_layer,
        per_layer_per_bill,
    }
}
