pub mod gap;
pub mod interval;
pub mod overlap;
pub mod progress;
pub mod segment;
pub mod session;

use serde::Serialize;
use std::collections::BTreeMap;

pub use gap::find_gaps_per_layer;
pub use interval::{covered_length, merge_intervals, Interval, LayerMerger, Span};
pub use overlap::find_overlaps_within_layer;
pub use progress::{compute_progress, filter_records, ProgressSummary, RecordFilter};
pub use segment::{
    build_stretch_segments, build_stretch_segments_with_chunk_size, Segment, StretchSegments,
    CHUNK_SIZE,
};
pub use session::{month_label, Analysis, Dataset, Session, SessionState, DEFAULT_ROUTE_EXTENT};

/// One completed stretch of a layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Record {
    pub layer: String,
    pub start: u64,
    pub end: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
}

impl Record {
    pub fn new(layer: &str, start: u64, end: u64) -> Self {
        Record {
            layer: layer.to_string(),
            start,
            end,
            bill: None,
            month: None,
        }
    }

    pub fn with_bill(mut self, bill: &str) -> Self {
        self.bill = Some(bill.to_string());
        self
    }

    pub fn with_month(mut self, month: &str) -> Self {
        self.month = Some(month.to_string());
        self
    }

    /// `start < end` holds. Records failing this are ignored by the engine.
    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }

    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }

    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }
}

/// Groups the intervals of valid records by layer.
pub(crate) fn intervals_by_layer<'a>(
    records: impl IntoIterator<Item = &'a Record>,
) -> BTreeMap<&'a str, Vec<Interval>> {
    let mut by_layer: BTreeMap<&str, Vec<Interval>> = BTreeMap::new();
    for one in records.into_iter().filter(|x| x.is_valid()) {
        by_layer
            .entry(one.layer.as_str())
            .or_default()
            .push(one.interval());
    }
    by_layer
}

pub(crate) fn percentage(len: u64, route_extent: u64) -> f64 {
    if route_extent == 0 {
        0.
    } else {
        len as f64 / route_extent as f64 * 100.
    }
}
