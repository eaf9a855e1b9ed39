use super::gap::find_gaps_per_layer;
use super::interval::Span;
use super::overlap::find_overlaps_within_layer;
use super::progress::{compute_progress, filter_records, ProgressSummary, RecordFilter};
use super::segment::{build_stretch_segments_with_chunk_size, StretchSegments, CHUNK_SIZE};
use super::Record;
use log::info;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Route extent used before any dataset is loaded.
pub const DEFAULT_ROUTE_EXTENT: u64 = 8000;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Validated records of one ingested file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub route_extent: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Empty,
    Loaded,
    Filtered,
}

/// Everything derived from a session at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub total_records: usize,
    pub filtered_records: usize,
    pub stretches: StretchSegments,
    pub overlaps: BTreeMap<String, Vec<Span>>,
    pub gaps: BTreeMap<String, Vec<Span>>,
    pub progress: ProgressSummary,
}

#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    route_extent: u64,
    chunk_size: u64,
    all_records: Vec<Record>,
    filter: RecordFilter,
    records: Vec<Record>,
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Session {
            state: SessionState::Empty,
            route_extent: DEFAULT_ROUTE_EXTENT,
            chunk_size: CHUNK_SIZE,
            all_records: Vec::new(),
            filter: RecordFilter::default(),
            records: Vec::new(),
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn route_extent(&self) -> u64 {
        self.route_extent
    }

    pub fn all_records(&self) -> &[Record] {
        &self.all_records
    }

    /// Records passing the current filter.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn filter(&self) -> &RecordFilter {
        &self.filter
    }

    /// Replaces the whole dataset and clears the filter.
    pub fn load(&mut self, dataset: Dataset) {
        info!(
            "loaded {} records, route extent {}",
            dataset.records.len(),
            dataset.route_extent
        );
        self.all_records = dataset.records;
        self.route_extent = dataset.route_extent;
        self.filter = RecordFilter::default();
        self.records = self.all_records.clone();
        self.state = if self.all_records.is_empty() {
            SessionState::Empty
        } else {
            SessionState::Loaded
        };
    }

    pub fn apply_filter(&mut self, filter: RecordFilter) {
        if self.state == SessionState::Empty {
            return;
        }
        self.records = filter_records(&self.all_records, &filter);
        self.state = if filter.is_empty() {
            SessionState::Loaded
        } else {
            SessionState::Filtered
        };
        info!(
            "{} of {} records pass the filter",
            self.records.len(),
            self.all_records.len()
        );
        self.filter = filter;
    }

    /// Distinct bill tags of the loaded dataset.
    pub fn bills(&self) -> Vec<String> {
        distinct(self.all_records.iter().filter_map(|x| x.bill.as_deref()))
    }

    /// Distinct months of the loaded dataset.
    pub fn months(&self) -> Vec<String> {
        distinct(self.all_records.iter().filter_map(|x| x.month.as_deref()))
    }

    /// Chart data and overlap/gap analysis cover every record; progress
    /// follows the filter.
    pub fn analysis(&self) -> Option<Analysis> {
        if self.state == SessionState::Empty {
            return None;
        }
        Some(Analysis {
            total_records: self.all_records.len(),
            filtered_records: self.records.len(),
            stretches: build_stretch_segments_with_chunk_size(&self.all_records, self.chunk_size),
            overlaps: find_overlaps_within_layer(&self.all_records),
            gaps: find_gaps_per_layer(&self.all_records),
            progress: compute_progress(&self.records, self.route_extent),
        })
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|x| x.to_string())
        .collect()
}

/// `"2024-03"` becomes `"Mar 2024"`. Other strings are returned unchanged.
pub fn month_label(month: &str) -> String {
    if let Some((year, month_number)) = month.split_once('-') {
        if let Ok(index) = month_number.parse::<usize>() {
            if (1..=12).contains(&index) {
                return format!("{} {}", MONTH_NAMES[index - 1], year);
            }
        }
    }
    month.to_string()
}
