use crate::error::StretchUtilsError;
use crate::logic::{Dataset, Record, DEFAULT_ROUTE_EXTENT};
use chrono::{Datelike, NaiveDate};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io;

static STRETCH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\s*-\s*(\d+)$").unwrap());

static DATE_FORMATS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"^\d{1,2}\.\d{1,2}\.\d{4}$").unwrap(), "%d.%m.%Y"),
        (Regex::new(r"^\d{1,2}\.\d{1,2}\.\d{2}$").unwrap(), "%d.%m.%y"),
        (Regex::new(r"^\d{1,2}-\d{1,2}-\d{4}$").unwrap(), "%d-%m-%Y"),
        (Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").unwrap(), "%Y-%m-%d"),
    ]
});

/// `"500 - 1000"` becomes `(500, 1000)`. Reversed stretches are rejected.
pub fn parse_stretch(value: &str) -> Option<(u64, u64)> {
    let captures = STRETCH.captures(value.trim())?;
    let start: u64 = captures[1].parse().ok()?;
    let end: u64 = captures[2].parse().ok()?;
    if start <= end {
        Some((start, end))
    } else {
        None
    }
}

/// Parses `DD.MM.YYYY`, `DD.MM.YY`, `DD-MM-YYYY` or `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .filter(|(pattern, _)| pattern.is_match(value))
        .find_map(|(_, format)| NaiveDate::parse_from_str(value, format).ok())
}

/// Month tag (`YYYY-MM`) of a date cell.
pub fn parse_month(value: &str) -> Option<String> {
    parse_date(value).map(|x| format!("{}-{:02}", x.year(), x.month()))
}

fn parse_length(value: &str) -> Option<u64> {
    let value = value.trim().replace(',', "");
    value.parse::<u64>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite() && *x >= 0.)
            .map(|x| x as u64)
    })
}

/// Column positions found in the header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub layer: usize,
    pub stretch: usize,
    pub bill: Option<usize>,
    pub estimated_length: Option<usize>,
    pub date: Option<usize>,
}

impl ColumnMapping {
    /// Matches header names case-insensitively; the first matching column wins.
    pub fn detect<'a>(
        header: impl IntoIterator<Item = &'a str>,
    ) -> Result<ColumnMapping, StretchUtilsError> {
        let lower: Vec<String> = header
            .into_iter()
            .map(|x| x.trim().to_lowercase())
            .collect();
        let find = |f: &dyn Fn(&str) -> bool| lower.iter().position(|x| f(x.as_str()));

        let layer = find(&|x| x == "item" || x == "layer")
            .ok_or(StretchUtilsError::MissingColumn("\"Item\" (or Layer)"))?;
        let stretch = find(&|x| x == "stretch" || x == "chainage")
            .ok_or(StretchUtilsError::MissingColumn("\"Stretch\" (or Chainage)"))?;

        Ok(ColumnMapping {
            layer,
            stretch,
            bill: find(&|x| x.contains("bill")),
            estimated_length: find(&|x| x.contains("est") && x.contains("length")),
            date: find(&|x| x == "date" || x == "end date"),
        })
    }
}

pub struct StretchReader<R: io::Read> {
    reader: csv::Reader<R>,
    columns: ColumnMapping,
    row: csv::StringRecord,
    estimated_length: Option<u64>,
}

impl<R: io::Read> StretchReader<R> {
    pub fn new(reader: R) -> Result<Self, StretchUtilsError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);
        let columns = ColumnMapping::detect(reader.headers()?.iter())?;
        debug!("detected columns: {:?}", columns);
        Ok(StretchReader {
            reader,
            columns,
            row: csv::StringRecord::new(),
            estimated_length: None,
        })
    }

    /// Last positive estimated length seen so far.
    pub fn estimated_length(&self) -> Option<u64> {
        self.estimated_length
    }

    /// Reads the next usable row into `record`. Rows without a layer or a
    /// valid stretch are skipped.
    pub fn next(&mut self, record: &mut Record) -> Result<bool, StretchUtilsError> {
        loop {
            if !self.reader.read_record(&mut self.row)? {
                return Ok(false);
            }
            let line = self.reader.position().line();
            let cell = |index: usize| self.row.get(index).unwrap_or("").trim();

            let layer = cell(self.columns.layer);
            let stretch = cell(self.columns.stretch);
            if layer.is_empty() || stretch.is_empty() {
                continue;
            }
            let (start, end) = match parse_stretch(stretch) {
                Some(x) => x,
                None => {
                    warn!("line {}: cannot parse stretch \"{}\"", line, stretch);
                    continue;
                }
            };
            if start == end {
                warn!("line {}: empty stretch \"{}\"", line, stretch);
                continue;
            }

            record.layer.clear();
            record.layer.push_str(layer);
            record.start = start;
            record.end = end;
            record.bill = self
                .columns
                .bill
                .map(cell)
                .filter(|x| !x.is_empty())
                .map(|x| x.to_string());
            record.month = self.columns.date.map(cell).and_then(parse_month);

            if let Some(length) = self
                .columns
                .estimated_length
                .map(cell)
                .and_then(parse_length)
                .filter(|x| *x > 0)
            {
                self.estimated_length = Some(length);
            }
            return Ok(true);
        }
    }
}

/// Route extent of a dataset: the estimated length column when present,
/// otherwise the distance from the smallest start to the largest end.
pub fn infer_route_extent(records: &[Record], estimated_length: Option<u64>) -> u64 {
    if let Some(length) = estimated_length.filter(|x| *x > 0) {
        return length;
    }
    let min_start = records.iter().map(|x| x.start).min();
    let max_end = records.iter().map(|x| x.end).max();
    match (min_start, max_end) {
        (Some(min_start), Some(max_end)) if max_end > min_start => max_end - min_start,
        _ => DEFAULT_ROUTE_EXTENT,
    }
}

pub fn parse_csv<R: io::Read>(reader: R) -> Result<Dataset, StretchUtilsError> {
    let mut reader = StretchReader::new(reader)?;
    let mut records = Vec::new();
    let mut record = Record::default();
    while reader.next(&mut record)? {
        records.push(record.clone());
    }
    let route_extent = infer_route_extent(&records, reader.estimated_length());
    debug!(
        "parsed {} records, route extent {}",
        records.len(),
        route_extent
    );
    Ok(Dataset {
        records,
        route_extent,
    })
}
