pub mod tablewriter;

use crate::logic::Dataset;
use crate::parser::parse_csv;
use anyhow::Context;
use clap::ValueEnum;
use log::{info, warn};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tablewriter::{CSVWriter, TSVWriter, TableWriter};

/// Dataset used when no data file is available.
pub const SAMPLE_CSV: &str = "Item,Stretch
Subgrade,100-150
Subgrade,600-800
Subgrade,1400-1600
Embankment EW,100-150
Embankment EW,600-800
Embankment EW,1400-1600
";

const COMPRESSION_SUFFIXES: &[&str] = &[".gz", ".bz2", ".xz", ".zst"];

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Auto,
    Tsv,
    Csv,
    Json,
}

impl OutputFormat {
    /// Picks the format from the output file name when `Auto`.
    pub fn resolve(self, output: Option<&str>) -> OutputFormat {
        if self != OutputFormat::Auto {
            return self;
        }
        let output = match output {
            Some(x) => x,
            None => return OutputFormat::Tsv,
        };
        let stem = COMPRESSION_SUFFIXES
            .iter()
            .find_map(|x| output.strip_suffix(x))
            .unwrap_or(output);
        if stem.ends_with(".csv") {
            OutputFormat::Csv
        } else if stem.ends_with(".json") {
            OutputFormat::Json
        } else {
            OutputFormat::Tsv
        }
    }
}

/// CSV files in `dir`, sorted by name.
pub fn list_data_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().map(|x| x == "csv").unwrap_or(false) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Contents of `dir/name`, or the sample dataset when that file is missing.
pub fn load_data_source(dir: &Path, name: &str) -> io::Result<String> {
    let path = dir.join(name);
    if !name.is_empty() && path.is_file() {
        info!("loading {}", path.display());
        fs::read_to_string(path)
    } else {
        warn!("{} not found, using sample data", path.display());
        Ok(SAMPLE_CSV.to_string())
    }
}

/// Reads a dataset from a (possibly compressed) file, or stdin when `path`
/// is `None`.
pub fn open_dataset(path: Option<&str>) -> anyhow::Result<Dataset> {
    let reader = autocompress::autodetect_open_or_stdin(path)
        .with_context(|| format!("Failed to open {}", path.unwrap_or("stdin")))?;
    let dataset = parse_csv(reader)
        .with_context(|| format!("Failed to parse {}", path.unwrap_or("stdin")))?;
    info!(
        "{}: {} records",
        path.unwrap_or("stdin"),
        dataset.records.len()
    );
    Ok(dataset)
}

pub fn create_output(path: Option<&str>) -> anyhow::Result<Box<dyn Write>> {
    let writer =
        autocompress::autodetect_create_or_stdout(path, autocompress::CompressionLevel::Default)
            .with_context(|| format!("Failed to create {}", path.unwrap_or("stdout")))?;
    Ok(Box::new(io::BufWriter::new(writer)))
}

pub fn create_table_writer(
    path: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<Box<dyn TableWriter>> {
    let output = create_output(path)?;
    Ok(match format.resolve(path) {
        OutputFormat::Csv => Box::new(CSVWriter::new(output)),
        _ => Box::new(TSVWriter::new(output)),
    })
}

pub fn write_json<T: Serialize>(path: Option<&str>, value: &T) -> anyhow::Result<()> {
    let mut output = create_output(path)?;
    serde_json::to_writer_pretty(&mut output, value)?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}
