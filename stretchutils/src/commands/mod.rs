mod data_files;
mod find_gaps;
mod find_overlaps;
mod merge_stretch;
mod progress;
mod report;
mod segments;

use crate::logic::Span;
use crate::utils::tablewriter::TableWriter;
use clap::Subcommand;
use std::collections::BTreeMap;

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(name = "merge")]
    MergeStretch(merge_stretch::MergeStretch),
    Segments(segments::Segments),
    #[command(name = "overlaps")]
    FindOverlaps(find_overlaps::FindOverlaps),
    #[command(name = "gaps")]
    FindGaps(find_gaps::FindGaps),
    Progress(progress::Progress),
    Report(report::Report),
    DataFiles(data_files::DataFiles),
}

impl Commands {
    pub fn run(&self) -> anyhow::Result<()> {
        match self {
            Commands::MergeStretch(x) => x.run(),
            Commands::Segments(x) => x.run(),
            Commands::FindOverlaps(x) => x.run(),
            Commands::FindGaps(x) => x.run(),
            Commands::Progress(x) => x.run(),
            Commands::Report(x) => x.run(),
            Commands::DataFiles(x) => x.run(),
        }
    }
}

/// Writes one `layer, start, end, len` row per span.
pub(crate) fn write_layer_spans<K: AsRef<str>>(
    writer: &mut dyn TableWriter,
    spans: &BTreeMap<K, Vec<Span>>,
) -> anyhow::Result<()> {
    writer.set_header(&[
        "layer".to_string(),
        "start".to_string(),
        "end".to_string(),
        "len".to_string(),
    ]);
    writer.write_header()?;
    for (layer, spans) in spans {
        for one in spans {
            writer.write_string_row(&[
                layer.as_ref().to_string(),
                one.start.to_string(),
                one.end.to_string(),
                one.len.to_string(),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_utils {
    use std::fs;

    /// Rows of a TSV output file, header included.
    pub fn read_tsv(path: &str) -> anyhow::Result<Vec<Vec<String>>> {
        Ok(fs::read_to_string(path)?
            .lines()
            .map(|x| x.split('\t').map(|y| y.to_string()).collect())
            .collect())
    }

    pub fn row(items: &[&str]) -> Vec<String> {
        items.iter().map(|x| x.to_string()).collect()
    }
}
