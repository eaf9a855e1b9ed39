use crate::logic::{month_label, Analysis, Dataset, RecordFilter, Session, CHUNK_SIZE};
use crate::parser::parse_csv;
use crate::utils::{self, OutputFormat};
use anyhow::Context;
use clap::Args;
use log::info;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Args)]
#[command(about = "Summarize progress, overlaps and gaps of a dataset")]
pub struct Report {
    #[arg(help = "Input CSV file (read from stdin if neither this nor --data-dir is given)")]
    input: Option<String>,
    #[arg(
        short,
        long,
        help = "Directory to pick the data file from",
        conflicts_with = "input"
    )]
    data_dir: Option<String>,
    #[arg(
        short = 'f',
        long,
        help = "Data file name inside --data-dir (first CSV file if not specified)",
        requires = "data_dir"
    )]
    data_file: Option<String>,
    #[arg(short, long, help = "Output file (write to stdout if not specified)")]
    output: Option<String>,
    #[arg(short, long, help = "Write the full analysis as JSON")]
    json: bool,
    #[arg(short, long, help = "Keep records of this bill for progress")]
    bill: Vec<String>,
    #[arg(short, long, help = "Keep records of this month (YYYY-MM) for progress")]
    month: Vec<String>,
    #[arg(short, long, help = "Route extent in meters (inferred from the input if not specified)")]
    route_extent: Option<u64>,
    #[arg(short, long, help = "Chunk size in meters", default_value_t = CHUNK_SIZE, value_parser = clap::value_parser!(u64).range(1..))]
    chunk_size: u64,
}

impl Report {
    pub fn run(&self) -> anyhow::Result<()> {
        let mut dataset = self.load_dataset()?;
        if let Some(route_extent) = self.route_extent {
            dataset.route_extent = route_extent;
        }

        let mut session = Session::new().with_chunk_size(self.chunk_size);
        session.load(dataset);
        session.apply_filter(RecordFilter::new(
            self.bill.iter().cloned(),
            self.month.iter().cloned(),
        ));

        let analysis = match session.analysis() {
            Some(x) => x,
            None => {
                info!("no usable records");
                let mut output = utils::create_output(self.output.as_deref())?;
                writeln!(output, "No records")?;
                output.flush()?;
                return Ok(());
            }
        };

        if self.json || OutputFormat::Auto.resolve(self.output.as_deref()) == OutputFormat::Json {
            utils::write_json(self.output.as_deref(), &analysis)?;
        } else {
            let mut output = utils::create_output(self.output.as_deref())?;
            write_report(&mut output, &session, &analysis)?;
            output.flush()?;
        }
        Ok(())
    }

    fn load_dataset(&self) -> anyhow::Result<Dataset> {
        let data_dir = match self.data_dir.as_deref() {
            Some(x) => Path::new(x),
            None => return utils::open_dataset(self.input.as_deref()),
        };
        let name = match self.data_file.as_deref() {
            Some(x) => x.to_string(),
            None => utils::list_data_files(data_dir)
                .with_context(|| format!("Failed to list {}", data_dir.display()))?
                .first()
                .and_then(|x| x.file_name())
                .and_then(|x| x.to_str())
                .map(|x| x.to_string())
                .unwrap_or_default(),
        };
        let text = utils::load_data_source(data_dir, &name)
            .with_context(|| format!("Failed to read {}", data_dir.join(&name).display()))?;
        parse_csv(text.as_bytes()).with_context(|| format!("Failed to parse {}", name))
    }
}

fn write_report(
    output: &mut impl Write,
    session: &Session,
    analysis: &Analysis,
) -> anyhow::Result<()> {
    let progress = &analysis.progress;
    writeln!(
        output,
        "Records: {} of {}",
        analysis.filtered_records, analysis.total_records
    )?;
    writeln!(output, "Route extent: {} m", progress.route_extent)?;
    if !session.bills().is_empty() {
        writeln!(output, "Bills: {}", session.bills().join(", "))?;
    }
    let months = session.months();
    if !months.is_empty() {
        let labels: Vec<_> = months.iter().map(|x| month_label(x)).collect();
        writeln!(output, "Months: {}", labels.join(", "))?;
    }
    if !session.filter().is_empty() {
        let mut bills: Vec<_> = session.filter().bills.iter().cloned().collect();
        let mut months: Vec<_> = session.filter().months.iter().map(|x| month_label(x)).collect();
        bills.sort();
        months.sort();
        writeln!(
            output,
            "Filter: bills [{}], months [{}]",
            bills.join(", "),
            months.join(", ")
        )?;
    }

    writeln!(output)?;
    writeln!(
        output,
        "Overall progress: {} m ({:.3}%)",
        progress.overall_len, progress.overall_pct
    )?;
    writeln!(output, "Layer progress:")?;
    for (layer, coverage) in &progress.per_layer {
        writeln!(output, "  {}: {} m ({:.3}%)", layer, coverage.len, coverage.pct)?;
    }
    if !progress.per_layer_per_bill.is_empty() {
        writeln!(output, "Bill progress:")?;
        for one in &progress.per_layer_per_bill {
            writeln!(
                output,
                "  {} / {}: {} m ({:.3}%)",
                one.bill, one.layer, one.len, one.pct
            )?;
        }
    }

    writeln!(output)?;
    writeln!(output, "Overlaps:")?;
    for (layer, spans) in &analysis.overlaps {
        writeln!(
            output,
            "  {}: {} stretches, {} m",
            layer,
            spans.len(),
            spans.iter().map(|x| x.len).sum::<u64>()
        )?;
    }
    writeln!(output, "Gaps:")?;
    for (layer, spans) in &analysis.gaps {
        writeln!(
            output,
            "  {}: {} stretches, {} m",
            layer,
            spans.len(),
            spans.iter().map(|x| x.len).sum::<u64>()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        report: Report,
    }

    #[test]
    fn test_report() -> anyhow::Result<()> {
        let cli = Cli::parse_from(&[
            "command",
            "-o",
            "../target/report.txt",
            "testfiles/progress.csv",
        ]);
        cli.report.run()?;

        let text = std::fs::read_to_string("../target/report.txt")?;
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Records: 8 of 8",
                "Route extent: 8000 m",
                "Bills: RA-1, RA-2",
                "Months: Jan 2024, Feb 2024, Mar 2024",
                "",
                "Overall progress: 3000 m (37.500%)",
                "Layer progress:",
                "  Embankment EW: 3000 m (37.500%)",
                "  GSB: 500 m (6.250%)",
                "  Subgrade: 550 m (6.875%)",
                "Bill progress:",
                "  RA-1 / Embankment EW: 1200 m (15.000%)",
                "  RA-1 / Subgrade: 250 m (3.125%)",
                "  RA-2 / Embankment EW: 1500 m (18.750%)",
                "  RA-2 / GSB: 500 m (6.250%)",
                "  RA-2 / Subgrade: 400 m (5.000%)",
                "",
                "Overlaps:",
                "  Embankment EW: 1 stretches, 200 m",
                "  GSB: 0 stretches, 0 m",
                "  Subgrade: 1 stretches, 100 m",
                "Gaps:",
                "  Embankment EW: 1 stretches, 500 m",
                "  GSB: 2 stretches, 3000 m",
                "  Subgrade: 4 stretches, 2950 m",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_report_filtered() -> anyhow::Result<()> {
        let cli = Cli::parse_from(&[
            "command",
            "--bill",
            "RA-2",
            "--month",
            "2024-02",
            "-o",
            "../target/report-filtered.txt",
            "testfiles/progress.csv",
        ]);
        cli.report.run()?;

        let text = std::fs::read_to_string("../target/report-filtered.txt")?;
        assert!(text.contains("Records: 4 of 8\n"));
        assert!(text.contains("Filter: bills [RA-2], months [Feb 2024]\n"));
        assert!(text.contains("Overall progress: 2200 m (27.500%)\n"));
        // overlaps ignore the filter
        assert!(text.contains("  Subgrade: 1 stretches, 100 m\n"));
        Ok(())
    }

    #[test]
    fn test_report_data_dir() -> anyhow::Result<()> {
        let cli = Cli::parse_from(&[
            "command",
            "--data-dir",
            "testfiles",
            "-o",
            "../target/report-data-dir.json",
        ]);
        cli.report.run()?;

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string("../target/report-data-dir.json")?)?;
        assert_eq!(value["total_records"], 8);
        assert_eq!(value["progress"]["route_extent"], 8000);
        assert_eq!(value["stretches"]["chunk_size"], 1000);
        assert_eq!(value["stretches"]["chunks"], serde_json::json!([0, 1000, 2000, 3000]));
        Ok(())
    }

    #[test]
    fn test_report_sample_fallback() -> anyhow::Result<()> {
        let cli = Cli::parse_from(&[
            "command",
            "--data-dir",
            "testfiles",
            "--data-file",
            "missing.csv",
            "--json",
            "-o",
            "../target/report-sample.txt",
        ]);
        cli.report.run()?;

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string("../target/report-sample.txt")?)?;
        assert_eq!(value["total_records"], 6);
        assert_eq!(value["filtered_records"], 6);
        assert_eq!(value["progress"]["route_extent"], 1500);
        assert_eq!(value["progress"]["overall_len"], 450);
        assert!((value["progress"]["overall_pct"].as_f64().unwrap_or(0.) - 30.).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_data_file_requires_data_dir() {
        let result = Cli::try_parse_from(&["command", "--data-file", "x.csv"]);
        assert!(result.is_err());
    }
}
