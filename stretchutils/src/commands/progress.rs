use crate::logic::{compute_progress, filter_records, ProgressSummary, RecordFilter};
use crate::utils::{self, OutputFormat};
use clap::Args;
use log::info;

#[derive(Debug, Args)]
#[command(about = "Compute completion percentage overall, per layer and per bill")]
pub struct Progress {
    #[arg(help = "Input CSV file (read from stdin if not specified)")]
    input: Option<String>,
    #[arg(short, long, help = "Output file (write to stdout if not specified)")]
    output: Option<String>,
    #[arg(short = 't', long, help = "Output format", value_enum, default_value = "auto")]
    format: OutputFormat,
    #[arg(short, long, help = "Keep records of this bill (records without a bill are always kept)")]
    bill: Vec<String>,
    #[arg(short, long, help = "Keep records of this month, as YYYY-MM (records without a date are always kept)")]
    month: Vec<String>,
    #[arg(short, long, help = "Route extent in meters (inferred from the input if not specified)")]
    route_extent: Option<u64>,
}

impl Progress {
    pub fn run(&self) -> anyhow::Result<()> {
        let dataset = utils::open_dataset(self.input.as_deref())?;
        let filter = RecordFilter::new(self.bill.iter().cloned(), self.month.iter().cloned());
        let records = filter_records(&dataset.records, &filter);
        info!(
            "{} of {} records pass the filter",
            records.len(),
            dataset.records.len()
        );
        let route_extent = self.route_extent.unwrap_or(dataset.route_extent);
        let summary = compute_progress(&records, route_extent);

        match self.format.resolve(self.output.as_deref()) {
            OutputFormat::Json => utils::write_json(self.output.as_deref(), &summary)?,
            format => {
                let mut writer = utils::create_table_writer(self.output.as_deref(), format)?;
                write_summary(&mut *writer, &summary)?;
            }
        }
        Ok(())
    }
}

fn write_summary(
    writer: &mut dyn utils::tablewriter::TableWriter,
    summary: &ProgressSummary,
) -> anyhow::Result<()> {
    writer.set_header(
        &["scope", "bill", "layer", "len", "pct"]
            .iter()
            .map(|x| x.to_string())
            .collect::<Vec<_>>(),
    );
    writer.write_header()?;
    writer.write_string_row(&[
        "overall".to_string(),
        String::new(),
        String::new(),
        summary.overall_len.to_string(),
        format!("{:.3}", summary.overall_pct),
    ])?;
    for (layer, coverage) in &summary.per_layer {
        writer.write_string_row(&[
            "layer".to_string(),
            String::new(),
            layer.clone(),
            coverage.len.to_string(),
            format!("{:.3}", coverage.pct),
        ])?;
    }
    for one in &summary.per_layer_per_bill {
        writer.write_string_row(&[
            "bill".to_string(),
            one.bill.clone(),
            one.layer.clone(),
            one.len.to_string(),
            format!("{:.3}", one.pct),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
