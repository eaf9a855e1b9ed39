use super::write_layer_spans;
use crate::logic::find_overlaps_within_layer;
use crate::utils::{self, OutputFormat};
use clap::Args;
use log::info;

#[derive(Debug, Args)]
#[command(about = "Find stretches declared more than once within a layer")]
pub struct FindOverlaps {
    #[arg(help = "Input CSV file (read from stdin if not specified)")]
    input: Option<String>,
    #[arg(short, long, help = "Output file (write to stdout if not specified)")]
    output: Option<String>,
    #[arg(short = 't', long, help = "Output format", value_enum, default_value = "auto")]
    format: OutputFormat,
}

impl FindOverlaps {
    pub fn run(&self) -> anyhow::Result<()> {
        let dataset = utils::open_dataset(self.input.as_deref())?;
        let overlaps = find_overlaps_within_layer(&dataset.records);
        info!(
            "{} overlapping stretches",
            overlaps.values().map(|x| x.len()).sum::<usize>()
        );

        match self.format.resolve(self.output.as_deref()) {
            OutputFormat::Json => utils::write_json(self.output.as_deref(), &overlaps)?,
            format => {
                let mut writer = utils::create_table_writer(self.output.as_deref(), format)?;
                write_layer_spans(&mut *writer, &overlaps)?;
            }
        }
        Ok(())
    }
}
