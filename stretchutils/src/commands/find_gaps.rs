use super::write_layer_spans;
use crate::logic::find_gaps_per_layer;
use crate::utils::{self, OutputFormat};
use clap::Args;
use log::info;

#[derive(Debug, Args)]
#[command(about = "Find uncovered ranges of each layer")]
pub struct FindGaps {
    #[arg(help = "Input CSV file (read from stdin if not specified)")]
    input: Option<String>,
    #[arg(short, long, help = "Output file (write to stdout if not specified)")]
    output: Option<String>,
    #[arg(short = 't', long, help = "Output format", value_enum, default_value = "auto")]
    format: OutputFormat,
}

impl FindGaps {
    pub fn run(&self) -> anyhow::Result<()> {
        let dataset = utils::open_dataset(self.input.as_deref())?;
        let gaps = find_gaps_per_layer(&dataset.records);
        info!("{} gaps", gaps.values().map(|x| x.len()).sum::<usize>());

        match self.format.resolve(self.output.as_deref()) {
            OutputFormat::Json => utils::write_json(self.output.as_deref(), &gaps)?,
            format => {
                let mut writer = utils::create_table_writer(self.output.as_deref(), format)?;
                write_layer_spans(&mut *writer, &gaps)?;
            }
        }
        Ok(())
    }
}
