use super::write_layer_spans;
use crate::logic::LayerMerger;
use crate::utils::{self, OutputFormat};
use clap::Args;
use log::info;

#[derive(Debug, Args)]
#[command(about = "Merge stretches of each layer into covered ranges")]
pub struct MergeStretch {
    #[arg(help = "Input CSV files (read from stdin if not specified)")]
    input: Vec<String>,
    #[arg(short, long, help = "Output file (write to stdout if not specified)")]
    output: Option<String>,
    #[arg(short = 't', long, help = "Output format", value_enum, default_value = "auto")]
    format: OutputFormat,
}

impl MergeStretch {
    pub fn run(&self) -> anyhow::Result<()> {
        let mut merger = LayerMerger::new();
        if self.input.is_empty() {
            for one in utils::open_dataset(None)?.records {
                merger.add(&one);
            }
        } else {
            for path in &self.input {
                for one in utils::open_dataset(Some(path))?.records {
                    merger.add(&one);
                }
            }
        }

        let merged = merger.merged();
        info!("{} layers merged", merged.len());
        match self.format.resolve(self.output.as_deref()) {
            OutputFormat::Json => utils::write_json(self.output.as_deref(), &merged)?,
            format => {
                let mut writer = utils::create_table_writer(self.output.as_deref(), format)?;
                write_layer_spans(&mut *writer, &merged)?;
            }
        }
        Ok(())
    }
}
