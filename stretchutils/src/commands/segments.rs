use crate::logic::{build_stretch_segments_with_chunk_size, CHUNK_SIZE};
use crate::utils::{self, OutputFormat};
use clap::Args;
use log::info;

#[derive(Debug, Args)]
#[command(about = "Split stretches into fixed-size chunks for charting")]
pub struct Segments {
    #[arg(help = "Input CSV file (read from stdin if not specified)")]
    input: Option<String>,
    #[arg(short, long, help = "Output file (write to stdout if not specified)")]
    output: Option<String>,
    #[arg(short = 't', long, help = "Output format", value_enum, default_value = "auto")]
    format: OutputFormat,
    #[arg(short, long, help = "Chunk size in meters", default_value_t = CHUNK_SIZE, value_parser = clap::value_parser!(u64).range(1..))]
    chunk_size: u64,
}

impl Segments {
    pub fn run(&self) -> anyhow::Result<()> {
        let dataset = utils::open_dataset(self.input.as_deref())?;
        let stretches = build_stretch_segments_with_chunk_size(&dataset.records, self.chunk_size);
        info!(
            "{} segments in {} chunks",
            stretches.segments.len(),
            stretches.chunks.len()
        );

        match self.format.resolve(self.output.as_deref()) {
            OutputFormat::Json => utils::write_json(self.output.as_deref(), &stretches)?,
            format => {
                let mut writer = utils::create_table_writer(self.output.as_deref(), format)?;
                writer.set_header(
                    &[
                        "chunk",
                        "chunk_start",
                        "layer",
                        "rel_start",
                        "rel_end",
                        "abs_start",
                        "abs_end",
                    ]
                    .iter()
                    .map(|x| x.to_string())
                    .collect::<Vec<_>>(),
                );
                writer.write_header()?;
                for one in &stretches.segments {
                    writer.write_string_row(&[
                        one.chunk_label.clone(),
                        one.chunk_start.to_string(),
                        one.layer.clone(),
                        one.rel_start.to_string(),
                        one.rel_end.to_string(),
                        one.abs_start.to_string(),
                        one.abs_end.to_string(),
                    ])?;
                }
                writer.flush()?;
            }
        }
        Ok(())
    }
}
