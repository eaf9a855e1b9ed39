use crate::utils;
use anyhow::Context;
use clap::Args;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Args)]
#[command(about = "List CSV data files in a directory")]
pub struct DataFiles {
    #[arg(help = "Directory to search", default_value = ".")]
    dir: String,
    #[arg(short, long, help = "Output file (write to stdout if not specified)")]
    output: Option<String>,
}

impl DataFiles {
    pub fn run(&self) -> anyhow::Result<()> {
        let files = utils::list_data_files(Path::new(&self.dir))
            .with_context(|| format!("Failed to list {}", self.dir))?;
        let mut output = utils::create_output(self.output.as_deref())?;
        for one in files.iter().filter_map(|x| x.file_name()) {
            writeln!(output, "{}", one.to_string_lossy())?;
        }
        output.flush()?;
        Ok(())
    }
}
