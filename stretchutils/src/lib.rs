mod commands;
pub mod error;
pub mod logic;
pub mod parser;
pub mod utils;

use clap::Args;
pub use error::StretchUtilsError;
pub use logic::{Dataset, Record};
pub use parser::{parse_csv, StretchReader};

#[derive(Debug, Args)]
#[command(about = "Chainage stretch utilities", version, author)]
pub struct StretchUtils {
    #[command(subcommand)]
    command: commands::Commands,
}

impl StretchUtils {
    pub fn run(&self) -> anyhow::Result<()> {
        self.command.run()
    }
}
