pub mod commands;
pub mod wizard;

use anyhow::Result;
use clap::Parser;

use crate::columns::ColumnRegistry;
use crate::config::ReportConfig;
use crate::engine::ReportJob;
use crate::error::ReportError;
use crate::report::terminal;

pub use commands::{Commands, GenerateArgs};

/// pcireport — PCI compliance report generator
///
/// Fetches a compliance report and renders it as an Excel workbook or CSV.
#[derive(Parser, Debug)]
#[command(
    name = "pcireport",
    version,
    about = "📊 pcireport — PCI compliance report generator",
    long_about = "pcireport fetches a PCI compliance report (scripts, HTTP headers, data asset access,\nvulnerability stats) and renders it as a formatted Excel workbook or a CSV file.\n\nRun without arguments for the interactive wizard."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Run a report job and print the outcome.
///
/// A failed fetch is reported and treated as a normal exit; every other
/// error is returned to the caller.
pub fn execute_job(job: &ReportJob, config: &ReportConfig, registry: &ColumnRegistry) -> Result<()> {
    match job.run(config, registry) {
        Ok(generated) => {
            terminal::render_summary(&generated.path, &generated.sections);
            Ok(())
        }
        Err(ReportError::Fetch(e)) => {
            tracing::error!("Fetch failed: {}", e);
            terminal::render_failure(&format!("API call failed: {e}"));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
