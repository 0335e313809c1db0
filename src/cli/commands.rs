use clap::Subcommand;
use std::path::PathBuf;

use crate::report::OutputFormat;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a compliance report and write it to a file
    Generate(GenerateArgs),

    /// Initialize a .pcireport.toml config file in the current directory
    Init,

    /// List the columns available for the scripts table
    ListColumns,
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Report ID (from the report URL)
    #[arg(short, long, required_unless_present = "input")]
    pub report_id: Option<String>,

    /// API key. Falls back to the environment variable named in the config
    #[arg(long, env = "FEROOT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Columns of the scripts table (comma-separated keys, in order). Default: all
    #[arg(short, long)]
    pub columns: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output filename without extension
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Render a saved report document (JSON) instead of calling the API
    #[arg(long, conflicts_with = "report_id")]
    pub input: Option<PathBuf>,

    /// Ignore .pcireport.toml config files
    #[arg(long)]
    pub no_config: bool,
}
