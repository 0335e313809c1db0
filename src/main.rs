mod cli;
mod columns;
mod config;
mod engine;
mod error;
mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, GenerateArgs};
use columns::ColumnRegistry;
use config::ReportConfig;
use engine::{ReportJob, ReportSource};

fn main() -> Result<()> {
    // No arguments at all → interactive wizard
    if std::env::args().len() == 1 {
        return cli::wizard::run_wizard();
    }

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("pcireport=debug")
    } else if cli.quiet {
        EnvFilter::new("pcireport=error")
    } else {
        EnvFilter::new("pcireport=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    info!("pcireport v{}", env!("CARGO_PKG_VERSION"));

    let registry = ColumnRegistry::standard()?;

    match &cli.command {
        cli::Commands::Generate(args) => {
            let cwd = std::env::current_dir()?;
            let config = if args.no_config {
                ReportConfig::default()
            } else {
                ReportConfig::load(&cwd)
            };
            let job = build_job(args, &config, &registry)?;
            cli::execute_job(&job, &config, &registry)?;
        }
        cli::Commands::Init => {
            config::init_config(&std::env::current_dir()?)?;
        }
        cli::Commands::ListColumns => {
            columns::list_columns(&registry);
        }
    }

    Ok(())
}

/// Merge command-line arguments over config defaults
fn build_job(args: &GenerateArgs, config: &ReportConfig, registry: &ColumnRegistry) -> Result<ReportJob> {
    let source = match (&args.input, &args.report_id) {
        (Some(path), _) => ReportSource::File(path.clone()),
        (None, Some(report_id)) => {
            let report_id = report_id.trim();
            if report_id.is_empty() {
                anyhow::bail!("--report-id must not be blank");
            }
            let api_key = args
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty())
                .or_else(|| config.api_key_from_env())
                .with_context(|| {
                    format!(
                        "API key is required: pass --api-key or set {}",
                        config.api.api_key_env
                    )
                })?;
            ReportSource::Api {
                api_key,
                report_id: report_id.to_string(),
            }
        }
        (None, None) => anyhow::bail!("either --report-id or --input is required"),
    };

    let columns = match &args.columns {
        Some(list) => columns::parse_column_list(list),
        None if !config.output.columns.is_empty() => config.output.columns.clone(),
        None => registry.keys(),
    };

    let stem = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.filename));
    if stem.as_os_str().to_string_lossy().trim().is_empty() {
        anyhow::bail!("output filename must not be blank");
    }

    Ok(ReportJob {
        source,
        columns,
        format: args.format.unwrap_or(config.output.format),
        stem,
    })
}
