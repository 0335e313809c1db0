use std::path::PathBuf;

use anyhow::Result;
use inquire::{InquireError, MultiSelect, Password, Select, Text};
use owo_colors::OwoColorize;
use tracing::debug;

use crate::cli::execute_job;
use crate::columns::ColumnRegistry;
use crate::config::ReportConfig;
use crate::engine::{ReportJob, ReportSource};
use crate::report::OutputFormat;

const EXCEL_CHOICE: &str = "Excel (.xlsx)";
const CSV_CHOICE: &str = "CSV (.csv)";

/// Print a horizontal separator.
fn separator() {
    println!("{}", "━".repeat(60));
}

fn goodbye(reason: &str) {
    println!();
    println!("  {} {}", reason.dimmed(), "Exiting. 👋".dimmed());
}

fn is_cancel(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

// ── Wizard screens ──────────────────────────────────────────────────

fn screen_welcome() {
    println!();
    separator();
    println!(
        "  {} {}",
        "📊".bold(),
        format!("pcireport v{}", env!("CARGO_PKG_VERSION")).bold()
    );
    println!(
        "  {}",
        "PCI compliance report generator".dimmed()
    );
    separator();
    println!();
}

/// API key from the environment, or a masked prompt. `None` if left empty.
fn prompt_api_key(config: &ReportConfig) -> Result<Option<String>, InquireError> {
    if let Some(key) = config.api_key_from_env() {
        println!(
            "  {} Using API key from {}",
            "🔑".bold(),
            config.api.api_key_env.cyan()
        );
        return Ok(Some(key));
    }

    let key = Password::new("Please enter your Feroot API Key:")
        .without_confirmation()
        .prompt()?;
    Ok(non_empty(key))
}

fn prompt_report_id() -> Result<Option<String>, InquireError> {
    let id = Text::new("Please enter the Report ID (from the URL):").prompt()?;
    Ok(non_empty(id))
}

/// Column labels picked by the user, mapped back to registry keys
fn prompt_columns(registry: &ColumnRegistry) -> Result<Vec<String>, InquireError> {
    let labels = MultiSelect::new("Select columns for the report:", registry.labels()).prompt()?;
    Ok(labels
        .iter()
        .filter_map(|label| registry.key_for_label(label))
        .map(str::to_string)
        .collect())
}

fn prompt_format(config: &ReportConfig) -> Result<OutputFormat, InquireError> {
    let start = match config.output.format {
        OutputFormat::Xlsx => 0,
        OutputFormat::Csv => 1,
    };
    let choice = Select::new("Select the output file type:", vec![EXCEL_CHOICE, CSV_CHOICE])
        .with_starting_cursor(start)
        .prompt()?;
    Ok(if choice == CSV_CHOICE {
        OutputFormat::Csv
    } else {
        OutputFormat::Xlsx
    })
}

fn prompt_filename(config: &ReportConfig) -> Result<Option<String>, InquireError> {
    let name = Text::new("Enter the desired filename (without extension):")
        .with_default(&config.output.filename)
        .prompt()?;
    Ok(non_empty(name))
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Walk through all prompts. `Ok(None)` means the user gave up early.
fn collect_job(
    config: &ReportConfig,
    registry: &ColumnRegistry,
) -> Result<Option<ReportJob>, InquireError> {
    let Some(api_key) = prompt_api_key(config)? else {
        goodbye("API Key is required.");
        return Ok(None);
    };

    let Some(report_id) = prompt_report_id()? else {
        goodbye("Report ID is required.");
        return Ok(None);
    };

    let columns = prompt_columns(registry)?;
    if columns.is_empty() {
        goodbye("No columns selected. Report generation cancelled.");
        return Ok(None);
    }

    let format = prompt_format(config)?;

    let Some(filename) = prompt_filename(config)? else {
        goodbye("Report generation cancelled.");
        return Ok(None);
    };

    debug!("Wizard selection: columns={:?} format={}", columns, format);

    Ok(Some(ReportJob {
        source: ReportSource::Api { api_key, report_id },
        columns,
        format,
        stem: PathBuf::from(filename),
    }))
}

// ── Public entry-point ──────────────────────────────────────────────

/// Interactive wizard (no-args mode).
pub fn run_wizard() -> Result<()> {
    init_quiet_logging();
    screen_welcome();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = ReportConfig::load(&cwd);
    let registry = ColumnRegistry::standard()?;

    match collect_job(&config, &registry) {
        Ok(Some(job)) => {
            if let ReportSource::Api { report_id, .. } = &job.source {
                println!();
                println!("  Fetching report data for ID: {}...", report_id.cyan());
            }
            execute_job(&job, &config, &registry)
        }
        Ok(None) => Ok(()),
        Err(e) if is_cancel(&e) => {
            goodbye("Operation cancelled by user.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Set up minimal tracing so the engine can log without the full CLI
/// initialisation.
fn init_quiet_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("pcireport=warn"))
        .with_target(false)
        .without_time()
        .try_init();
}
