pub mod client;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use tracing::info;

use crate::columns::ColumnRegistry;
use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::report::model::RawReport;
use crate::report::sheet::{self, Section};
use crate::report::{self, tables, OutputFormat};

pub const SCRIPTS_SECTION: &str = "Scripts Details";
pub const HEADERS_SECTION: &str = "HTTP Headers";
pub const DATA_ASSETS_SECTION: &str = "Cardholder Data Asset Access";

/// Where the report document comes from
#[derive(Debug, Clone)]
pub enum ReportSource {
    /// Fetch from the compliance API
    Api { api_key: String, report_id: String },
    /// A previously saved report document (JSON)
    File(PathBuf),
}

/// Everything needed to produce one report file
#[derive(Debug, Clone)]
pub struct ReportJob {
    pub source: ReportSource,
    /// Column keys for the scripts table, in order
    pub columns: Vec<String>,
    pub format: OutputFormat,
    /// Output path without extension
    pub stem: PathBuf,
}

impl ReportJob {
    /// Run the job: validate columns, load the document, write the output.
    ///
    /// Columns are checked before any request is made, and nothing is
    /// written unless every section was built.
    pub fn run(&self, config: &ReportConfig, registry: &ColumnRegistry) -> Result<GeneratedReport> {
        if self.columns.is_empty() {
            return Err(ReportError::NoColumns);
        }
        registry.resolve(&self.columns)?;

        let report = self.load(config)?;
        ReportGenerator::new(report, registry).generate(&self.columns, self.format, &self.stem)
    }

    fn load(&self, config: &ReportConfig) -> Result<RawReport> {
        match &self.source {
            ReportSource::Api { api_key, report_id } => {
                let client = client::ReportClient::new(
                    &config.api.base_url,
                    Duration::from_secs(config.api.timeout_secs),
                )?;
                Ok(client.fetch(api_key, report_id)?)
            }
            ReportSource::File(path) => {
                info!("Reading report document from {}", path.display());
                let body = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
                    path: path.clone(),
                    source,
                })?;
                Ok(client::parse_report(&body)?)
            }
        }
    }
}

/// A report file that was written, with the sections it contains
#[derive(Debug)]
pub struct GeneratedReport {
    pub path: PathBuf,
    pub sections: Vec<Section>,
}

/// Shapes one fetched report into CSV or Excel output.
pub struct ReportGenerator<'a> {
    report: RawReport,
    registry: &'a ColumnRegistry,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(report: RawReport, registry: &'a ColumnRegistry) -> Self {
        Self { report, registry }
    }

    /// All sections of the Excel report, in sheet order
    pub fn sections(&self, columns: &[String]) -> Result<Vec<Section>> {
        let scripts = tables::build_scripts_table(&self.report, self.registry, columns)?;
        let headers = tables::build_headers_table(&self.report);
        let assets = tables::build_data_assets_table(&self.report);

        info!(
            "Built tables: {} scripts, {} headers, {} data asset rows",
            scripts.len(),
            headers.as_ref().map_or(0, |t| t.len()),
            assets.as_ref().map_or(0, |t| t.len())
        );

        Ok(vec![
            Section::new(SCRIPTS_SECTION, Some(scripts)),
            Section::new(HEADERS_SECTION, headers),
            Section::new(DATA_ASSETS_SECTION, assets),
        ])
    }

    /// Write `<stem>.csv` with the scripts table only
    pub fn generate_csv(&self, columns: &[String], stem: &Path) -> Result<GeneratedReport> {
        let table = tables::build_scripts_table(&self.report, self.registry, columns)?;
        let path = output_path(stem, OutputFormat::Csv);
        report::csv::write(&table, &path)?;
        Ok(GeneratedReport {
            path,
            sections: vec![Section::new(SCRIPTS_SECTION, Some(table))],
        })
    }

    /// Write `<stem>.xlsx` with the header block and every non-empty section
    pub fn generate_excel(&self, columns: &[String], stem: &Path) -> Result<GeneratedReport> {
        let sections = self.sections(columns)?;
        let grid = sheet::compose(&self.report, &sections, Local::now());
        let path = output_path(stem, OutputFormat::Xlsx);
        report::xlsx::write(&grid, &path)?;
        Ok(GeneratedReport { path, sections })
    }

    pub fn generate(
        &self,
        columns: &[String],
        format: OutputFormat,
        stem: &Path,
    ) -> Result<GeneratedReport> {
        match format {
            OutputFormat::Xlsx => self.generate_excel(columns, stem),
            OutputFormat::Csv => self.generate_csv(columns, stem),
        }
    }
}

/// `<stem>.<ext>`; the stem is used verbatim, dots included
pub fn output_path(stem: &Path, format: OutputFormat) -> PathBuf {
    let mut name = OsString::from(stem.as_os_str());
    name.push(".");
    name.push(format.extension());
    PathBuf::from(name)
}
