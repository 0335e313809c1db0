pub mod csv;
pub mod model;
pub mod output;
pub mod sheet;
pub mod tables;
pub mod terminal;
pub mod xlsx;

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Excel workbook with header fields and all sections
    #[value(alias = "excel")]
    #[serde(alias = "excel")]
    Xlsx,
    /// Scripts table only, comma-separated
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}
