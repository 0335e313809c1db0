use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::client::DEFAULT_BASE_URL;
use crate::report::OutputFormat;

pub const CONFIG_FILE: &str = ".pcireport.toml";

/// pcireport configuration (loaded from .pcireport.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Reports endpoint; the report id is appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Default filename, without extension
    #[serde(default = "default_filename")]
    pub filename: String,

    /// Default column keys (empty = all)
    #[serde(default)]
    pub columns: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            filename: default_filename(),
            columns: Vec::new(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_api_key_env() -> String {
    "FEROOT_API_KEY".to_string()
}

fn default_format() -> OutputFormat {
    OutputFormat::Xlsx
}

fn default_filename() -> String {
    "report".to_string()
}

impl ReportConfig {
    /// Load .pcireport.toml from `start` or its parents, falling back to defaults
    pub fn load(start: &Path) -> Self {
        let Some(config_path) = find_config_file(start) else {
            debug!("No {} found, using defaults", CONFIG_FILE);
            return Self::default();
        };
        debug!("Found config: {}", config_path.display());

        match std::fs::read_to_string(&config_path) {
            Ok(content) => match toml::from_str::<ReportConfig>(&content) {
                Ok(config) => {
                    info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}", config_path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                debug!("Could not read {}: {}", config_path.display(), e);
                Self::default()
            }
        }
    }

    /// API key from the configured environment variable, if set and non-empty
    pub fn api_key_from_env(&self) -> Option<String> {
        std::env::var(&self.api.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

/// Walk up from `start` to find .pcireport.toml
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let config = current.join(CONFIG_FILE);
        if config.exists() {
            return Some(config);
        }
        if !current.pop() {
            return None;
        }
    }
}

const DEFAULT_CONFIG: &str = r#"# pcireport configuration

[api]
# Compliance reports endpoint; the report id is appended
base_url = "https://app.feroot.com/api/v1/platform/compliance/reports/"

# Request timeout in seconds
# timeout_secs = 30

# Environment variable read for the API key
# api_key_env = "FEROOT_API_KEY"

[output]
# Default output format: "xlsx" or "csv"
format = "xlsx"

# Default filename (extension is added)
filename = "report"

# Columns of the scripts table (empty = all). Run `pcireport list-columns`.
# columns = ["name", "url", "origin", "scan", "auth", "purpose"]
"#;

/// Create a default .pcireport.toml in `dir`
pub fn init_config(dir: &Path) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() {
        println!("⚠️  {} already exists in this directory", CONFIG_FILE);
        return Ok(());
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)?;
    println!("✅ Created {}", CONFIG_FILE);
    println!("   Edit it to set the API endpoint and report defaults.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_template_parses() {
        let config: ReportConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.output.format, OutputFormat::Xlsx);
        assert_eq!(config.output.filename, "report");
        assert!(config.output.columns.is_empty());
    }

    #[test]
    fn test_load_from_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[output]\nformat = \"csv\"\ncolumns = [\"name\", \"url\"]\n",
        )
        .unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = ReportConfig::load(&nested);
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(config.output.columns, vec!["name", "url"]);
        assert_eq!(config.api.api_key_env, "FEROOT_API_KEY");
    }

    #[test]
    fn test_excel_alias_and_bad_file_falls_back() {
        let config: ReportConfig = toml::from_str("[output]\nformat = \"excel\"\n").unwrap();
        assert_eq!(config.output.format, OutputFormat::Xlsx);

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[output\nbroken").unwrap();
        let config = ReportConfig::load(dir.path());
        assert_eq!(config.output.filename, "report");
    }

    #[test]
    fn test_init_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path()).unwrap();
        let path = dir.path().join(CONFIG_FILE);
        assert!(path.exists());

        std::fs::write(&path, "# mine\n").unwrap();
        init_config(dir.path()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");
    }
}
