use std::collections::HashSet;

use comfy_table::{presets::UTF8_FULL, Table};

use crate::error::{ReportError, Result};
use crate::report::model::ScriptField;

/// One selectable column of the scripts table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Short key used on the command line and in config
    pub key: String,
    /// Header label shown in the output
    pub label: String,
    /// Script field the values are read from
    pub field: ScriptField,
}

/// Column registry: key → (display label, source field).
///
/// Keys and labels are both unique, so either can be used to find an
/// entry (the wizard selects by label and maps back to keys).
#[derive(Debug, Clone)]
pub struct ColumnRegistry {
    columns: Vec<ColumnSpec>,
}

impl ColumnRegistry {
    /// The built-in report columns
    pub fn standard() -> anyhow::Result<Self> {
        let spec = |key: &str, label: &str, field| ColumnSpec {
            key: key.to_string(),
            label: label.to_string(),
            field,
        };
        Self::new(vec![
            spec("name", "Script Name", ScriptField::Name),
            spec("url", "URL of the Script", ScriptField::Url),
            spec("origin", "Script Origin", ScriptField::Origin),
            spec("scan", "Vulnerability Scan", ScriptField::VulnerabilityScanResult),
            spec("auth", "Authorization Status", ScriptField::Authorization),
            spec("purpose", "Justification of Purpose", ScriptField::JustificationOfPurpose),
        ])
    }

    /// Build a registry, rejecting duplicate keys or labels.
    pub fn new(columns: Vec<ColumnSpec>) -> anyhow::Result<Self> {
        {
            let mut keys = HashSet::new();
            let mut labels = HashSet::new();
            for col in &columns {
                if !keys.insert(col.key.as_str()) {
                    anyhow::bail!("duplicate column key '{}'", col.key);
                }
                if !labels.insert(col.label.as_str()) {
                    anyhow::bail!("duplicate column label '{}'", col.label);
                }
            }
        }
        Ok(Self { columns })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter()
    }

    pub fn keys(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.key.clone()).collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.label.clone()).collect()
    }

    pub fn get(&self, key: &str) -> Result<&ColumnSpec> {
        self.columns
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| ReportError::InvalidColumnKey(key.to_string()))
    }

    /// Reverse lookup from a display label to its key.
    pub fn key_for_label(&self, label: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.key.as_str())
    }

    /// Resolve keys in order, failing on the first unknown one.
    pub fn resolve(&self, keys: &[String]) -> Result<Vec<&ColumnSpec>> {
        keys.iter().map(|k| self.get(k)).collect()
    }
}

/// Split a comma-separated column list ("name, url") into keys.
pub fn parse_column_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Print the available columns
pub fn list_columns(registry: &ColumnRegistry) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Key", "Column", "Source field"]);
    for col in registry.iter() {
        table.add_row(vec![col.key.as_str(), col.label.as_str(), col.field.source_name()]);
    }

    println!();
    println!("📋 Available report columns");
    println!("{table}");
    println!();
    println!("  Run `pcireport generate --report-id <ID> --columns name,url` to pick columns");
    println!();
}
