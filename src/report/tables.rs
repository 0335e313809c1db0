use std::collections::HashMap;

use tracing::debug;

use crate::columns::ColumnRegistry;
use crate::error::Result;
use crate::report::model::{cell_or, RawReport, Script, NOT_AVAILABLE};

/// A header row plus string-rendered body rows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers, rows: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of column `index`, body rows only
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }
}

/// Scripts table: one row per script, columns as selected.
pub fn build_scripts_table(
    report: &RawReport,
    registry: &ColumnRegistry,
    selected: &[String],
) -> Result<Table> {
    let columns = registry.resolve(selected)?;

    let mut table = Table::new(columns.iter().map(|c| c.label.clone()).collect());
    for script in &report.content.scripts {
        table.rows.push(
            columns
                .iter()
                .map(|c| cell_or(script.field(c.field), NOT_AVAILABLE))
                .collect(),
        );
    }

    debug!("Scripts table: {} rows x {} columns", table.len(), table.headers.len());
    Ok(table)
}

/// HTTP headers table, or `None` when the report has no header fields.
///
/// `name`, `value` and `authorized` are relabelled in place; any other
/// field passes through under its own name, in first-seen order.
pub fn build_headers_table(report: &RawReport) -> Option<Table> {
    let entries = &report.content.headers;
    if entries.is_empty() {
        return None;
    }

    let mut fields: Vec<&str> = Vec::new();
    for entry in entries {
        for key in entry.fields.keys() {
            if !fields.contains(&key.as_str()) {
                fields.push(key);
            }
        }
    }

    if fields.is_empty() {
        return None;
    }

    let mut table = Table::new(fields.iter().map(|f| header_label(f).to_string()).collect());
    for entry in entries {
        table.rows.push(
            fields
                .iter()
                .map(|f| cell_or(entry.fields.get(*f), NOT_AVAILABLE))
                .collect(),
        );
    }
    Some(table)
}

fn header_label(field: &str) -> &str {
    match field {
        "name" => "Header Name",
        "value" => "Header Value",
        "authorized" => "Authorization Status",
        other => other,
    }
}

/// Data asset access table, or `None` when no asset references a script.
///
/// One row per (asset, script reference), resolving each reference
/// against the report's scripts.
pub fn build_data_assets_table(report: &RawReport) -> Option<Table> {
    let assets = &report.content.data_assets;
    if assets.is_empty() {
        return None;
    }

    let lookup: HashMap<String, &Script> = report
        .content
        .scripts
        .iter()
        .filter_map(|s| s.lookup_key().map(|k| (k, s)))
        .collect();

    let mut table = Table::new(
        ["Data Asset", "Script Name", "Script URL", "Access Level"]
            .map(String::from)
            .to_vec(),
    );
    for asset in assets {
        let asset_name = asset.name.as_deref().unwrap_or("Unknown Asset");
        for script_ref in &asset.scripts {
            let script = script_ref.lookup_key().and_then(|k| lookup.get(&k).copied());
            let access = if script_ref.is_read() { "Read" } else { "Presence" };
            table.rows.push(vec![
                asset_name.to_string(),
                cell_or(script.and_then(|s| s.name.as_ref()), "Unknown Script"),
                cell_or(script.and_then(|s| s.url.as_ref()), NOT_AVAILABLE),
                access.to_string(),
            ]);
        }
    }
    (!table.is_empty()).then_some(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;

    const SAMPLE: &str = include_str!("../../tests/fixtures/sample_report.json");

    fn sample() -> RawReport {
        serde_json::from_str(SAMPLE).unwrap()
    }

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scripts_headers_follow_selection_order() {
        let registry = ColumnRegistry::standard().unwrap();
        let selections = [
            vec!["name"],
            vec!["url", "name"],
            vec!["purpose", "scan", "auth", "origin"],
            vec!["name", "url", "origin", "scan", "auth", "purpose"],
        ];
        for selection in selections {
            let table = build_scripts_table(&sample(), &registry, &keys(&selection)).unwrap();
            let expected: Vec<String> = selection
                .iter()
                .map(|k| registry.get(k).unwrap().label.clone())
                .collect();
            assert_eq!(table.headers, expected);
        }
    }

    #[test]
    fn test_scripts_missing_field_is_sentinel() {
        let registry = ColumnRegistry::standard().unwrap();
        let table = build_scripts_table(&sample(), &registry, &keys(&["name", "url"])).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0], vec!["analytics.js", "https://cdn.example.com/analytics.js"]);
        assert_eq!(table.rows[1], vec!["checkout.js", "N/A"]);
    }

    #[test]
    fn test_scripts_unknown_key() {
        let registry = ColumnRegistry::standard().unwrap();
        let err = build_scripts_table(&sample(), &registry, &keys(&["name", "size"])).unwrap_err();
        assert!(matches!(err, ReportError::InvalidColumnKey(k) if k == "size"));
    }

    #[test]
    fn test_headers_renamed() {
        let table = build_headers_table(&sample()).unwrap();
        assert_eq!(table.headers, vec!["Header Name", "Header Value", "Authorization Status"]);
        assert_eq!(table.rows, vec![vec!["Content-Security-Policy", "default-src 'self'", "true"]]);
    }

    #[test]
    fn test_headers_pass_through_extra_fields() {
        let report: RawReport = serde_json::from_str(
            r#"{"content": {"headers": [
                {"source": "edge", "value": "1", "name": "X-A"},
                {"name": "X-B", "authorized": false, "ttl": 30}
            ]}}"#,
        )
        .unwrap();
        let table = build_headers_table(&report).unwrap();
        assert_eq!(
            table.headers,
            vec!["source", "Header Value", "Header Name", "Authorization Status", "ttl"]
        );
        assert_eq!(table.rows[0], vec!["edge", "1", "X-A", "N/A", "N/A"]);
        assert_eq!(table.rows[1], vec!["N/A", "N/A", "X-B", "false", "30"]);
    }

    #[test]
    fn test_empty_sections() {
        let report = RawReport::default();
        assert!(build_headers_table(&report).is_none());
        assert!(build_data_assets_table(&report).is_none());
    }

    #[test]
    fn test_data_assets_cross_reference() {
        let table = build_data_assets_table(&sample()).unwrap();
        assert_eq!(table.headers, vec!["Data Asset", "Script Name", "Script URL", "Access Level"]);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.rows[0],
            vec!["Credit Card Number", "analytics.js", "https://cdn.example.com/analytics.js", "Read"]
        );
        assert_eq!(table.rows[1], vec!["Credit Card Number", "checkout.js", "N/A", "Presence"]);
    }

    #[test]
    fn test_data_assets_unresolved_reference() {
        let report: RawReport = serde_json::from_str(
            r#"{"content": {
                "scripts": [{"scriptId": 7, "name": "a.js", "url": "https://a"}],
                "dataAssets": [
                    {"name": "CVV", "scripts": [{"scriptId": 7, "read": 1}, {"scriptId": "missing"}]},
                    {"scripts": [{"scriptId": "7"}, {}]}
                ]
            }}"#,
        )
        .unwrap();
        let table = build_data_assets_table(&report).unwrap();

        // one row per reference across all assets
        assert_eq!(table.len(), 4);
        assert_eq!(table.rows[0], vec!["CVV", "a.js", "https://a", "Read"]);
        assert_eq!(table.rows[1], vec!["CVV", "Unknown Script", "N/A", "Presence"]);
        assert_eq!(table.rows[2], vec!["Unknown Asset", "a.js", "https://a", "Presence"]);
        assert_eq!(table.rows[3], vec!["Unknown Asset", "Unknown Script", "N/A", "Presence"]);
    }

    #[test]
    fn test_field_less_headers_are_empty() {
        let report: RawReport =
            serde_json::from_str(r#"{"content": {"headers": [{}, {}]}}"#).unwrap();
        assert!(build_headers_table(&report).is_none());
    }

    #[test]
    fn test_assets_without_references_are_empty() {
        let report: RawReport = serde_json::from_str(
            r#"{"content": {"dataAssets": [{"name": "CVV", "scripts": []}, {"name": "PAN"}]}}"#,
        )
        .unwrap();
        assert!(build_data_assets_table(&report).is_none());
    }
}
