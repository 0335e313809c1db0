use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use tracing::debug;

use crate::report::model::{RawReport, NOT_AVAILABLE};
use crate::report::tables::Table;

/// Name of the single worksheet in the Excel report
pub const SHEET_NAME: &str = "PCI Compliance Report";

/// Column widths never exceed this many characters
pub const MAX_COLUMN_WIDTH: usize = 60;

/// Extra characters added to the longest cell of a column
pub const COLUMN_PADDING: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    fn count(n: Option<f64>) -> Self {
        match n {
            Some(n) => CellValue::Number(n),
            None => CellValue::text(NOT_AVAILABLE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    Plain,
    /// Header field labels and section titles
    Bold,
    /// Column header row of a table
    TableHeader,
    /// Table body: wrapped, aligned to the top
    Wrapped,
}

/// A positioned cell; rows and columns are zero-based
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub row: u32,
    pub col: u16,
    pub value: CellValue,
    pub style: CellStyle,
}

/// A fully laid-out worksheet, ready for the Excel writer
#[derive(Debug, Clone, Default)]
pub struct Grid {
    pub cells: Vec<Cell>,
    /// Width per column index. Later sections overwrite earlier ones.
    pub column_widths: BTreeMap<u16, f64>,
}

impl Grid {
    fn put(&mut self, row: u32, col: u16, value: CellValue, style: CellStyle) {
        self.cells.push(Cell { row, col, value, style });
    }
}

/// A titled table; `None` or row-less tables are left out of the sheet entirely
#[derive(Debug, Clone)]
pub struct Section {
    pub title: String,
    pub table: Option<Table>,
}

impl Section {
    pub fn new(title: &str, table: Option<Table>) -> Self {
        Self { title: title.to_string(), table }
    }
}

/// Lay out the header block followed by each non-empty section.
///
/// Header fields come first as bold `Label:` / value pairs, grouped with
/// blank rows. After one more blank row each section gets a bold title,
/// a blank row, then the table; three blank rows follow every table.
pub fn compose(report: &RawReport, sections: &[Section], now: DateTime<Local>) -> Grid {
    let mut grid = Grid::default();
    let stats = &report.content.stats;

    let header_fields: Vec<Option<(&str, CellValue)>> = vec![
        Some(("Report Name", CellValue::text(report.title.as_deref().unwrap_or(NOT_AVAILABLE)))),
        Some(("URL of the Webpage", CellValue::text(report.page.url.as_deref().unwrap_or(NOT_AVAILABLE)))),
        None,
        Some(("Date", CellValue::text(now.format("%B %d, %Y").to_string()))),
        Some(("Time", CellValue::text(now.format("%I:%M %p %Z").to_string()))),
        None,
        Some(("Total Number of Scripts", CellValue::count(stats.total_scripts))),
        Some(("Other Scripts", CellValue::Number(stats.other_scripts()))),
        None,
        Some(("Total Vulnerabilities", CellValue::count(stats.total_vulnerabilities))),
    ];

    let mut row: u32 = 0;
    for field in header_fields {
        if let Some((label, value)) = field {
            grid.put(row, 0, CellValue::text(format!("{label}:")), CellStyle::Bold);
            grid.put(row, 1, value, CellStyle::Plain);
        }
        row += 1;
    }

    // gap between the header block and the first section
    row += 1;

    for section in sections {
        let Some(table) = section.table.as_ref().filter(|t| !t.is_empty() && !t.headers.is_empty())
        else {
            debug!("Skipping empty section '{}'", section.title);
            continue;
        };

        grid.put(row, 0, CellValue::text(&section.title), CellStyle::Bold);
        let header_row = row + 2;
        write_table(&mut grid, table, header_row);

        row = header_row + 1 + table.len() as u32 + 3;
    }

    grid
}

fn write_table(grid: &mut Grid, table: &Table, header_row: u32) {
    for (i, header) in table.headers.iter().enumerate() {
        let col = i as u16;
        grid.put(header_row, col, CellValue::text(header), CellStyle::TableHeader);
        for (r, value) in table.column(i).enumerate() {
            grid.put(header_row + 1 + r as u32, col, CellValue::text(value), CellStyle::Wrapped);
        }
        grid.column_widths.insert(col, column_width(table, i) as f64);
    }
}

/// Longest cell or header of a column, padded, capped at [`MAX_COLUMN_WIDTH`]
pub fn column_width(table: &Table, index: usize) -> usize {
    let header_len = table.headers.get(index).map_or(0, |h| h.chars().count());
    let longest = table
        .column(index)
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header_len);
    (longest + COLUMN_PADDING).min(MAX_COLUMN_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap()
    }

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    impl Grid {
        fn cell(&self, row: u32, col: u16) -> Option<&Cell> {
            self.cells.iter().find(|c| c.row == row && c.col == col)
        }
    }

    fn text(grid: &Grid, row: u32, col: u16) -> Option<String> {
        match grid.cell(row, col).map(|c| &c.value) {
            Some(CellValue::Text(s)) => Some(s.clone()),
            Some(CellValue::Number(n)) => Some(n.to_string()),
            None => None,
        }
    }

    fn sample_report() -> RawReport {
        serde_json::from_str(include_str!("../../tests/fixtures/sample_report.json")).unwrap()
    }

    #[test]
    fn test_header_block_layout() {
        let grid = compose(&sample_report(), &[], now());

        assert_eq!(text(&grid, 0, 0).as_deref(), Some("Report Name:"));
        assert_eq!(text(&grid, 0, 1).as_deref(), Some("Checkout Page PCI Report"));
        assert_eq!(text(&grid, 1, 0).as_deref(), Some("URL of the Webpage:"));
        assert!(grid.cell(2, 0).is_none());
        assert_eq!(text(&grid, 3, 1).as_deref(), Some("January 02, 2006"));
        assert!(text(&grid, 4, 1).unwrap().starts_with("03:04 PM"));
        assert!(grid.cell(5, 0).is_none());
        assert_eq!(text(&grid, 6, 0).as_deref(), Some("Total Number of Scripts:"));
        assert_eq!(grid.cell(6, 1).unwrap().value, CellValue::Number(10.0));
        assert_eq!(grid.cell(7, 1).unwrap().value, CellValue::Number(1.0));
        assert!(grid.cell(8, 0).is_none());
        assert_eq!(text(&grid, 9, 0).as_deref(), Some("Total Vulnerabilities:"));

        assert_eq!(grid.cell(0, 0).unwrap().style, CellStyle::Bold);
        assert_eq!(grid.cell(0, 1).unwrap().style, CellStyle::Plain);
    }

    #[test]
    fn test_missing_stats_render_sentinel() {
        let grid = compose(&RawReport::default(), &[], now());
        assert_eq!(text(&grid, 0, 1).as_deref(), Some("N/A"));
        assert_eq!(text(&grid, 1, 1).as_deref(), Some("N/A"));
        assert_eq!(text(&grid, 6, 1).as_deref(), Some("N/A"));
        assert_eq!(grid.cell(7, 1).unwrap().value, CellValue::Number(0.0));
        assert_eq!(text(&grid, 9, 1).as_deref(), Some("N/A"));
    }

    #[test]
    fn test_sections_positions() {
        let sections = vec![
            Section::new("Scripts Details", Some(table(&["A", "B"], &[&["1", "2"], &["3", "4"]]))),
            Section::new("HTTP Headers", None),
            Section::new("Cardholder Data Asset Access", Some(table(&["C"], &[&["5"]]))),
        ];
        let grid = compose(&RawReport::default(), &sections, now());

        // header block rows 0..=9, one blank row, then the first title
        assert!(grid.cells.iter().all(|c| c.row != 10));
        assert_eq!(text(&grid, 11, 0).as_deref(), Some("Scripts Details"));
        assert_eq!(grid.cell(11, 0).unwrap().style, CellStyle::Bold);
        assert!(grid.cells.iter().all(|c| c.row != 12));
        assert_eq!(text(&grid, 13, 1).as_deref(), Some("B"));
        assert_eq!(grid.cell(13, 1).unwrap().style, CellStyle::TableHeader);
        assert_eq!(text(&grid, 15, 1).as_deref(), Some("4"));
        assert_eq!(grid.cell(15, 1).unwrap().style, CellStyle::Wrapped);

        // three blank rows after the body, and the empty section leaves no trace
        assert!(grid.cells.iter().all(|c| !(16..=18).contains(&c.row)));
        assert_eq!(text(&grid, 19, 0).as_deref(), Some("Cardholder Data Asset Access"));
        assert!(grid
            .cells
            .iter()
            .all(|c| !matches!(&c.value, CellValue::Text(s) if s == "HTTP Headers")));
        assert_eq!(text(&grid, 21, 0).as_deref(), Some("C"));
        assert_eq!(text(&grid, 22, 0).as_deref(), Some("5"));
    }

    #[test]
    fn test_column_width_padding() {
        let t = table(&["Name", "URL"], &[&["abcdefghij", "x"]]);
        assert_eq!(column_width(&t, 0), 13);
        assert_eq!(column_width(&t, 1), 6);
    }

    #[test]
    fn test_column_width_capped() {
        let long = "x".repeat(80);
        let t = table(&["URL"], &[&[long.as_str()]]);
        assert_eq!(column_width(&t, 0), 60);
    }

    #[test]
    fn test_column_width_counts_chars() {
        let t = table(&["N"], &[&["ééé"]]);
        assert_eq!(column_width(&t, 0), 6);
    }

    #[test]
    fn test_last_section_sets_shared_column_width() {
        let sections = vec![
            Section::new("First", Some(table(&["A"], &[&["aaaaaaaaaaaaaaaaaaaa"]]))),
            Section::new("Second", Some(table(&["B"], &[&["b"]]))),
        ];
        let grid = compose(&RawReport::default(), &sections, now());
        assert_eq!(grid.column_widths.get(&0), Some(&4.0));
    }

    #[test]
    fn test_row_less_tables_are_skipped() {
        let sections = vec![
            Section::new("Scripts Details", Some(table(&["Script Name"], &[]))),
            Section::new("HTTP Headers", Some(table(&[], &[&[]]))),
            Section::new("Cardholder Data Asset Access", Some(table(&["C"], &[&["5"]]))),
        ];
        let grid = compose(&RawReport::default(), &sections, now());

        assert_eq!(text(&grid, 11, 0).as_deref(), Some("Cardholder Data Asset Access"));
        assert!(grid.cells.iter().all(|c| !matches!(
            &c.value,
            CellValue::Text(s) if s == "Scripts Details" || s == "HTTP Headers" || s == "Script Name"
        )));
    }
}
