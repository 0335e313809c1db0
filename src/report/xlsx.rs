use std::path::Path;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook};
use tracing::info;

use crate::error::Result;
use crate::report::output::write_atomic;
use crate::report::sheet::{CellStyle, CellValue, Grid, SHEET_NAME};

struct SheetFormats {
    plain: Format,
    bold: Format,
    table_header: Format,
    wrapped: Format,
}

impl SheetFormats {
    fn new() -> Self {
        Self {
            plain: Format::new(),
            bold: Format::new().set_bold().set_font_name("Calibri"),
            table_header: Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_border(FormatBorder::Thin),
            wrapped: Format::new().set_text_wrap().set_align(FormatAlign::Top),
        }
    }

    fn get(&self, style: CellStyle) -> &Format {
        match style {
            CellStyle::Plain => &self.plain,
            CellStyle::Bold => &self.bold,
            CellStyle::TableHeader => &self.table_header,
            CellStyle::Wrapped => &self.wrapped,
        }
    }
}

/// Encode the grid as a single-sheet .xlsx workbook
pub fn render(grid: &Grid) -> Result<Vec<u8>> {
    let formats = SheetFormats::new();
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for cell in &grid.cells {
        let format = formats.get(cell.style);
        match &cell.value {
            CellValue::Text(s) => {
                sheet.write_string_with_format(cell.row, cell.col, s, format)?;
            }
            CellValue::Number(n) => {
                sheet.write_number_with_format(cell.row, cell.col, *n, format)?;
            }
        }
    }

    for (&col, &width) in &grid.column_widths {
        sheet.set_column_width(col, width)?;
    }

    let buffer = workbook.save_to_buffer()?;
    Ok(buffer)
}

/// Write the grid to `path` as an Excel workbook
pub fn write(grid: &Grid, path: &Path) -> Result<()> {
    let buffer = render(grid)?;
    write_atomic(path, &buffer)?;
    info!("Excel report written to {}", path.display());
    Ok(())
}
