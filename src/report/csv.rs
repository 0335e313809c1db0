use std::path::Path;

use csv::Writer;
use tracing::info;

use crate::error::Result;
use crate::report::output::write_atomic;
use crate::report::tables::Table;

/// Encode a table as comma-separated text with a header row
pub fn render(table: &Table) -> Result<Vec<u8>> {
    let mut wtr = Writer::from_writer(vec![]);
    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    let data = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(data)
}

/// Write a table to `path` as UTF-8 CSV
pub fn write(table: &Table, path: &Path) -> Result<()> {
    let data = render(table)?;
    write_atomic(path, &data)?;
    info!("CSV report written to {} ({} rows)", path.display(), table.len());
    Ok(())
}
