//! [`RecordSet`] → XLSX, one worksheet with a header row.

use std::fs;
use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use tracing::{debug, instrument};

use super::TableError;
use crate::record::{FieldValue, RecordSet};

/// Writes a table to an `.xlsx` workbook, creating parent directories as
/// needed. Null cells are left blank; numbers are written as numbers.
///
/// # Errors
///
/// Returns [`TableError`] if the directory cannot be created, the table
/// exceeds the worksheet limits, or the workbook cannot be saved.
#[instrument(skip(set), fields(path = %path.display(), records = set.len()))]
pub fn write_xlsx(path: &Path, set: &RecordSet) -> Result<(), TableError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TableError::io(parent, e))?;
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    write_sheet(worksheet, set).map_err(|e| TableError::xlsx(path, e))?;
    workbook.save(path).map_err(|e| TableError::xlsx(path, e))?;

    debug!("Wrote XLSX table");
    Ok(())
}

fn write_sheet(worksheet: &mut Worksheet, set: &RecordSet) -> Result<(), XlsxError> {
    for (col, name) in set.schema().fields().iter().enumerate() {
        worksheet.write_string(0, column_index(col)?, name)?;
    }

    for (index, record) in set.records().iter().enumerate() {
        // Row 0 is the header
        let row = u32::try_from(index + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, value) in record.values().iter().enumerate() {
            let Some(value) = value else {
                continue;
            };
            let col = column_index(col)?;
            match value {
                FieldValue::Text(text) => worksheet.write_string(row, col, text)?,
                #[allow(clippy::cast_precision_loss)]
                FieldValue::Integer(n) => worksheet.write_number(row, col, *n as f64)?,
                FieldValue::Float(x) => worksheet.write_number(row, col, *x)?,
            };
        }
    }
    Ok(())
}

fn column_index(col: usize) -> Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}
