//! [`RecordSet`] → CSV.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tracing::{debug, instrument};

use super::TableError;
use crate::record::RecordSet;

const STREAM_LABEL: &str = "<stream>";

/// Writes a table to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`TableError`] if the directory or file cannot be created or the
/// data cannot be written.
#[instrument(skip(set), fields(path = %path.display(), records = set.len()))]
pub fn write_csv(path: &Path, set: &RecordSet) -> Result<(), TableError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TableError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| TableError::io(path, e))?;
    write_table(file, set, path)?;
    debug!("Wrote CSV table");
    Ok(())
}

/// Writes a table to any writer. Null cells are written empty.
///
/// # Errors
///
/// Returns [`TableError::Csv`] if writing fails.
pub fn write_csv_to<W: Write>(writer: W, set: &RecordSet) -> Result<(), TableError> {
    write_table(writer, set, Path::new(STREAM_LABEL))
}

fn write_table<W: Write>(writer: W, set: &RecordSet, path: &Path) -> Result<(), TableError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer
        .write_record(set.schema().fields())
        .map_err(|e| TableError::csv(path, e))?;

    for record in set.records() {
        let cells = record
            .values()
            .iter()
            .map(|value| value.as_ref().map(ToString::to_string).unwrap_or_default());
        writer
            .write_record(cells)
            .map_err(|e| TableError::csv(path, e))?;
    }

    writer.flush().map_err(|e| TableError::io(path, e))
}
