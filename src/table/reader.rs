//! CSV → [`RecordSet`].

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, instrument, warn};

use super::TableError;
use crate::record::{FieldValue, RecordSet, Schema};

const STREAM_LABEL: &str = "<stream>";

/// Loads a CSV file into a table.
///
/// # Errors
///
/// Returns [`TableError`] if the file cannot be opened, is not valid CSV, or
/// has a row wider than its header.
#[instrument(fields(path = %path.display()))]
pub fn read_csv(path: &Path) -> Result<RecordSet, TableError> {
    let file = File::open(path).map_err(|e| TableError::io(path, e))?;
    let set = read_table(file, path)?;
    debug!(records = set.len(), columns = set.schema().len(), "Loaded CSV table");
    Ok(set)
}

/// Loads CSV data from any reader.
///
/// # Errors
///
/// Same conditions as [`read_csv`].
pub fn read_csv_from<R: Read>(reader: R) -> Result<RecordSet, TableError> {
    read_table(reader, Path::new(STREAM_LABEL))
}

fn read_table<R: Read>(reader: R, path: &Path) -> Result<RecordSet, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| TableError::csv(path, e))?
        .iter()
        .enumerate()
        .map(|(index, name)| {
            if index == 0 {
                name.trim_start_matches('\u{feff}').to_string()
            } else {
                name.to_string()
            }
        })
        .collect::<Vec<_>>();
    let schema = Schema::new(unique_headers(headers));
    let width = schema.len();
    let mut set = RecordSet::new(schema);

    for row in reader.records() {
        let row = row.map_err(|e| TableError::csv(path, e))?;
        if row.len() > width {
            return Err(TableError::RowTooWide {
                path: path.to_path_buf(),
                line: row.position().map_or(0, csv::Position::line),
                expected: width,
                found: row.len(),
            });
        }
        let values = row
            .iter()
            .map(|cell| (!cell.is_empty()).then(|| FieldValue::from(cell)))
            .collect();
        set.push_values(values);
    }

    Ok(set)
}

/// Disambiguates repeated header names with `.1`, `.2`, ... suffixes.
fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = headers.iter().cloned().collect();
    let mut taken: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(headers.len());

    for name in headers {
        if taken.insert(name.clone()) {
            out.push(name);
            continue;
        }
        let mut suffix = 1;
        let renamed = loop {
            let candidate = format!("{name}.{suffix}");
            if !seen.contains(&candidate) {
                break candidate;
            }
            suffix += 1;
        };
        warn!(column = %name, renamed = %renamed, "Duplicate column header renamed");
        seen.insert(renamed.clone());
        taken.insert(renamed.clone());
        out.push(renamed);
    }

    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cells_load_as_null() {
        let set = read_csv_from("DOI,Title\n10.1/a,\n,Only title\n".as_bytes()).unwrap();
        assert_eq!(set.len(), 2);
        let first = &set.records()[0];
        assert_eq!(set.value(first, "DOI"), Some(&FieldValue::from("10.1/a")));
        assert_eq!(set.value(first, "Title"), None);
        assert_eq!(set.value(&set.records()[1], "DOI"), None);
    }

    #[test]
    fn test_values_stay_text() {
        let set = read_csv_from("Year,Cited\n2021,0012\n".as_bytes()).unwrap();
        let record = &set.records()[0];
        assert_eq!(set.value(record, "Cited"), Some(&FieldValue::from("0012")));
    }

    #[test]
    fn test_bom_stripped_from_first_header() {
        let set = read_csv_from("\u{feff}DOI,Title\nx,y\n".as_bytes()).unwrap();
        assert!(set.schema().contains("DOI"));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let set = read_csv_from("A,B,C\n1\n".as_bytes()).unwrap();
        assert_eq!(set.records()[0].values(), &[Some(FieldValue::from("1")), None, None]);
    }

    #[test]
    fn test_wide_row_is_error() {
        let err = read_csv_from("A,B\n1,2,3\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            TableError::RowTooWide {
                expected: 2,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_headers_are_suffixed() {
        let set = read_csv_from("Title,Title,Title.1\na,b,c\n".as_bytes()).unwrap();
        assert_eq!(set.schema().fields(), &["Title", "Title.2", "Title.1"]);
    }

    #[test]
    fn test_quoted_fields_with_commas_and_newlines() {
        let set = read_csv_from("DOI,Title\n10.1/q,\"A, B\nC\"\n".as_bytes()).unwrap();
        let record = &set.records()[0];
        assert_eq!(set.value(record, "Title"), Some(&FieldValue::from("A, B\nC")));
    }
}
