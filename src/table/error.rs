//! Error types for CSV table I/O.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing a CSV table.
#[derive(Debug, Error)]
pub enum TableError {
    /// File system error (open, create, write)
    #[error("IO error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV or invalid UTF-8
    #[error("CSV error in {path}: {source}")]
    Csv {
        /// File involved
        path: PathBuf,
        /// Underlying CSV error
        #[source]
        source: csv::Error,
    },

    /// Spreadsheet could not be built or saved
    #[error("XLSX error in {path}: {source}")]
    Xlsx {
        /// File involved
        path: PathBuf,
        /// Underlying writer error
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    /// A data row has more cells than the header
    #[error(
        "row on line {line} of {path} has {found} fields, header has {expected}\n  Suggestion: Check for unquoted delimiters in that row"
    )]
    RowTooWide {
        /// File involved
        path: PathBuf,
        /// 1-based line number of the row
        line: u64,
        /// Header width
        expected: usize,
        /// Row width
        found: usize,
    },
}

impl TableError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn xlsx(path: impl Into<PathBuf>, source: rust_xlsxwriter::XlsxError) -> Self {
        Self::Xlsx {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_too_wide_message() {
        let err = TableError::RowTooWide {
            path: PathBuf::from("scopus.csv"),
            line: 7,
            expected: 3,
            found: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("line 7"));
        assert!(msg.contains("scopus.csv"));
        assert!(msg.contains("5 fields"));
        assert!(msg.contains("Suggestion"));
    }

    #[test]
    fn test_io_error_message_includes_path() {
        let err = TableError::io(
            "missing.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.to_string().contains("missing.csv"));
    }
}
