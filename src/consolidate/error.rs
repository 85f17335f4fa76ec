//! Error types for column mapping and consolidation.

use std::path::PathBuf;

use thiserror::Error;

use crate::table::TableError;

/// Errors that can occur while loading a column mapping or consolidating sources.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Mapping file could not be read
    #[error("IO error reading column mapping {path}: {source}")]
    Io {
        /// Mapping file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Mapping file is not valid JSON for the expected shape
    #[error(
        "invalid column mapping JSON in {path}: {source}\n  Suggestion: Expected {{\"unified_schema\": [{{\"unified_name\", \"priority\", \"mappings\"}}]}}"
    )]
    Json {
        /// Mapping file
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Mapping parsed but breaks a structural rule
    #[error("invalid column mapping: {reason}")]
    Invalid {
        /// What is wrong
        reason: String,
    },

    /// Loading a source table failed
    #[error(transparent)]
    Table(#[from] TableError),
}

impl MappingError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}
