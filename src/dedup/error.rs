//! Error types for deduplication.

use thiserror::Error;

/// Errors that abort a deduplication run before any record is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DedupError {
    /// The configured identifier column is not part of the table schema.
    #[error(
        "identifier column '{field}' not found in the table\n  Available columns: {available}\n  Suggestion: Pass the DOI column name with --doi-column"
    )]
    MissingIdentifierField {
        /// The configured identifier column
        field: String,
        /// Comma-separated schema columns, for display
        available: String,
    },

    /// A keep-strategy name that is not one of the supported strategies.
    #[error(
        "unknown keep strategy '{requested}'\n  Suggestion: Use one of most_complete, first, last"
    )]
    UnknownStrategy {
        /// The strategy name as given
        requested: String,
    },
}

impl DedupError {
    /// Creates a `MissingIdentifierField` error listing the available columns.
    #[must_use]
    pub fn missing_identifier(field: &str, available: &[String]) -> Self {
        Self::MissingIdentifierField {
            field: field.to_string(),
            available: available.join(", "),
        }
    }

    /// Creates an `UnknownStrategy` error.
    #[must_use]
    pub fn unknown_strategy(requested: &str) -> Self {
        Self::UnknownStrategy {
            requested: requested.to_string(),
        }
    }
}
