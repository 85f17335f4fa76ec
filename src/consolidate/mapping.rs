//! Unified-schema column mapping loaded from JSON.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, instrument};

use super::MappingError;

/// Lowest (most shared) priority: field present in every source.
pub const MIN_PRIORITY: u8 = 1;

/// Highest priority: field present in a single source.
pub const MAX_PRIORITY: u8 = 3;

/// One column of the unified schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnifiedField {
    /// Column name in the consolidated table
    pub unified_name: String,
    /// 1 = in all sources, 2 = in two, 3 = in one
    pub priority: u8,
    /// Source key (e.g. `scopus`) → column name in that source's export
    #[serde(default)]
    pub mappings: BTreeMap<String, String>,
}

/// Unified schema definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnMapping {
    /// Fields of the unified schema, in file order
    pub unified_schema: Vec<UnifiedField>,
}

impl ColumnMapping {
    /// Loads and validates a mapping file.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError`] if the file cannot be read, is not valid JSON,
    /// or fails [`ColumnMapping::validate`].
    #[instrument(fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let raw = fs::read_to_string(path).map_err(|source| MappingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mapping: Self = serde_json::from_str(&raw).map_err(|source| MappingError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        mapping.validate()?;
        debug!(fields = mapping.unified_schema.len(), "Loaded column mapping");
        Ok(mapping)
    }

    /// Parses and validates a mapping from a JSON string.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ColumnMapping::load`], minus file access.
    pub fn from_json_str(raw: &str) -> Result<Self, MappingError> {
        let mapping: Self = serde_json::from_str(raw).map_err(|source| MappingError::Json {
            path: Path::new("<inline>").to_path_buf(),
            source,
        })?;
        mapping.validate()?;
        Ok(mapping)
    }

    /// Checks structural rules: non-empty, unique names, priority range.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::Invalid`] describing the first violation.
    pub fn validate(&self) -> Result<(), MappingError> {
        if self.unified_schema.is_empty() {
            return Err(MappingError::invalid("unified_schema has no fields"));
        }
        let mut names = HashSet::new();
        for field in &self.unified_schema {
            if field.unified_name.trim().is_empty() {
                return Err(MappingError::invalid("unified_name must not be empty"));
            }
            if !names.insert(field.unified_name.as_str()) {
                return Err(MappingError::invalid(format!(
                    "duplicate unified_name '{}'",
                    field.unified_name
                )));
            }
            if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&field.priority) {
                return Err(MappingError::invalid(format!(
                    "field '{}' has priority {}, expected {MIN_PRIORITY}..={MAX_PRIORITY}",
                    field.unified_name, field.priority
                )));
            }
        }
        Ok(())
    }

    /// Fields sorted by `(priority, unified_name)`: the consolidated column order.
    #[must_use]
    pub fn ordered_fields(&self) -> Vec<&UnifiedField> {
        let mut fields: Vec<&UnifiedField> = self.unified_schema.iter().collect();
        fields.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.unified_name.cmp(&b.unified_name))
        });
        fields
    }

    /// Number of fields per priority level.
    #[must_use]
    pub fn priority_counts(&self) -> BTreeMap<u8, usize> {
        let mut counts = BTreeMap::new();
        for field in &self.unified_schema {
            *counts.entry(field.priority).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "unified_schema": [
            {"unified_name": "Title", "priority": 1,
             "mappings": {"sciencedirect": "Title", "scopus": "Title", "webofscience": "Article Title"}},
            {"unified_name": "Abstract", "priority": 2,
             "mappings": {"scopus": "Abstract", "webofscience": "Abstract"}},
            {"unified_name": "DOI", "priority": 1,
             "mappings": {"sciencedirect": "DOI", "scopus": "DOI", "webofscience": "DOI"}},
            {"unified_name": "Funding", "priority": 3, "mappings": {"webofscience": "Funding Orgs"}}
        ]
    }"#;

    #[test]
    fn test_ordered_fields_sort_by_priority_then_name() {
        let mapping = ColumnMapping::from_json_str(SAMPLE).unwrap();
        let names: Vec<&str> = mapping
            .ordered_fields()
            .iter()
            .map(|f| f.unified_name.as_str())
            .collect();
        assert_eq!(names, vec!["DOI", "Title", "Abstract", "Funding"]);
    }

    #[test]
    fn test_priority_counts() {
        let mapping = ColumnMapping::from_json_str(SAMPLE).unwrap();
        let counts = mapping.priority_counts();
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&2), Some(&1));
        assert_eq!(counts.get(&3), Some(&1));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let raw = r#"{"unified_schema": [
            {"unified_name": "DOI", "priority": 1, "mappings": {}},
            {"unified_name": "DOI", "priority": 2, "mappings": {}}
        ]}"#;
        let err = ColumnMapping::from_json_str(raw).unwrap_err();
        assert!(err.to_string().contains("duplicate unified_name 'DOI'"));
    }

    #[test]
    fn test_rejects_out_of_range_priority() {
        let raw = r#"{"unified_schema": [{"unified_name": "DOI", "priority": 4}]}"#;
        let err = ColumnMapping::from_json_str(raw).unwrap_err();
        assert!(err.to_string().contains("priority 4"));
    }

    #[test]
    fn test_rejects_empty_schema() {
        let err = ColumnMapping::from_json_str(r#"{"unified_schema": []}"#).unwrap_err();
        assert!(matches!(err, MappingError::Invalid { .. }));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let err = ColumnMapping::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, MappingError::Json { .. }));
    }
}
