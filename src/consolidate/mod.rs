//! Consolidation of heterogeneous database exports into one unified table.
//!
//! Each export is renamed column-by-column into the unified schema described
//! by a [`ColumnMapping`]; fields a source does not provide are null. The
//! mapped tables are concatenated in source order, optionally tagged with a
//! provenance column naming the source database.

mod error;
mod mapping;

pub use error::MappingError;
pub use mapping::{ColumnMapping, MAX_PRIORITY, MIN_PRIORITY, UnifiedField};

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::{info, instrument};

use crate::dedup::DEFAULT_PROVENANCE_FIELD;
use crate::record::{FieldValue, Record, RecordSet, Schema};
use crate::table::read_csv;

/// Literature databases with built-in mapping keys and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceDatabase {
    /// Elsevier ScienceDirect
    ScienceDirect,
    /// Elsevier Scopus
    Scopus,
    /// Clarivate Web of Science
    WebOfScience,
}

impl SourceDatabase {
    /// All built-in sources, in consolidation order.
    pub const ALL: [Self; 3] = [Self::ScienceDirect, Self::Scopus, Self::WebOfScience];

    /// Key used in the column mapping's `mappings` objects.
    #[must_use]
    pub fn mapping_key(self) -> &'static str {
        match self {
            Self::ScienceDirect => "sciencedirect",
            Self::Scopus => "scopus",
            Self::WebOfScience => "webofscience",
        }
    }

    /// Provenance label written into the consolidated table.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ScienceDirect => "ScienceDirect",
            Self::Scopus => "Scopus",
            Self::WebOfScience => "Web of Science",
        }
    }
}

impl fmt::Display for SourceDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One loaded export awaiting consolidation.
#[derive(Debug, Clone)]
pub struct SourceTable {
    /// Mapping key for this source
    pub key: String,
    /// Provenance label for this source
    pub label: String,
    /// Raw export contents
    pub records: RecordSet,
}

impl SourceTable {
    /// Wraps an export of a built-in source database.
    #[must_use]
    pub fn from_database(database: SourceDatabase, records: RecordSet) -> Self {
        Self {
            key: database.mapping_key().to_string(),
            label: database.label().to_string(),
            records,
        }
    }

    /// Reads a built-in source's CSV export from disk.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::Table`] if the export cannot be loaded.
    pub fn load(database: SourceDatabase, path: &Path) -> Result<Self, MappingError> {
        let records = read_csv(path)?;
        info!(source = %database, records = records.len(), "Loaded export");
        Ok(Self::from_database(database, records))
    }
}

/// Per-run figures for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsolidationSummary {
    /// `(label, record count)` in source order
    pub records_per_source: Vec<(String, usize)>,
    /// Records in the consolidated table
    pub total_records: usize,
    /// Columns in the consolidated table
    pub total_columns: usize,
    /// Unified field count per priority level
    pub priority_counts: BTreeMap<u8, usize>,
}

/// Consolidated table plus summary.
#[derive(Debug, Clone)]
pub struct Consolidated {
    /// Unified table
    pub records: RecordSet,
    /// Summary figures
    pub summary: ConsolidationSummary,
}

/// Projects one export onto the unified schema.
///
/// A unified column is copied from the source when the mapping names a
/// column for `source_key` and the export has it; otherwise it is null.
#[must_use]
pub fn map_to_unified(table: &RecordSet, source_key: &str, mapping: &ColumnMapping) -> RecordSet {
    let fields = mapping.ordered_fields();
    let sources: Vec<Option<usize>> = fields
        .iter()
        .map(|field| {
            field
                .mappings
                .get(source_key)
                .and_then(|column| table.schema().index_of(column))
        })
        .collect();

    let schema = Schema::new(fields.iter().map(|field| field.unified_name.clone()));
    let records = table
        .records()
        .iter()
        .map(|record| {
            Record::new(
                sources
                    .iter()
                    .map(|source| source.and_then(|index| record.get(index).cloned()))
                    .collect(),
            )
        })
        .collect();

    RecordSet::from_records(schema, records)
}

/// Maps every source onto the unified schema and concatenates them.
///
/// With `add_source_column`, a provenance column holding each source's label
/// becomes the first column.
///
/// # Errors
///
/// Returns [`MappingError::Invalid`] if `add_source_column` is set and the
/// mapping already defines a unified field with the provenance column name.
#[instrument(skip(sources, mapping), fields(sources = sources.len()))]
pub fn consolidate(
    sources: &[SourceTable],
    mapping: &ColumnMapping,
    add_source_column: bool,
) -> Result<Consolidated, MappingError> {
    let fields = mapping.ordered_fields();
    if add_source_column
        && fields
            .iter()
            .any(|field| field.unified_name == DEFAULT_PROVENANCE_FIELD)
    {
        return Err(MappingError::invalid(format!(
            "unified field '{DEFAULT_PROVENANCE_FIELD}' collides with the source column; \
             rename it or disable the source column"
        )));
    }
    let mut columns: Vec<String> = Vec::with_capacity(fields.len() + 1);
    if add_source_column {
        columns.push(DEFAULT_PROVENANCE_FIELD.to_string());
    }
    columns.extend(fields.iter().map(|field| field.unified_name.clone()));

    let mut output = RecordSet::new(Schema::new(columns));
    let mut records_per_source = Vec::with_capacity(sources.len());

    for source in sources {
        let unified = map_to_unified(&source.records, &source.key, mapping);
        records_per_source.push((source.label.clone(), unified.len()));
        info!(source = %source.label, records = unified.len(), "Mapped source to unified schema");

        let (_, records) = unified.into_parts();
        for record in records {
            let mut values = Vec::with_capacity(output.schema().len());
            if add_source_column {
                values.push(Some(FieldValue::from(source.label.as_str())));
            }
            values.extend(record.into_values());
            output.push_values(values);
        }
    }

    let summary = ConsolidationSummary {
        records_per_source,
        total_records: output.len(),
        total_columns: output.schema().len(),
        priority_counts: mapping.priority_counts(),
    };
    info!(
        records = summary.total_records,
        columns = summary.total_columns,
        "Consolidation complete"
    );

    Ok(Consolidated {
        records: output,
        summary,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn mapping() -> ColumnMapping {
        ColumnMapping::from_json_str(
            r#"{"unified_schema": [
                {"unified_name": "Title", "priority": 1,
                 "mappings": {"scopus": "Title", "webofscience": "Article Title"}},
                {"unified_name": "DOI", "priority": 1,
                 "mappings": {"scopus": "DOI", "webofscience": "DOI"}},
                {"unified_name": "Keywords", "priority": 3,
                 "mappings": {"scopus": "Author Keywords"}}
            ]}"#,
        )
        .unwrap()
    }

    fn export(columns: &[&str], rows: &[&[&str]]) -> RecordSet {
        let mut set = RecordSet::new(Schema::new(columns.iter().copied()));
        for row in rows {
            set.push_values(row.iter().map(|cell| Some(FieldValue::from(*cell))).collect());
        }
        set
    }

    #[test]
    fn test_map_to_unified_renames_and_fills_nulls() {
        let wos = export(&["Article Title", "DOI", "Extra"], &[&["Paper", "10.1/w", "x"]]);
        let unified = map_to_unified(&wos, "webofscience", &mapping());
        assert_eq!(unified.schema().fields(), &["DOI", "Title", "Keywords"]);
        let record = &unified.records()[0];
        assert_eq!(unified.value(record, "Title"), Some(&FieldValue::from("Paper")));
        assert_eq!(unified.value(record, "DOI"), Some(&FieldValue::from("10.1/w")));
        assert_eq!(unified.value(record, "Keywords"), None);
    }

    #[test]
    fn test_map_to_unified_missing_source_column_is_null() {
        let scopus = export(&["Title"], &[&["Only title"]]);
        let unified = map_to_unified(&scopus, "scopus", &mapping());
        assert_eq!(unified.value(&unified.records()[0], "DOI"), None);
    }

    #[test]
    fn test_consolidate_prepends_source_column_in_source_order() {
        let sources = vec![
            SourceTable::from_database(
                SourceDatabase::Scopus,
                export(&["Title", "DOI"], &[&["S1", "10.1/a"], &["S2", "10.1/b"]]),
            ),
            SourceTable::from_database(
                SourceDatabase::WebOfScience,
                export(&["Article Title", "DOI"], &[&["W1", "10.1/a"]]),
            ),
        ];
        let result = consolidate(&sources, &mapping(), true).unwrap();
        let set = &result.records;
        assert_eq!(set.schema().fields()[0], "Source_Database");
        assert_eq!(set.len(), 3);
        let labels: Vec<String> = set
            .records()
            .iter()
            .map(|r| set.value(r, "Source_Database").unwrap().to_string())
            .collect();
        assert_eq!(labels, vec!["Scopus", "Scopus", "Web of Science"]);
        assert_eq!(
            result.summary.records_per_source,
            vec![("Scopus".to_string(), 2), ("Web of Science".to_string(), 1)]
        );
        assert_eq!(result.summary.total_columns, 4);
    }

    #[test]
    fn test_consolidate_without_source_column() {
        let sources = vec![SourceTable::from_database(
            SourceDatabase::Scopus,
            export(&["Title"], &[&["S1"]]),
        )];
        let result = consolidate(&sources, &mapping(), false).unwrap();
        assert!(!result.records.schema().contains("Source_Database"));
        assert_eq!(result.summary.total_columns, 3);
    }

    #[test]
    fn test_unmapped_source_key_yields_all_nulls() {
        let table = export(&["Title", "DOI"], &[&["T", "10.1/z"]]);
        let unified = map_to_unified(&table, "sciencedirect", &mapping());
        assert!(unified.records()[0].values().iter().all(Option::is_none));
    }

    #[test]
    fn test_source_column_collision_is_rejected() {
        let mapping = ColumnMapping::from_json_str(
            r#"{"unified_schema": [
                {"unified_name": "DOI", "priority": 1, "mappings": {"scopus": "DOI"}},
                {"unified_name": "Source_Database", "priority": 2,
                 "mappings": {"scopus": "Source"}},
                {"unified_name": "Title", "priority": 3, "mappings": {"scopus": "Title"}}
            ]}"#,
        )
        .unwrap();
        let sources = vec![SourceTable::from_database(
            SourceDatabase::Scopus,
            export(&["DOI", "Source", "Title"], &[&["10.1/a", "Elsevier", "Paper"]]),
        )];

        let err = consolidate(&sources, &mapping, true).unwrap_err();
        assert!(matches!(err, MappingError::Invalid { .. }));
        assert!(err.to_string().contains("Source_Database"));

        // Without the added column the mapped field is kept as data
        let result = consolidate(&sources, &mapping, false).unwrap();
        let set = &result.records;
        let row = &set.records()[0];
        assert_eq!(set.value(row, "Source_Database"), Some(&FieldValue::from("Elsevier")));
        assert_eq!(set.value(row, "Title"), Some(&FieldValue::from("Paper")));
    }
}
