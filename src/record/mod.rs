//! Tabular record model shared by every stage of the pipeline.
//!
//! A [`RecordSet`] is one table: a [`Schema`] (ordered, unique field names)
//! plus [`Record`]s in insertion order. Each record carries one optional
//! [`FieldValue`] per schema column; `None` means the cell is null.
//!
//! # Example
//!
//! ```
//! use refmerge_core::record::{FieldValue, RecordSet, Schema};
//!
//! let schema = Schema::new(["DOI", "Title"]);
//! let mut set = RecordSet::new(schema);
//! set.push_values(vec![Some(FieldValue::from("10.1/a")), None]);
//!
//! assert_eq!(set.len(), 1);
//! assert_eq!(set.value(&set.records()[0], "DOI"), Some(&FieldValue::from("10.1/a")));
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::warn;

/// A single scalar cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Free text (everything loaded from CSV lands here)
    Text(String),
    /// Whole number
    Integer(i64),
    /// Floating point number
    Float(f64),
}

impl FieldValue {
    /// Returns the text payload for `Text` values.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Integer(_) | Self::Float(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Ordered set of unique field names describing a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<String>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Builds a schema from field names. Later repeats of a name are ignored
    /// and logged at `warn`.
    #[must_use]
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schema = Self::default();
        for field in fields {
            let width = schema.len();
            let position = schema.push(field);
            if position < width {
                warn!(field = %schema.fields[position], "Repeated schema field ignored");
            }
        }
        schema
    }

    /// Appends a field and returns its column index.
    ///
    /// If the name already exists, the existing index is returned and the
    /// schema is unchanged.
    pub fn push(&mut self, field: impl Into<String>) -> usize {
        let field = field.into();
        if let Some(&existing) = self.index.get(&field) {
            return existing;
        }
        let position = self.fields.len();
        self.index.insert(field.clone(), position);
        self.fields.push(field);
        position
    }

    /// Returns the column index of `field`, if present.
    #[must_use]
    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.index.get(field).copied()
    }

    /// Returns true if the schema has a column named `field`.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.index.contains_key(field)
    }

    /// Field names in column order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One row: an optional value per schema column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    values: Vec<Option<FieldValue>>,
}

impl Record {
    /// Creates a record from column-ordered values.
    #[must_use]
    pub fn new(values: Vec<Option<FieldValue>>) -> Self {
        Self { values }
    }

    /// Value at column `index`; out-of-range columns read as null.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FieldValue> {
        self.values.get(index).and_then(Option::as_ref)
    }

    /// Replaces the value at column `index`, growing the row if needed.
    pub fn set(&mut self, index: usize, value: Option<FieldValue>) {
        if index >= self.values.len() {
            self.values.resize(index + 1, None);
        }
        self.values[index] = value;
    }

    /// All values in column order.
    #[must_use]
    pub fn values(&self) -> &[Option<FieldValue>] {
        &self.values
    }

    /// Consumes the record and returns its values.
    #[must_use]
    pub fn into_values(self) -> Vec<Option<FieldValue>> {
        self.values
    }

    pub(crate) fn resize(&mut self, width: usize) {
        self.values.resize(width, None);
    }
}

/// A table of records sharing one schema, in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordSet {
    schema: Schema,
    records: Vec<Record>,
}

impl RecordSet {
    /// Creates an empty table with the given schema.
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            records: Vec::new(),
        }
    }

    /// Creates a table from existing records.
    ///
    /// Rows are padded or truncated to the schema width.
    #[must_use]
    pub fn from_records(schema: Schema, records: Vec<Record>) -> Self {
        let mut set = Self::new(schema);
        for record in records {
            set.push(record);
        }
        set
    }

    /// Appends a record, normalizing its width to the schema.
    pub fn push(&mut self, mut record: Record) {
        record.resize(self.schema.len());
        self.records.push(record);
    }

    /// Appends a row given as column-ordered values.
    pub fn push_values(&mut self, values: Vec<Option<FieldValue>>) {
        self.push(Record::new(values));
    }

    /// Appends a row given as `(field, value)` pairs; unknown fields are ignored.
    pub fn push_fields<'a, I>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (&'a str, Option<FieldValue>)>,
    {
        let mut record = Record::new(vec![None; self.schema.len()]);
        for (field, value) in fields {
            if let Some(index) = self.schema.index_of(field) {
                record.set(index, value);
            }
        }
        self.records.push(record);
    }

    /// The table's schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Splits the table into its schema and records.
    #[must_use]
    pub fn into_parts(self) -> (Schema, Vec<Record>) {
        (self.schema, self.records)
    }

    /// Value of `field` in `record`, if the field exists and is non-null.
    #[must_use]
    pub fn value<'r>(&self, record: &'r Record, field: &str) -> Option<&'r FieldValue> {
        self.schema.index_of(field).and_then(|index| record.get(index))
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the table has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_push_returns_existing_index_for_repeat() {
        let mut schema = Schema::new(["DOI", "Title"]);
        assert_eq!(schema.push("Title"), 1);
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.push("Year"), 2);
        assert_eq!(schema.index_of("Year"), Some(2));
    }

    #[test]
    fn test_schema_new_keeps_first_of_repeated_names() {
        let schema = Schema::new(["Source_Database", "DOI", "Source_Database", "Title"]);
        assert_eq!(schema.fields(), &["Source_Database", "DOI", "Title"]);
        assert_eq!(schema.index_of("Title"), Some(2));
    }

    #[test]
    fn test_record_get_out_of_range_is_null() {
        let record = Record::new(vec![Some(FieldValue::from("x"))]);
        assert_eq!(record.get(0), Some(&FieldValue::from("x")));
        assert_eq!(record.get(5), None);
    }

    #[test]
    fn test_record_set_push_pads_short_rows() {
        let mut set = RecordSet::new(Schema::new(["A", "B", "C"]));
        set.push_values(vec![Some(FieldValue::from("a"))]);
        assert_eq!(set.records()[0].values().len(), 3);
        assert_eq!(set.records()[0].get(2), None);
    }

    #[test]
    fn test_record_set_push_fields_ignores_unknown_columns() {
        let mut set = RecordSet::new(Schema::new(["DOI", "Title"]));
        set.push_fields([
            ("Title", Some(FieldValue::from("T1"))),
            ("Nope", Some(FieldValue::from("ignored"))),
        ]);
        let record = &set.records()[0];
        assert_eq!(set.value(record, "Title"), Some(&FieldValue::from("T1")));
        assert_eq!(set.value(record, "DOI"), None);
        assert_eq!(set.value(record, "Nope"), None);
    }

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::from("10.1/x").to_string(), "10.1/x");
        assert_eq!(FieldValue::from(2024_i64).to_string(), "2024");
        assert_eq!(FieldValue::from(1.5_f64).to_string(), "1.5");
    }

    #[test]
    fn test_field_value_serializes_untagged() {
        let json = serde_json::to_string(&FieldValue::from("Scopus")).unwrap();
        assert_eq!(json, "\"Scopus\"");
        let json = serde_json::to_string(&FieldValue::from(7_i64)).unwrap();
        assert_eq!(json, "7");
    }
}
