//! Provenance label merging across a duplicate group.

use std::collections::BTreeSet;

use crate::record::Record;

/// Separator between merged provenance labels.
pub const PROVENANCE_SEPARATOR: &str = ", ";

/// Merges the provenance labels of a duplicate group.
///
/// Collects the value at column `provenance` from every record, drops nulls,
/// de-duplicates, sorts ascending and joins with [`PROVENANCE_SEPARATOR`].
/// Returns `None` when no record in the group carries a label, so callers
/// never overwrite a value with an empty string.
#[must_use]
pub fn merge_provenance<'a, I>(records: I, provenance: usize) -> Option<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    let labels: BTreeSet<String> = records
        .into_iter()
        .filter_map(|record| record.get(provenance))
        .map(ToString::to_string)
        .collect();

    if labels.is_empty() {
        return None;
    }
    Some(labels.into_iter().collect::<Vec<_>>().join(PROVENANCE_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;

    fn labelled(label: Option<&str>) -> Record {
        Record::new(vec![Some(FieldValue::from("10.1/z")), label.map(FieldValue::from)])
    }

    #[test]
    fn test_merge_sorts_and_deduplicates() {
        let group = [
            labelled(Some("Scopus")),
            labelled(Some("ScienceDirect")),
            labelled(Some("Scopus")),
        ];
        assert_eq!(
            merge_provenance(&group, 1).as_deref(),
            Some("ScienceDirect, Scopus")
        );
    }

    #[test]
    fn test_merge_skips_null_labels() {
        let group = [labelled(None), labelled(Some("Web of Science")), labelled(None)];
        assert_eq!(merge_provenance(&group, 1).as_deref(), Some("Web of Science"));
    }

    #[test]
    fn test_merge_all_null_is_none() {
        let group = [labelled(None), labelled(None)];
        assert_eq!(merge_provenance(&group, 1), None);
    }

    #[test]
    fn test_merge_singleton_is_identity() {
        let group = [labelled(Some("Scopus"))];
        assert_eq!(merge_provenance(&group, 1).as_deref(), Some("Scopus"));
    }
}
