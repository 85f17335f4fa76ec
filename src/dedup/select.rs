//! Grouping of keyed records by identifier and per-group selection.
//!
//! Groups are an explicit identifier → ordered-index mapping, so both the
//! first-seen order of groups and the input order inside each group are
//! part of the data rather than an artifact of sort stability.

use std::collections::HashMap;

use tracing::trace;

use super::provenance::merge_provenance;
use super::score::completeness_score;
use super::strategy::KeepStrategy;
use crate::record::Record;

/// Column positions the selection engine works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyColumns {
    /// Identifier column
    pub identifier: usize,
    /// Provenance column, when the schema has one
    pub provenance: Option<usize>,
}

/// Records sharing one identifier, as indices into the input slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierGroup {
    /// Textual identifier value
    pub identifier: String,
    /// Member indices in input order (never empty)
    pub members: Vec<usize>,
}

impl IdentifierGroup {
    /// True when more than one record shares the identifier.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.members.len() > 1
    }
}

/// Partitions records by identifier, in first-seen group order.
///
/// Records whose identifier is null are not part of any group.
#[must_use]
pub fn group_by_identifier(records: &[Record], identifier: usize) -> Vec<IdentifierGroup> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<IdentifierGroup> = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let Some(value) = record.get(identifier) else {
            continue;
        };
        let key = value.to_string();
        match positions.get(&key) {
            Some(&group) => groups[group].members.push(index),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(IdentifierGroup {
                    identifier: key,
                    members: vec![index],
                });
            }
        }
    }

    groups
}

/// Picks the surviving member of a group, returning its input index.
///
/// Returns `None` only for an empty member list.
#[must_use]
pub fn select_representative(
    records: &[Record],
    members: &[usize],
    strategy: KeepStrategy,
) -> Option<usize> {
    match strategy {
        KeepStrategy::First => members.first().copied(),
        KeepStrategy::Last => members.last().copied(),
        KeepStrategy::MostComplete => {
            let mut best: Option<(usize, usize)> = None;
            for &index in members {
                let score = completeness_score(&records[index]);
                // Strictly greater: ties keep the earlier record.
                if best.is_none_or(|(_, best_score)| score > best_score) {
                    best = Some((index, score));
                }
            }
            best.map(|(index, _)| index)
        }
    }
}

/// Produces one record per group, in group order.
///
/// When `merge_provenance` is set and `columns.provenance` is known, the
/// selected record's provenance is replaced by the merged labels of the
/// whole group. A group with no labels keeps the selected record as is.
#[must_use]
pub fn deduplicate_groups(
    records: &[Record],
    groups: &[IdentifierGroup],
    columns: KeyColumns,
    strategy: KeepStrategy,
    merge_provenance_labels: bool,
) -> Vec<Record> {
    let provenance = columns.provenance.filter(|_| merge_provenance_labels);

    groups
        .iter()
        .filter_map(|group| {
            let selected = select_representative(records, &group.members, strategy)?;
            let mut survivor = records[selected].clone();

            if let Some(column) = provenance {
                let merged =
                    merge_provenance(group.members.iter().map(|&index| &records[index]), column);
                if let Some(merged) = merged {
                    survivor.set(column, Some(merged.into()));
                }
            }

            trace!(
                identifier = %group.identifier,
                members = group.members.len(),
                selected,
                "Selected group representative"
            );
            Some(survivor)
        })
        .collect()
}

/// Deduplicates identifier-bearing records: one output record per identifier.
///
/// Records with a null identifier are skipped; the orchestrator routes those
/// around this function.
#[must_use]
pub fn deduplicate_keyed(
    records: &[Record],
    columns: KeyColumns,
    strategy: KeepStrategy,
    merge_provenance_labels: bool,
) -> Vec<Record> {
    let groups = group_by_identifier(records, columns.identifier);
    deduplicate_groups(records, &groups, columns, strategy, merge_provenance_labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;

    const COLUMNS: KeyColumns = KeyColumns {
        identifier: 0,
        provenance: Some(1),
    };

    /// Builds `[doi, source, title, extra fields...]` with `filled` populated extras.
    fn rec(doi: &str, source: Option<&str>, title: &str, filled: usize) -> Record {
        let mut values = vec![
            Some(FieldValue::from(doi)),
            source.map(FieldValue::from),
            Some(FieldValue::from(title)),
        ];
        values.extend((0..8).map(|i| (i < filled).then(|| FieldValue::from(i as i64))));
        Record::new(values)
    }

    fn title(record: &Record) -> &str {
        record.get(2).and_then(FieldValue::as_text).unwrap_or_default()
    }

    #[test]
    fn test_grouping_preserves_first_seen_order() {
        let records = vec![
            rec("b", None, "b1", 0),
            rec("a", None, "a1", 0),
            rec("b", None, "b2", 0),
        ];
        let groups = group_by_identifier(&records, 0);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].identifier, "b");
        assert_eq!(groups[0].members, vec![0, 2]);
        assert_eq!(groups[1].identifier, "a");
        assert!(groups[0].is_duplicate());
        assert!(!groups[1].is_duplicate());
    }

    #[test]
    fn test_grouping_skips_null_identifiers() {
        let mut unkeyed = rec("x", None, "t", 0);
        unkeyed.set(0, None);
        let records = vec![unkeyed, rec("x", None, "t", 0)];
        let groups = group_by_identifier(&records, 0);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members, vec![1]);
    }

    #[test]
    fn test_grouping_is_case_sensitive() {
        let records = vec![rec("10.1/ABC", None, "t", 0), rec("10.1/abc", None, "t", 0)];
        assert_eq!(group_by_identifier(&records, 0).len(), 2);
    }

    #[test]
    fn test_most_complete_picks_highest_score() {
        let records = vec![rec("10.1/x", None, "sparse", 2), rec("10.1/x", None, "rich", 5)];
        let out = deduplicate_keyed(&records, COLUMNS, KeepStrategy::MostComplete, false);
        assert_eq!(out.len(), 1);
        assert_eq!(title(&out[0]), "rich");
    }

    #[test]
    fn test_most_complete_tie_goes_to_earliest() {
        let records = vec![
            rec("10.1/y", None, "first", 3),
            rec("10.1/y", None, "second", 3),
            rec("10.1/y", None, "third", 1),
        ];
        for _ in 0..5 {
            let out = deduplicate_keyed(&records, COLUMNS, KeepStrategy::MostComplete, false);
            assert_eq!(title(&out[0]), "first");
        }
    }

    #[test]
    fn test_first_and_last_ignore_completeness() {
        let records = vec![
            rec("10.1/w", None, "A", 0),
            rec("10.1/w", None, "B", 8),
            rec("10.1/w", None, "C", 0),
        ];
        let first = deduplicate_keyed(&records, COLUMNS, KeepStrategy::First, false);
        let last = deduplicate_keyed(&records, COLUMNS, KeepStrategy::Last, false);
        assert_eq!(title(&first[0]), "A");
        assert_eq!(title(&last[0]), "C");
    }

    #[test]
    fn test_merged_provenance_replaces_survivor_label() {
        let records = vec![
            rec("10.1/z", Some("Scopus"), "a", 0),
            rec("10.1/z", Some("ScienceDirect"), "b", 4),
            rec("10.1/z", Some("Scopus"), "c", 0),
        ];
        let out = deduplicate_keyed(&records, COLUMNS, KeepStrategy::MostComplete, true);
        assert_eq!(title(&out[0]), "b");
        assert_eq!(out[0].get(1), Some(&FieldValue::from("ScienceDirect, Scopus")));
    }

    #[test]
    fn test_provenance_untouched_when_merge_disabled() {
        let records = vec![rec("10.1/z", Some("Scopus"), "a", 0), rec("10.1/z", Some("WoS"), "b", 0)];
        let out = deduplicate_keyed(&records, COLUMNS, KeepStrategy::Last, false);
        assert_eq!(out[0].get(1), Some(&FieldValue::from("WoS")));
    }

    #[test]
    fn test_singleton_null_provenance_stays_null() {
        let records = vec![rec("10.1/s", None, "alone", 0)];
        let out = deduplicate_keyed(&records, COLUMNS, KeepStrategy::MostComplete, true);
        assert_eq!(out[0], records[0]);
        assert_eq!(out[0].get(1), None);
    }

    #[test]
    fn test_group_with_only_null_provenance_keeps_null() {
        let records = vec![rec("10.1/n", None, "short", 1), rec("10.1/n", None, "long", 3)];
        let out = deduplicate_keyed(&records, COLUMNS, KeepStrategy::MostComplete, true);
        assert_eq!(out.len(), 1);
        assert_eq!(title(&out[0]), "long");
        assert_eq!(out[0].get(1), None);
        assert_eq!(out[0], records[1]);
    }

    #[test]
    fn test_merge_without_provenance_column_is_noop() {
        let columns = KeyColumns {
            identifier: 0,
            provenance: None,
        };
        let records = vec![rec("d", Some("A"), "x", 0), rec("d", Some("B"), "y", 0)];
        let out = deduplicate_keyed(&records, columns, KeepStrategy::First, true);
        assert_eq!(out[0], records[0]);
    }

    #[test]
    fn test_select_representative_empty_members() {
        assert_eq!(select_representative(&[], &[], KeepStrategy::MostComplete), None);
    }
}
