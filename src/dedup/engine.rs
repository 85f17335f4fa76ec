//! Deduplication orchestrator.
//!
//! Validate → partition → (fast-path exit | group + select) → recombine →
//! report. Nothing is produced unless validation passes; the returned
//! [`DedupOutcome`] always carries a full [`DedupReport`].

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::select::{KeyColumns, deduplicate_groups, group_by_identifier};
use super::strategy::{KeepStrategy, ResolvedStrategy, StrategyFallback};
use super::DedupError;
use crate::record::{Record, RecordSet};

/// Default identifier column.
pub const DEFAULT_IDENTIFIER_FIELD: &str = "DOI";

/// Default provenance column.
pub const DEFAULT_PROVENANCE_FIELD: &str = "Source_Database";

/// Column used to describe duplicate samples in the report.
pub const TITLE_FIELD: &str = "Title";

/// Number of duplicate groups sampled into the report.
pub const DUPLICATE_SAMPLE_LIMIT: usize = 3;

/// Title characters kept in a duplicate sample before truncation.
pub const SAMPLE_TITLE_CHARS: usize = 60;

/// Options for one deduplication run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupOptions {
    /// Column whose value identifies the same work
    pub identifier_field: String,
    /// Column naming the source database; `None` disables provenance merging
    pub provenance_field: Option<String>,
    /// Keep-strategy, with any fallback that produced it
    pub strategy: ResolvedStrategy,
    /// Merge provenance labels of duplicates into the survivor
    pub merge_provenance: bool,
}

impl Default for DedupOptions {
    fn default() -> Self {
        Self {
            identifier_field: DEFAULT_IDENTIFIER_FIELD.to_string(),
            provenance_field: Some(DEFAULT_PROVENANCE_FIELD.to_string()),
            strategy: ResolvedStrategy::default(),
            merge_provenance: true,
        }
    }
}

impl DedupOptions {
    /// Default options with the given keep-strategy.
    #[must_use]
    pub fn with_strategy(strategy: KeepStrategy) -> Self {
        Self {
            strategy: strategy.into(),
            ..Self::default()
        }
    }
}

/// Counts describing a run, computed before any record is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DedupStats {
    /// Records in the input table
    pub input_count: usize,
    /// Records with a null identifier (never deduplicated)
    pub unkeyed_count: usize,
    /// Records belonging to a group of two or more
    pub duplicate_record_count: usize,
    /// Identifiers that have such a group
    pub unique_duplicate_identifier_count: usize,
    /// `input_count - final_count`
    pub removed_count: usize,
    /// Records in the output table
    pub final_count: usize,
}

/// One duplicated identifier, described for human review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateSample {
    /// Shared identifier value
    pub identifier: String,
    /// Provenance label of each member, in input order
    pub sources: Vec<Option<String>>,
    /// Title of the first member, truncated for display
    pub title: Option<String>,
}

/// Everything a reporting collaborator needs about a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DedupReport {
    /// Counts
    pub stats: DedupStats,
    /// Strategy that was applied
    pub strategy: KeepStrategy,
    /// Set when an unknown strategy name was replaced
    pub strategy_fallback: Option<StrategyFallback>,
    /// Whether provenance labels were merged into survivors
    pub provenance_merged: bool,
    /// Up to [`DUPLICATE_SAMPLE_LIMIT`] duplicated identifiers
    pub samples: Vec<DuplicateSample>,
}

impl DedupReport {
    /// True when the input had no duplicated identifier.
    #[must_use]
    pub fn is_duplicate_free(&self) -> bool {
        self.stats.duplicate_record_count == 0
    }
}

/// Deduplicated table plus its report.
#[derive(Debug, Clone, PartialEq)]
pub struct DedupOutcome {
    /// Output table, same schema as the input
    pub records: RecordSet,
    /// Run report
    pub report: DedupReport,
}

/// Removes records that share an identifier, keeping one per identifier.
///
/// Unkeyed records pass through untouched and come first in the output,
/// followed by one record per identifier in first-seen order. When no
/// identifier repeats, the input is returned unchanged.
///
/// # Errors
///
/// Returns [`DedupError::MissingIdentifierField`] if the identifier column
/// is not in the schema. Nothing is produced in that case.
///
/// # Example
///
/// ```
/// use refmerge_core::dedup::{DedupOptions, KeepStrategy, deduplicate};
/// use refmerge_core::record::{FieldValue, RecordSet, Schema};
///
/// let mut input = RecordSet::new(Schema::new(["DOI", "Title", "Source_Database"]));
/// input.push_values(vec![Some("10.1/a".into()), Some("T1".into()), Some("Scopus".into())]);
/// input.push_values(vec![Some("10.1/a".into()), Some("T1".into()), Some("ScienceDirect".into())]);
///
/// let outcome = deduplicate(&input, &DedupOptions::with_strategy(KeepStrategy::First))?;
/// assert_eq!(outcome.records.len(), 1);
/// assert_eq!(
///     outcome.records.value(&outcome.records.records()[0], "Source_Database"),
///     Some(&FieldValue::from("ScienceDirect, Scopus"))
/// );
/// # Ok::<(), refmerge_core::dedup::DedupError>(())
/// ```
#[instrument(skip(input, options), fields(records = input.len(), identifier = %options.identifier_field))]
pub fn deduplicate(input: &RecordSet, options: &DedupOptions) -> Result<DedupOutcome, DedupError> {
    let schema = input.schema();
    let identifier = schema
        .index_of(&options.identifier_field)
        .ok_or_else(|| DedupError::missing_identifier(&options.identifier_field, schema.fields()))?;

    let provenance = options
        .provenance_field
        .as_deref()
        .and_then(|field| {
            let index = schema.index_of(field);
            if index.is_none() {
                debug!(field, "Provenance column absent, merging disabled");
            }
            index
        });
    let columns = KeyColumns {
        identifier,
        provenance,
    };
    let strategy = options.strategy.strategy;
    if let Some(fallback) = &options.strategy.fallback {
        warn!(
            requested = %fallback.requested,
            applied = %fallback.applied,
            "Applying fallback keep strategy"
        );
    }

    let records = input.records();
    let (unkeyed, keyed): (Vec<&Record>, Vec<&Record>) =
        records.iter().partition(|record| record.get(identifier).is_none());
    if !unkeyed.is_empty() {
        warn!(
            count = unkeyed.len(),
            "Records have no identifier and cannot be checked for duplicates"
        );
    }

    let keyed: Vec<Record> = keyed.into_iter().cloned().collect();
    let groups = group_by_identifier(&keyed, identifier);
    let duplicate_groups: Vec<_> = groups.iter().filter(|group| group.is_duplicate()).collect();

    let mut stats = DedupStats {
        input_count: records.len(),
        unkeyed_count: unkeyed.len(),
        duplicate_record_count: duplicate_groups.iter().map(|group| group.members.len()).sum(),
        unique_duplicate_identifier_count: duplicate_groups.len(),
        ..DedupStats::default()
    };
    info!(
        duplicate_records = stats.duplicate_record_count,
        duplicate_identifiers = stats.unique_duplicate_identifier_count,
        "Duplicate analysis complete"
    );

    let provenance_merged = options.merge_provenance && provenance.is_some();
    let mut report = DedupReport {
        stats,
        strategy,
        strategy_fallback: options.strategy.fallback.clone(),
        provenance_merged,
        samples: Vec::new(),
    };

    if duplicate_groups.is_empty() {
        debug!("No duplicates found, returning input unchanged");
        stats.final_count = input.len();
        report.stats = stats;
        return Ok(DedupOutcome {
            records: input.clone(),
            report,
        });
    }

    report.samples = duplicate_groups
        .iter()
        .take(DUPLICATE_SAMPLE_LIMIT)
        .map(|group| {
            let members: Vec<&Record> = group.members.iter().map(|&index| &keyed[index]).collect();
            describe_group(input, &group.identifier, &members, provenance)
        })
        .collect();

    let survivors = deduplicate_groups(&keyed, &groups, columns, strategy, options.merge_provenance);

    let mut output = RecordSet::new(schema.clone());
    for record in unkeyed {
        output.push(record.clone());
    }
    for record in survivors {
        output.push(record);
    }

    stats.final_count = output.len();
    stats.removed_count = stats.input_count - stats.final_count;
    report.stats = stats;
    info!(
        removed = stats.removed_count,
        final_count = stats.final_count,
        strategy = %strategy,
        "Deduplication complete"
    );

    Ok(DedupOutcome {
        records: output,
        report,
    })
}

fn describe_group(
    input: &RecordSet,
    identifier: &str,
    members: &[&Record],
    provenance: Option<usize>,
) -> DuplicateSample {
    let sources = members
        .iter()
        .map(|record| {
            provenance
                .and_then(|column| record.get(column))
                .map(ToString::to_string)
        })
        .collect();
    let title = members
        .first()
        .and_then(|record| input.value(record, TITLE_FIELD))
        .map(|value| truncate_title(&value.to_string()));

    DuplicateSample {
        identifier: identifier.to_string(),
        sources,
        title,
    }
}

fn truncate_title(title: &str) -> String {
    if title.chars().count() <= SAMPLE_TITLE_CHARS {
        return title.to_string();
    }
    let mut short: String = title.chars().take(SAMPLE_TITLE_CHARS).collect();
    short.push_str("...");
    short
}
