//! Identifier-based deduplication and record merging.
//!
//! Records sharing an identifier (normally a DOI) are collapsed to a single
//! survivor chosen by a [`KeepStrategy`]. The provenance labels of every
//! duplicate are merged into the survivor, so the output still says which
//! databases a work was found in.
//!
//! # Components
//!
//! - [`completeness_score`] - non-null field count, used to rank duplicates
//! - [`merge_provenance`] - sorted, de-duplicated union of source labels
//! - [`deduplicate_keyed`] - grouping and per-group selection
//! - [`deduplicate`] - validation, unkeyed passthrough, statistics
//!
//! Everything here is a pure function of its inputs: no I/O, no global state.

mod engine;
mod error;
mod provenance;
mod score;
mod select;
mod strategy;

pub use engine::{
    DEFAULT_IDENTIFIER_FIELD, DEFAULT_PROVENANCE_FIELD, DUPLICATE_SAMPLE_LIMIT, DedupOptions,
    DedupOutcome, DedupReport, DedupStats, DuplicateSample, SAMPLE_TITLE_CHARS, TITLE_FIELD,
    deduplicate,
};
pub use error::DedupError;
pub use provenance::{PROVENANCE_SEPARATOR, merge_provenance};
pub use score::completeness_score;
pub use select::{
    IdentifierGroup, KeyColumns, deduplicate_groups, deduplicate_keyed, group_by_identifier,
    select_representative,
};
pub use strategy::{KeepStrategy, ResolvedStrategy, StrategyFallback, UnknownStrategyPolicy};
