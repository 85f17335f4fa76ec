//! Refmerge Core Library
//!
//! This library reconciles bibliographic records exported from several
//! literature databases into one table and removes records that describe
//! the same work, keyed by DOI.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`record`] - Tabular record model (schema, records, values)
//! - [`dedup`] - Identifier-based deduplication and provenance merging
//! - [`table`] - CSV loading and saving
//! - [`consolidate`] - Column mapping of database exports into a unified schema
//! - [`ris`] - RIS citation-file import
//!
//! The [`dedup`] engine is pure: it never touches the filesystem or the
//! console. Loading, saving and reporting are done by the other modules and
//! the `refmerge` binary.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod consolidate;
pub mod dedup;
pub mod record;
pub mod ris;
pub mod table;

// Re-export commonly used types
pub use consolidate::{ColumnMapping, Consolidated, MappingError, SourceDatabase, SourceTable};
pub use dedup::{
    DedupError, DedupOptions, DedupOutcome, DedupReport, DedupStats, KeepStrategy,
    UnknownStrategyPolicy, deduplicate,
};
pub use record::{FieldValue, Record, RecordSet, Schema};
pub use ris::{RisError, load_ris_dir, parse_ris};
pub use table::{TableError, read_csv, write_csv};
