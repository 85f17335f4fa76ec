//! RIS citation-file import.
//!
//! Reads tagged RIS records (`TY  - JOUR` ... `ER  -`) and flattens them into
//! a [`RecordSet`] whose columns are the readable names of the tags seen.
//!
//! # Example
//!
//! ```
//! use refmerge_core::ris::{entries_to_record_set, parse_ris};
//!
//! let result = parse_ris("TY  - JOUR\nTI  - A paper\nDO  - 10.1/a\nER  - \n");
//! let set = entries_to_record_set(&result.entries);
//! assert_eq!(set.schema().fields(), &["type_of_reference", "title", "doi"]);
//! ```

mod tags;

pub use tags::{LIST_SEPARATOR, column_for_tag, is_multi_valued};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::record::{FieldValue, RecordSet, Schema};

#[allow(clippy::expect_used)]
static TAG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z][A-Z0-9])  -(?: (.*))?$").expect("RIS tag line regex is valid")
});

const START_TAG: &str = "TY";
const END_TAG: &str = "ER";

/// Errors that can occur while loading RIS files from disk.
#[derive(Debug, Error)]
pub enum RisError {
    /// A file or directory could not be read
    #[error("IO error reading {path}: {source}")]
    Io {
        /// Path involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Directory holds no `.ris` files
    #[error("no .ris files found in {dir}\n  Suggestion: Point --input at the folder holding the exports")]
    NoFiles {
        /// Directory searched
        dir: PathBuf,
    },
}

/// One RIS record: column names with their values, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RisEntry {
    fields: Vec<(String, Vec<String>)>,
}

impl RisEntry {
    /// Values recorded for `column`.
    #[must_use]
    pub fn values(&self, column: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, values)| values.as_slice())
    }

    /// Column names in first-seen order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Flattened cell value for `column`: multi-valued fields joined by
    /// [`LIST_SEPARATOR`].
    #[must_use]
    pub fn cell(&self, column: &str) -> Option<String> {
        self.values(column)
            .filter(|values| !values.is_empty())
            .map(|values| values.join(LIST_SEPARATOR))
    }

    fn add(&mut self, tag: &str, value: String) {
        let column = column_for_tag(tag);
        match self.fields.iter_mut().find(|(name, _)| name == column) {
            Some((_, values)) if is_multi_valued(tag) => values.push(value),
            Some((_, values)) => {
                // Repeated single-valued tag: the later value wins.
                values.clear();
                values.push(value);
            }
            None => self.fields.push((column.to_string(), vec![value])),
        }
    }

    fn continue_last(&mut self, text: &str) {
        if let Some(last) = self.fields.last_mut().and_then(|(_, values)| values.last_mut()) {
            if !last.is_empty() {
                last.push(' ');
            }
            last.push_str(text);
        }
    }
}

/// Parsed entries plus messages about input that was dropped or repaired.
#[derive(Debug, Clone, Default)]
pub struct RisParseResult {
    /// Entries in input order
    pub entries: Vec<RisEntry>,
    /// Human-readable notes about skipped or unterminated content
    pub skipped: Vec<String>,
}

/// Parses RIS text.
///
/// Lines outside a `TY` … `ER` block are ignored. An entry still open at end
/// of input is kept and noted in `skipped`.
#[instrument(skip(input), fields(input_len = input.len()))]
#[must_use]
pub fn parse_ris(input: &str) -> RisParseResult {
    let mut result = RisParseResult::default();
    let mut current: Option<RisEntry> = None;

    for (line_index, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim_start_matches('\u{feff}').trim_end();
        if line.is_empty() {
            continue;
        }

        let Some(captures) = TAG_LINE.captures(line) else {
            match current.as_mut() {
                Some(entry) => entry.continue_last(line.trim()),
                None => debug!(line = line_index + 1, "Ignoring text outside RIS entry"),
            }
            continue;
        };
        let tag = &captures[1];
        let value = captures.get(2).map_or("", |m| m.as_str()).trim().to_string();

        if tag == START_TAG {
            if let Some(open) = current.take() {
                result.skipped.push(format!(
                    "line {}: new TY before ER, previous entry closed",
                    line_index + 1
                ));
                result.entries.push(open);
            }
            let mut entry = RisEntry::default();
            entry.add(tag, value);
            current = Some(entry);
            continue;
        }

        if tag == END_TAG && current.is_some() {
            result.entries.extend(current.take());
            continue;
        }

        match current.as_mut() {
            Some(entry) => entry.add(tag, value),
            None => {
                result
                    .skipped
                    .push(format!("line {}: tag {tag} outside of an entry", line_index + 1));
            }
        }
    }

    if let Some(entry) = current {
        result
            .skipped
            .push("unterminated entry at end of input (missing ER)".to_string());
        result.entries.push(entry);
    }

    debug!(
        entries = result.entries.len(),
        skipped = result.skipped.len(),
        "RIS parsing complete"
    );
    result
}

/// Flattens entries into a table; columns in first-seen order across entries.
#[must_use]
pub fn entries_to_record_set(entries: &[RisEntry]) -> RecordSet {
    let mut schema = Schema::default();
    for entry in entries {
        for column in entry.columns() {
            schema.push(column);
        }
    }

    let mut set = RecordSet::new(schema);
    for entry in entries {
        set.push_fields(
            entry
                .columns()
                .map(|column| (column, entry.cell(column).map(FieldValue::from))),
        );
    }
    set
}

/// Loads every `*.ris` file in `dir` (sorted by name) into one table.
///
/// # Errors
///
/// Returns [`RisError::Io`] if the directory or a file cannot be read, and
/// [`RisError::NoFiles`] if the directory holds no `.ris` files.
#[instrument(fields(dir = %dir.display()))]
pub fn load_ris_dir(dir: &Path) -> Result<RecordSet, RisError> {
    let listing = fs::read_dir(dir).map_err(|source| RisError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in listing {
        let entry = entry.map_err(|source| RisError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("ris"))
        {
            files.push(path);
        }
    }
    if files.is_empty() {
        return Err(RisError::NoFiles {
            dir: dir.to_path_buf(),
        });
    }
    files.sort();
    info!(files = files.len(), "Found RIS files");

    let mut entries = Vec::new();
    for path in &files {
        let raw = fs::read_to_string(path).map_err(|source| RisError::Io {
            path: path.clone(),
            source,
        })?;
        let parsed = parse_ris(&raw);
        for note in &parsed.skipped {
            warn!(file = %path.display(), note = %note, "RIS input repaired or skipped");
        }
        debug!(file = %path.display(), entries = parsed.entries.len(), "Processed RIS file");
        entries.extend(parsed.entries);
    }

    info!(entries = entries.len(), "Loaded RIS entries");
    Ok(entries_to_record_set(&entries))
}
