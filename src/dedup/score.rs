//! Field completeness scoring.

use crate::record::Record;

/// Number of non-null fields in `record`.
///
/// Only meaningful for comparing records of the same schema, such as the
/// members of one duplicate group.
#[must_use]
pub fn completeness_score(record: &Record) -> usize {
    record.values().iter().filter(|value| value.is_some()).count()
}
