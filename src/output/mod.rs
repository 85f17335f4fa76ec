//! CLI output formatting and display helpers.
//!
//! Builders return lines instead of printing so the wording can be tested.

use std::path::{Path, PathBuf};

use refmerge_core::consolidate::{ConsolidationSummary, MAX_PRIORITY, MIN_PRIORITY};
use refmerge_core::dedup::{DedupReport, DuplicateSample};

/// Lines describing the duplicate analysis, printed before deduplication.
#[must_use]
pub fn duplicate_analysis_lines(report: &DedupReport, identifier_field: &str) -> Vec<String> {
    let stats = &report.stats;
    let mut lines = vec![format!("Initial record count: {}", stats.input_count)];
    if stats.unkeyed_count > 0 {
        lines.push(format!(
            "Warning: {} records have no {identifier_field} and cannot be checked for duplicates.",
            stats.unkeyed_count
        ));
    }
    lines.push(String::new());
    lines.push("Duplicate analysis:".to_string());
    lines.push(format!(
        "  Records with duplicates: {}",
        stats.duplicate_record_count
    ));
    lines.push(format!(
        "  Unique {identifier_field}s with duplicates: {}",
        stats.unique_duplicate_identifier_count
    ));

    if !report.samples.is_empty() {
        lines.push(String::new());
        lines.push("Example duplicates found:".to_string());
        for sample in &report.samples {
            lines.extend(sample_lines(sample, identifier_field));
        }
    }
    lines
}

fn sample_lines(sample: &DuplicateSample, identifier_field: &str) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!("  {identifier_field}: {}", sample.identifier),
    ];
    let sources: Vec<&str> = sample.sources.iter().flatten().map(String::as_str).collect();
    if !sources.is_empty() {
        lines.push(format!("    Found in: {}", sources.join(", ")));
    }
    if let Some(title) = &sample.title {
        lines.push(format!("    Title: {title}"));
    }
    lines
}

/// Lines describing the outcome of a dedupe run, ending with the output path.
#[must_use]
pub fn dedup_result_lines(report: &DedupReport, output: &Path) -> Vec<String> {
    let mut lines = vec![String::new()];
    if let Some(fallback) = &report.strategy_fallback {
        lines.push(format!(
            "Warning: Unknown strategy '{}', defaulting to '{}'",
            fallback.requested, fallback.applied
        ));
    }
    if report.is_duplicate_free() {
        lines.push("No duplicates found. Saving original file...".to_string());
        lines.push(format!("Output saved to: {}", output.display()));
        return lines;
    }

    lines.push(format!(
        "Applying deduplication strategy: {}",
        report.strategy
    ));
    if report.provenance_merged {
        lines.push("Merging source information from duplicates...".to_string());
    }
    lines.push(String::new());
    lines.push("Deduplication complete:".to_string());
    lines.push(format!("  Records removed: {}", report.stats.removed_count));
    lines.push(format!("  Final record count: {}", report.stats.final_count));
    lines.push(String::new());
    lines.push(format!("Output saved to: {}", output.display()));
    lines
}

/// Lines summarizing a consolidation run.
#[must_use]
pub fn consolidation_summary_lines(summary: &ConsolidationSummary, output: &Path) -> Vec<String> {
    let mut lines = vec!["Loaded database files:".to_string()];
    for (label, count) in &summary.records_per_source {
        lines.push(format!("  {label}: {count} records"));
    }
    lines.push(String::new());
    lines.push(format!("Consolidated {} records", summary.total_records));
    lines.push(format!("Output file: {}", output.display()));
    lines.push(format!("Total columns: {}", summary.total_columns));
    lines.push(String::new());
    lines.push("Column priority summary:".to_string());
    for priority in MIN_PRIORITY..=MAX_PRIORITY {
        let count = summary.priority_counts.get(&priority).copied().unwrap_or(0);
        lines.push(format!(
            "  Priority {priority} ({}): {count} columns",
            priority_description(priority)
        ));
    }
    lines
}

fn priority_description(priority: u8) -> &'static str {
    match priority {
        1 => "in all 3 sources",
        2 => "in 2 sources",
        _ => "in 1 source",
    }
}

/// Lines summarizing a RIS export, one `Exported to` line per file written.
#[must_use]
pub fn ris_export_lines(entries: usize, outputs: &[PathBuf]) -> Vec<String> {
    let mut lines = vec![format!("Total entries: {entries}")];
    lines.extend(
        outputs
            .iter()
            .map(|path| format!("Exported to {}", path.display())),
    );
    lines
}

/// Prints lines to stdout.
pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
