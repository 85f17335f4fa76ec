//! `consolidate` command: map three database exports onto one schema.

use std::path::Path;

use anyhow::{Context, Result};
use refmerge_core::consolidate::consolidate;
use refmerge_core::{ColumnMapping, SourceDatabase, SourceTable, write_csv};
use tracing::info;

use crate::cli::ConsolidateArgs;
use crate::output;

pub fn run_consolidate_command(args: &ConsolidateArgs, quiet: bool) -> Result<()> {
    let mapping = ColumnMapping::load(&args.config)?;
    info!(
        fields = mapping.unified_schema.len(),
        path = %args.config.display(),
        "Loaded column mapping"
    );

    let inputs = [
        (SourceDatabase::ScienceDirect, args.sciencedirect.as_path()),
        (SourceDatabase::Scopus, args.scopus.as_path()),
        (SourceDatabase::WebOfScience, args.webofscience.as_path()),
    ];
    let sources = inputs
        .into_iter()
        .map(|(database, path)| load_source(database, path))
        .collect::<Result<Vec<_>>>()?;

    let consolidated = consolidate(&sources, &mapping, !args.no_source_column)?;

    write_csv(&args.output, &consolidated.records)
        .with_context(|| format!("Failed to save output table '{}'", args.output.display()))?;

    if !quiet {
        output::print_lines(&output::consolidation_summary_lines(
            &consolidated.summary,
            &args.output,
        ));
    }
    Ok(())
}

fn load_source(database: SourceDatabase, path: &Path) -> Result<SourceTable> {
    SourceTable::load(database, path)
        .with_context(|| format!("Failed to load {database} export '{}'", path.display()))
}
