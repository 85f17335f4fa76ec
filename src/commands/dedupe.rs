//! `dedupe` command: remove records sharing a DOI from a CSV file.

use anyhow::{Context, Result};
use refmerge_core::{deduplicate, read_csv, write_csv};
use tracing::{debug, info};

use crate::app::config_runtime;
use crate::app_config::FileConfig;
use crate::cli::DedupeArgs;
use crate::output;

pub fn run_dedupe_command(
    args: &DedupeArgs,
    file_config: Option<&FileConfig>,
    quiet: bool,
) -> Result<()> {
    let options = config_runtime::resolve_dedup_options(args, file_config)?;
    debug!(?options, "Resolved dedupe options");

    if !quiet && !args.json {
        println!("Loading {}...", args.input.display());
    }
    let input = read_csv(&args.input)
        .with_context(|| format!("Failed to load input table '{}'", args.input.display()))?;

    let outcome = deduplicate(&input, &options)?;

    write_csv(&args.output, &outcome.records)
        .with_context(|| format!("Failed to save output table '{}'", args.output.display()))?;
    info!(path = %args.output.display(), records = outcome.records.len(), "Output saved");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    } else if !quiet {
        output::print_lines(&output::duplicate_analysis_lines(
            &outcome.report,
            &options.identifier_field,
        ));
        output::print_lines(&output::dedup_result_lines(&outcome.report, &args.output));
    }

    Ok(())
}
