//! `ris-to-csv` command: flatten a folder of RIS files into CSV and/or XLSX.

use anyhow::{Context, Result};
use refmerge_core::table::write_xlsx;
use refmerge_core::{load_ris_dir, write_csv};

use crate::cli::RisToCsvArgs;
use crate::output;

pub fn run_ris_to_csv_command(args: &RisToCsvArgs, quiet: bool) -> Result<()> {
    let records = load_ris_dir(&args.input)?;
    let mut written = Vec::new();

    if args.format.writes_csv() {
        let path = args.output.join(format!("{}.csv", args.filename));
        write_csv(&path, &records)
            .with_context(|| format!("Failed to export RIS entries to '{}'", path.display()))?;
        written.push(path);
    }
    if args.format.writes_xlsx() {
        let path = args.output.join(format!("{}.xlsx", args.filename));
        write_xlsx(&path, &records)
            .with_context(|| format!("Failed to export RIS entries to '{}'", path.display()))?;
        written.push(path);
    }

    if !quiet {
        output::print_lines(&output::ris_export_lines(records.len(), &written));
    }
    Ok(())
}
