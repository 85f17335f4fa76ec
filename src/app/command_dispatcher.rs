//! CLI command routing: runs the subcommand selected on the command line.

use anyhow::Result;

use crate::app::{config_runtime, terminal};
use crate::app_config::{LoadedConfig, load_default_file_config};
use crate::cli::{Cli, Command, ConfigCommand};
use crate::commands;

/// Loads config, installs tracing and runs the selected command.
pub(crate) fn dispatch(cli: &Cli) -> Result<()> {
    let loaded_config = load_default_file_config()?;
    let file_config = loaded_config.config.as_ref();

    let verbosity = config_runtime::resolve_verbosity(cli.verbose, cli.quiet, file_config);
    terminal::init_tracing(
        config_runtime::resolve_default_log_level(verbosity),
        config_runtime::should_force_cli_log_level(cli.verbose, cli.quiet),
    );
    log_loaded_config(&loaded_config);

    let quiet = cli.quiet;
    match &cli.command {
        Command::Dedupe(args) => commands::run_dedupe_command(args, file_config, quiet),
        Command::Consolidate(args) => commands::run_consolidate_command(args, quiet),
        Command::RisToCsv(args) => commands::run_ris_to_csv_command(args, quiet),
        Command::Config { command } => match command {
            ConfigCommand::Show => {
                commands::run_config_show_command(&loaded_config, verbosity.as_str())
            }
        },
    }
}

fn log_loaded_config(loaded_config: &LoadedConfig) {
    if let Some(path) = loaded_config.path.as_ref()
        && loaded_config.loaded_from_file
    {
        tracing::debug!(path = %path.display(), "Loaded config file");
    }
}
