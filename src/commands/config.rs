//! Config command handlers: show effective configuration.

use anyhow::Result;

use crate::app::config_runtime;
use crate::app_config::{LoadedConfig, UnknownStrategySetting};
use crate::cli::DedupeArgs;

pub fn run_config_show_command(loaded_config: &LoadedConfig, verbosity: &str) -> Result<()> {
    let file_config = loaded_config.config.as_ref();
    let effective = config_runtime::resolve_dedup_options(&DedupeArgs::default(), file_config)?;

    let resolved_path = loaded_config.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    println!("config_path = {resolved_path}");
    println!(
        "config_file = {}",
        if loaded_config.loaded_from_file {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    );
    println!("identifier_field = {}", effective.identifier_field);
    println!(
        "provenance_field = {}",
        effective.provenance_field.as_deref().unwrap_or("<disabled>")
    );
    println!("strategy = {}", effective.strategy.strategy);
    println!("merge_provenance = {}", effective.merge_provenance);
    println!(
        "unknown_strategy = {}",
        file_config
            .and_then(|c| c.unknown_strategy)
            .unwrap_or(UnknownStrategySetting::Error)
            .as_str()
    );
    println!("verbosity = {verbosity}");

    Ok(())
}
