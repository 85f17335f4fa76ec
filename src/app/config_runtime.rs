//! Layering of CLI flags over file config into effective run settings.

use anyhow::Result;
use refmerge_core::dedup::{
    DEFAULT_IDENTIFIER_FIELD, DEFAULT_PROVENANCE_FIELD, DedupOptions, KeepStrategy,
    ResolvedStrategy, UnknownStrategyPolicy,
};

use crate::app_config::{FileConfig, UnknownStrategySetting, VerbositySetting};
use crate::cli::DedupeArgs;

/// Builds dedup options: explicit CLI values win, then file config, then defaults.
///
/// A strategy typed on the command line is always valid (clap rejects
/// anything else). A strategy from the config file goes through
/// [`KeepStrategy::resolve`] so an `unknown_strategy = "fallback"` setting is
/// honored and reported.
pub(crate) fn resolve_dedup_options(
    args: &DedupeArgs,
    file_config: Option<&FileConfig>,
) -> Result<DedupOptions> {
    let identifier_field = args
        .doi_column
        .clone()
        .or_else(|| file_config.and_then(|c| c.identifier_field.clone()))
        .unwrap_or_else(|| DEFAULT_IDENTIFIER_FIELD.to_string());

    let provenance_field = args
        .provenance_column
        .clone()
        .or_else(|| file_config.and_then(|c| c.provenance_field.clone()))
        .unwrap_or_else(|| DEFAULT_PROVENANCE_FIELD.to_string());
    let provenance_field = (!provenance_field.is_empty()).then_some(provenance_field);

    let strategy = match (args.strategy, file_config.and_then(|c| c.strategy.as_deref())) {
        (Some(cli), _) => ResolvedStrategy::from(KeepStrategy::from(cli)),
        (None, Some(name)) => KeepStrategy::resolve(name, unknown_strategy_policy(file_config))?,
        (None, None) => ResolvedStrategy::default(),
    };

    let merge_provenance = if args.no_merge_sources {
        false
    } else {
        file_config
            .and_then(|c| c.merge_provenance)
            .unwrap_or(true)
    };

    Ok(DedupOptions {
        identifier_field,
        provenance_field,
        strategy,
        merge_provenance,
    })
}

fn unknown_strategy_policy(file_config: Option<&FileConfig>) -> UnknownStrategyPolicy {
    match file_config.and_then(|c| c.unknown_strategy) {
        Some(UnknownStrategySetting::Fallback) => UnknownStrategyPolicy::FallbackToFirst,
        Some(UnknownStrategySetting::Error) | None => UnknownStrategyPolicy::Reject,
    }
}

/// Effective verbosity: command-line flags beat the config file.
pub(crate) fn resolve_verbosity(
    verbose: u8,
    quiet: bool,
    file_config: Option<&FileConfig>,
) -> VerbositySetting {
    if quiet {
        return VerbositySetting::Quiet;
    }
    match verbose {
        0 => file_config
            .and_then(|c| c.verbosity)
            .unwrap_or(VerbositySetting::Default),
        1 => VerbositySetting::Verbose,
        _ => VerbositySetting::Debug,
    }
}

pub(crate) fn resolve_default_log_level(verbosity: VerbositySetting) -> &'static str {
    match verbosity {
        VerbositySetting::Quiet => "error",
        VerbositySetting::Default => "info",
        VerbositySetting::Verbose => "debug",
        VerbositySetting::Debug => "trace",
    }
}

/// `RUST_LOG` is ignored when the user typed -v or -q.
pub(crate) fn should_force_cli_log_level(verbose: u8, quiet: bool) -> bool {
    verbose > 0 || quiet
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::cli::StrategyArg;

    fn args() -> DedupeArgs {
        DedupeArgs {
            input: PathBuf::from("in.csv"),
            ..DedupeArgs::default()
        }
    }

    #[test]
    fn test_defaults_without_config() {
        let options = resolve_dedup_options(&args(), None).unwrap();
        assert_eq!(options, DedupOptions::default());
    }

    #[test]
    fn test_file_config_fills_unset_values() {
        let file = FileConfig {
            identifier_field: Some("doi".to_string()),
            strategy: Some("last".to_string()),
            merge_provenance: Some(false),
            ..FileConfig::default()
        };
        let options = resolve_dedup_options(&args(), Some(&file)).unwrap();
        assert_eq!(options.identifier_field, "doi");
        assert_eq!(options.strategy.strategy, KeepStrategy::Last);
        assert!(!options.merge_provenance);
    }

    #[test]
    fn test_cli_values_beat_file_config() {
        let file = FileConfig {
            identifier_field: Some("doi".to_string()),
            strategy: Some("last".to_string()),
            ..FileConfig::default()
        };
        let cli = DedupeArgs {
            doi_column: Some("DOI".to_string()),
            strategy: Some(StrategyArg::First),
            no_merge_sources: true,
            ..args()
        };
        let options = resolve_dedup_options(&cli, Some(&file)).unwrap();
        assert_eq!(options.identifier_field, "DOI");
        assert_eq!(options.strategy.strategy, KeepStrategy::First);
        assert!(!options.merge_provenance);
    }

    #[test]
    fn test_empty_provenance_field_disables_merging_column() {
        let file = FileConfig {
            provenance_field: Some(String::new()),
            ..FileConfig::default()
        };
        let options = resolve_dedup_options(&args(), Some(&file)).unwrap();
        assert_eq!(options.provenance_field, None);
    }

    #[test]
    fn test_config_strategy_fallback_is_carried() {
        let file = FileConfig {
            strategy: Some("newest".to_string()),
            unknown_strategy: Some(UnknownStrategySetting::Fallback),
            ..FileConfig::default()
        };
        let options = resolve_dedup_options(&args(), Some(&file)).unwrap();
        assert_eq!(options.strategy.strategy, KeepStrategy::First);
        assert!(options.strategy.fallback.is_some());
    }

    #[test]
    fn test_config_strategy_unknown_rejected_by_default() {
        let file = FileConfig {
            strategy: Some("newest".to_string()),
            ..FileConfig::default()
        };
        assert!(resolve_dedup_options(&args(), Some(&file)).is_err());
    }

    #[test]
    fn test_verbosity_priority() {
        let file = FileConfig {
            verbosity: Some(VerbositySetting::Debug),
            ..FileConfig::default()
        };
        assert_eq!(resolve_verbosity(0, false, Some(&file)), VerbositySetting::Debug);
        assert_eq!(resolve_verbosity(1, false, Some(&file)), VerbositySetting::Verbose);
        assert_eq!(resolve_verbosity(0, true, Some(&file)), VerbositySetting::Quiet);
        assert_eq!(resolve_verbosity(0, false, None), VerbositySetting::Default);
        assert_eq!(resolve_default_log_level(VerbositySetting::Quiet), "error");
        assert_eq!(resolve_default_log_level(VerbositySetting::Debug), "trace");
    }

    #[test]
    fn test_force_cli_log_level() {
        assert!(!should_force_cli_log_level(0, false));
        assert!(should_force_cli_log_level(2, false));
        assert!(should_force_cli_log_level(0, true));
    }
}
