//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use refmerge_core::KeepStrategy;

/// File-backed defaults for `refmerge dedupe`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Default identifier (DOI) column.
    pub identifier_field: Option<String>,
    /// Default provenance column; an empty string disables provenance merging.
    pub provenance_field: Option<String>,
    /// Default keep-strategy name.
    pub strategy: Option<String>,
    /// Merge provenance labels of duplicates.
    pub merge_provenance: Option<bool>,
    /// How an unrecognized `strategy` name is handled.
    pub unknown_strategy: Option<UnknownStrategySetting>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(field) = &self.identifier_field
            && field.trim().is_empty()
        {
            bail!("Invalid config value for `identifier_field`: must not be empty");
        }

        let fallback_allowed = self.unknown_strategy == Some(UnknownStrategySetting::Fallback);
        if let Some(strategy) = &self.strategy
            && !fallback_allowed
            && strategy.parse::<KeepStrategy>().is_err()
        {
            bail!(
                "Invalid config value for `strategy`: '{strategy}'. Expected one of: most_complete, first, last\n  \
                 Set unknown_strategy = \"fallback\" to apply `first` instead"
            );
        }

        Ok(())
    }
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }
}

/// Supported `unknown_strategy` labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownStrategySetting {
    /// Reject unknown names
    Error,
    /// Apply `first` and report it
    Fallback,
}

impl UnknownStrategySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Fallback => "fallback",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
    /// Indicates whether configuration was loaded from disk.
    pub loaded_from_file: bool,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/refmerge/config.toml`
/// 2. `$HOME/.config/refmerge/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("refmerge")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("refmerge")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    };

    if !path_ref.exists() {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    }

    let config = load_file_config(path_ref)?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
        loaded_from_file: true,
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!(
                "Invalid config syntax on line {}: expected key = value",
                line_index + 1
            );
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let line_no = line_index + 1;

        match key {
            "identifier_field" => {
                let parsed = parse_string_literal(value).with_context(|| {
                    format!("Invalid `identifier_field` value on line {line_no}")
                })?;
                cfg.identifier_field = Some(parsed);
            }
            "provenance_field" => {
                let parsed = parse_string_literal(value).with_context(|| {
                    format!("Invalid `provenance_field` value on line {line_no}")
                })?;
                cfg.provenance_field = Some(parsed);
            }
            "strategy" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `strategy` value on line {line_no}"))?;
                cfg.strategy = Some(parsed);
            }
            "merge_provenance" => {
                let parsed = parse_boolean(value).with_context(|| {
                    format!("Invalid `merge_provenance` value on line {line_no}")
                })?;
                cfg.merge_provenance = Some(parsed);
            }
            "unknown_strategy" => {
                let parsed = parse_string_literal(value).with_context(|| {
                    format!("Invalid `unknown_strategy` value on line {line_no}")
                })?;
                cfg.unknown_strategy =
                    Some(parse_unknown_strategy(&parsed).with_context(|| {
                        format!("Invalid `unknown_strategy` value '{parsed}' on line {line_no}")
                    })?);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `verbosity` value on line {line_no}"))?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_boolean(raw_value: &str) -> Result<bool> {
    match raw_value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!("Expected boolean true or false"),
    }
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

fn parse_unknown_strategy(value: &str) -> Result<UnknownStrategySetting> {
    match value {
        "error" => Ok(UnknownStrategySetting::Error),
        "fallback" => Ok(UnknownStrategySetting::Fallback),
        _ => bail!("Expected one of: error, fallback"),
    }
}
