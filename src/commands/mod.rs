//! CLI command handlers.

mod config;
mod consolidate;
mod dedupe;
mod ris;

pub use config::run_config_show_command;
pub use consolidate::run_consolidate_command;
pub use dedupe::run_dedupe_command;
pub use ris::run_ris_to_csv_command;
