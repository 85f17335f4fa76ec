//! CLI entry point for the refmerge tool.

use anyhow::Result;
use clap::Parser;

mod app;
mod app_config;
mod cli;
mod commands;
mod output;

use cli::Cli;

fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();
    app::command_dispatcher::dispatch(&cli)
}
