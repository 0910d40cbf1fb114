//! Main entry point for the isle-rs CLI

mod cli;
mod commands;
mod utils;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.verbose > 0 {
        log::set_max_level(match cli.verbose {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    } else if cli.quiet {
        log::set_max_level(log::LevelFilter::Error);
    }

    match cli.command {
        Commands::Wdb { command } => commands::wdb::execute(command),
        Commands::Ani { command } => commands::ani::execute(command),
        Commands::Save { command } => commands::save::execute(command),
        Commands::Players { command } => commands::players::execute(command),
    }
}
