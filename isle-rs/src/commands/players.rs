//! Player roster command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;
use std::path::{Path, PathBuf};

use isle_save::PlayerRoster;

use crate::utils::{read_file, write_file};

#[derive(Subcommand)]
pub enum PlayersCommands {
    /// List player names
    List {
        /// Path to Players.gsi
        file: PathBuf,
    },

    /// Rename one player
    Rename {
        /// Path to Players.gsi
        file: PathBuf,

        /// Zero-based roster index
        index: usize,

        /// New name, up to seven letters
        name: String,

        /// Write here instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn execute(command: PlayersCommands) -> Result<()> {
    match command {
        PlayersCommands::List { file } => execute_list(&file),
        PlayersCommands::Rename {
            file,
            index,
            name,
            output,
        } => execute_rename(&file, index, &name, output),
    }
}

fn load(path: &Path) -> Result<PlayerRoster> {
    let data = read_file(path)?;
    PlayerRoster::parse(&data)
        .with_context(|| format!("Failed to parse player roster: {}", path.display()))
}

fn execute_list(path: &Path) -> Result<()> {
    let roster = load(path)?;
    if roster.is_empty() {
        println!("No players");
    }
    for (index, player) in roster.players.iter().enumerate() {
        println!("{index}: {}", style(&player.name).green());
    }
    Ok(())
}

fn execute_rename(path: &Path, index: usize, name: &str, output: Option<PathBuf>) -> Result<()> {
    let mut roster = load(path)?;
    if name.chars().count() > isle_save::players::NAME_LETTERS {
        log::warn!("Name '{}' truncated to seven letters", name);
    }
    roster.rename(index, name)?;

    let target = output.unwrap_or_else(|| path.to_path_buf());
    write_file(&target, &roster.to_bytes()?)?;
    println!(
        "✓ Renamed player {} to {}",
        index,
        style(&roster.players[index].name).green()
    );
    Ok(())
}
