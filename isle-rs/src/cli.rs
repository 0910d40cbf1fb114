//! Root CLI structure for isle-rs

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "isle-rs")]
#[command(about = "Command-line tools for LEGO Island data files", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// World database (WORLD.WDB) operations
    Wdb {
        #[command(subcommand)]
        command: crate::commands::wdb::WdbCommands,
    },

    /// Standalone animation (.ani) operations
    Ani {
        #[command(subcommand)]
        command: crate::commands::ani::AniCommands,
    },

    /// Save slot (G#.GS) inspection and patching
    Save {
        #[command(subcommand)]
        command: crate::commands::save::SaveCommands,
    },

    /// Player roster (Players.gsi) operations
    Players {
        #[command(subcommand)]
        command: crate::commands::players::PlayersCommands,
    },
}
