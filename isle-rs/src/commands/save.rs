//! Save slot command implementations

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use console::style;
use std::path::{Path, PathBuf};

use isle_save::{
    HeaderEdit, MissionType, SaveGameDocument, SaveGameEditor, ScoreField, StatePayload,
    actor_name,
};

use crate::utils::{read_file, write_file};

#[derive(Subcommand)]
pub enum SaveCommands {
    /// Display header, states and mission scores
    Info {
        /// Path to the save slot (G0.GS to G9.GS)
        file: PathBuf,

        /// Print the parsed document as JSON
        #[arg(long)]
        json: bool,
    },

    /// List scripting variables
    Vars {
        /// Path to the save slot
        file: PathBuf,
    },

    /// Overwrite header fields
    SetHeader {
        /// Path to the save slot
        file: PathBuf,

        /// Current act
        #[arg(long)]
        act: Option<u16>,

        /// Playable actor, 1-5 or a name such as "pepper"
        #[arg(long)]
        actor: Option<String>,

        /// Write here instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Set one mission score, adding the mission state when missing
    SetScore {
        /// Path to the save slot
        file: PathBuf,

        /// Mission: pizza, car-race, jetski-race, tow-track or ambulance
        mission: String,

        /// Actor, 1-5 or a name such as "nick"
        actor: String,

        /// Which score to set
        #[arg(value_enum)]
        field: ScoreArg,

        /// New value
        #[arg(allow_negative_numbers = true)]
        value: i16,

        /// Write here instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the value of an existing variable
    SetVar {
        /// Path to the save slot
        file: PathBuf,

        /// Variable name
        name: String,

        /// New value
        value: String,

        /// Write here instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ScoreArg {
    Score,
    HighScore,
}

impl From<ScoreArg> for ScoreField {
    fn from(arg: ScoreArg) -> Self {
        match arg {
            ScoreArg::Score => Self::Score,
            ScoreArg::HighScore => Self::HighScore,
        }
    }
}

pub fn execute(command: SaveCommands) -> Result<()> {
    match command {
        SaveCommands::Info { file, json } => execute_info(&file, json),
        SaveCommands::Vars { file } => execute_vars(&file),
        SaveCommands::SetHeader {
            file,
            act,
            actor,
            output,
        } => {
            let edit = HeaderEdit {
                current_act: act,
                actor_id: actor.as_deref().map(parse_actor).transpose()?,
            };
            edit_save(&file, output, |editor| {
                editor.update_header(edit)?;
                Ok(())
            })
        }
        SaveCommands::SetScore {
            file,
            mission,
            actor,
            field,
            value,
            output,
        } => {
            let mission: MissionType = mission.parse().map_err(anyhow::Error::msg)?;
            let actor_id = parse_actor(&actor)?;
            edit_save(&file, output, |editor| {
                editor.set_mission_score(mission, actor_id, field.into(), value)?;
                Ok(())
            })
        }
        SaveCommands::SetVar {
            file,
            name,
            value,
            output,
        } => edit_save(&file, output, |editor| {
            editor.set_variable(&name, &value)?;
            Ok(())
        }),
    }
}

/// Accept an actor id or one of the five playable actor names.
fn parse_actor(value: &str) -> Result<u8> {
    if let Ok(id) = value.parse::<u8>() {
        return Ok(id);
    }
    (1..=5)
        .find(|&id| actor_name(id).is_some_and(|name| name.eq_ignore_ascii_case(value)))
        .with_context(|| format!("Unknown actor '{value}'"))
}

fn load(path: &Path) -> Result<(Vec<u8>, SaveGameDocument)> {
    let data = read_file(path)?;
    let document = SaveGameDocument::parse(&data)
        .with_context(|| format!("Failed to parse save file: {}", path.display()))?;
    Ok((data, document))
}

fn edit_save(
    path: &Path,
    output: Option<PathBuf>,
    apply: impl FnOnce(&mut SaveGameEditor) -> Result<()>,
) -> Result<()> {
    let data = read_file(path)?;
    let original_len = data.len();
    let mut editor = SaveGameEditor::open(data)
        .with_context(|| format!("Failed to parse save file: {}", path.display()))?;
    apply(&mut editor)?;

    let target = output.unwrap_or_else(|| path.to_path_buf());
    let bytes = editor.into_bytes();
    write_file(&target, &bytes)?;
    log::info!(
        "Wrote {} ({} -> {} bytes)",
        target.display(),
        original_len,
        bytes.len()
    );
    println!("✓ Saved {}", style(target.display()).cyan());
    Ok(())
}

fn execute_info(path: &Path, json: bool) -> Result<()> {
    let (data, document) = load(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    let header = &document.header;
    println!("Save File Information");
    println!("=====================");
    println!("File: {}", style(path.display()).cyan());
    println!("Size: {} bytes", data.len());
    println!("Version: {:#x}", header.version);
    println!("Player: {}", header.player_id);
    println!("Act: {}", header.current_act);
    println!(
        "Actor: {} ({})",
        header.actor_id,
        actor_name(header.actor_id).unwrap_or("none")
    );
    println!("Variables: {}", document.variables.len());
    println!("Next plant variant: {}", document.next_variant);

    println!();
    println!("{}", style(format!("States ({})", document.states.len())).bold());
    for state in &document.states {
        println!(
            "  {:<24} {:<8} {:>5} bytes @ {:#x}",
            state.name,
            state.payload.kind_name(),
            state.data_size,
            state.data_offset
        );
    }

    let missions: Vec<_> = MissionType::ALL
        .iter()
        .filter_map(|&mission| document.mission(mission).map(|scores| (mission, scores)))
        .collect();
    if !missions.is_empty() {
        println!();
        println!("{}", style("Mission scores (score / high score)").bold());
        print!("  {:<24}", "");
        for id in 1..=5 {
            print!(" {:>11}", actor_name(id).unwrap_or("?"));
        }
        println!();
        for (mission, scores) in missions {
            print!("  {:<24}", mission.state_name());
            for pair in &scores.actors {
                print!(" {:>5} / {:<3}", pair.score, pair.high_score);
            }
            println!();
        }
    }

    if document
        .states
        .iter()
        .any(|state| matches!(state.payload, StatePayload::Unknown { .. }))
    {
        println!();
        println!(
            "{}",
            style("Unknown states were read as empty; later offsets may be wrong").yellow()
        );
    }
    Ok(())
}

fn execute_vars(path: &Path) -> Result<()> {
    let (_, document) = load(path)?;
    for entry in document.variables.values() {
        println!("{} = {}", style(&entry.name).green(), entry.value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actor() {
        assert_eq!(parse_actor("3").unwrap(), 3);
        assert_eq!(parse_actor("laura").unwrap(), 5);
        assert_eq!(parse_actor("Pepper").unwrap(), 1);
        assert!(parse_actor("brickster").is_err());
    }
}
