//! Parser and patcher for LEGO Island save data.
//!
//! - [`SaveGameDocument`]: a parsed save slot (`G0.GS` to `G9.GS`) with the
//!   offsets of every variable, record and game state
//! - [`patcher`]: pure edit functions returning a new buffer and document
//!   together, and [`SaveGameEditor`] for chained edits
//! - [`PlayerRoster`]: the `Players.gsi` name list
//!
//! # Examples
//!
//! ```no_run
//! use isle_save::{MissionType, SaveGameEditor, ScoreField};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut editor = SaveGameEditor::open(std::fs::read("G0.GS")?)?;
//! editor.set_mission_score(MissionType::CarRace, 1, ScoreField::HighScore, 3)?;
//! std::fs::write("G0.GS", editor.into_bytes())?;
//! # Ok(())
//! # }
//! ```

pub mod actors;
pub mod document;
pub mod error;
pub mod header;
pub mod patcher;
pub mod players;
pub mod records;
pub mod state;

pub use actors::{ACTORS, ActorInfo, NameTable, TableId, actor_info, actor_name, find_actor};
pub use document::{END_OF_VARIABLES, SaveGameDocument, VariableEntry};
pub use error::{Result, SaveError};
pub use header::{SAVE_VERSION, SaveHeader};
pub use patcher::{HeaderEdit, Patched, SaveGameEditor};
pub use players::{PlayerEntry, PlayerRoster};
pub use records::{BuildingRecord, CharacterField, CharacterRecord, PlantRecord, ResolvedCharacter};
pub use state::{
    Act1State, AnimState, FixedState, GameState, MissionScores, MissionType, ScoreField,
    ScorePair, StateKind, StatePayload,
};
