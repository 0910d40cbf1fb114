//! Parsed save slot with the byte offsets patching relies on.

use std::collections::BTreeMap;

use isle_data::ByteCursor;

use crate::error::Result;
use crate::header::{HEADER_SIZE, SaveHeader};
use crate::records::{
    BUILDING_COUNT, BuildingRecord, CHARACTER_COUNT, CHARACTER_RECORD_SIZE, CharacterRecord,
    PLANT_COUNT, PLANT_RECORD_SIZE, PlantRecord, RECORDS_SIZE,
};
use crate::state::{GameState, MissionScores, MissionType};

/// Name that terminates the variable section. It carries no value.
pub const END_OF_VARIABLES: &str = "END_OF_VARIABLES";

/// One scripting variable and where its bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VariableEntry {
    pub name: String,
    pub value: String,
    /// Offset of the name's `u8` length prefix
    pub name_offset: usize,
    /// Offset of the first value byte; the length prefix sits just before
    pub value_offset: usize,
    pub value_length: usize,
}

/// An immutable view of a save slot.
///
/// Offsets are positions in the buffer the document was parsed from. The
/// patcher returns a new document alongside every new buffer, so the two
/// never disagree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SaveGameDocument {
    pub header: SaveHeader,
    pub variables: BTreeMap<String, VariableEntry>,
    /// Offset of the sentinel entry
    pub variables_end: usize,
    /// Offset of the first character record
    pub records_offset: usize,
    pub characters: Vec<CharacterRecord>,
    pub plants: Vec<PlantRecord>,
    pub buildings: Vec<BuildingRecord>,
    pub next_variant: u8,
    /// Offset of the `s16` state count
    pub state_count_offset: usize,
    pub states: Vec<GameState>,
    /// Insertion point for new states
    pub states_end: usize,
    /// Bytes after the state list, kept verbatim
    #[cfg_attr(feature = "serde", serde(skip))]
    pub trailer: Vec<u8>,
}

impl SaveGameDocument {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);
        let header = SaveHeader::read(&mut cursor)?;
        debug_assert_eq!(cursor.position(), HEADER_SIZE);

        let mut variables = BTreeMap::new();
        let variables_end = loop {
            let name_offset = cursor.position();
            let name = cursor.read_str_u8()?;
            if name == END_OF_VARIABLES {
                break name_offset;
            }
            let value_length = cursor.read_u8()? as usize;
            let value_offset = cursor.position();
            let value = cursor.read_string(value_length)?;
            let entry = VariableEntry {
                name: name.clone(),
                value,
                name_offset,
                value_offset,
                value_length,
            };
            if variables.insert(name, entry).is_some() {
                log::warn!(
                    "Duplicate variable at {:#x}, keeping the later value",
                    name_offset
                );
            }
        };
        log::debug!(
            "Variable section: {} entries, sentinel at {:#x}",
            variables.len(),
            variables_end
        );

        let records_offset = cursor.position();
        let mut characters = Vec::with_capacity(CHARACTER_COUNT);
        for _ in 0..CHARACTER_COUNT {
            characters.push(CharacterRecord::read(&mut cursor)?);
        }
        let mut plants = Vec::with_capacity(PLANT_COUNT);
        for _ in 0..PLANT_COUNT {
            plants.push(PlantRecord::read(&mut cursor)?);
        }
        let mut buildings = Vec::with_capacity(BUILDING_COUNT);
        for _ in 0..BUILDING_COUNT {
            buildings.push(BuildingRecord::read(&mut cursor)?);
        }
        let next_variant = cursor.read_u8()?;

        let state_count_offset = cursor.position();
        let state_count = cursor.read_i16()?;
        if state_count < 0 {
            log::warn!("Negative state count {}, reading no states", state_count);
        }
        let mut states = Vec::new();
        for _ in 0..state_count.max(0) {
            states.push(GameState::read(&mut cursor)?);
        }
        let states_end = cursor.position();
        let trailer = data[states_end..].to_vec();
        log::debug!(
            "State list: {} states, ends at {:#x}, {} trailer bytes",
            states.len(),
            states_end,
            trailer.len()
        );

        Ok(Self {
            header,
            variables,
            variables_end,
            records_offset,
            characters,
            plants,
            buildings,
            next_variant,
            state_count_offset,
            states,
            states_end,
            trailer,
        })
    }

    pub fn variable(&self, name: &str) -> Option<&VariableEntry> {
        self.variables.get(name)
    }

    pub fn state(&self, name: &str) -> Option<&GameState> {
        self.states.iter().find(|state| state.name == name)
    }

    pub fn mission(&self, mission: MissionType) -> Option<&MissionScores> {
        self.state(mission.state_name())
            .and_then(GameState::mission)
    }

    /// Offset of character record `index`.
    pub fn character_offset(&self, index: usize) -> usize {
        self.records_offset + index * CHARACTER_RECORD_SIZE
    }

    pub fn plants_offset(&self) -> usize {
        self.character_offset(CHARACTER_COUNT)
    }

    pub fn plant_offset(&self, index: usize) -> usize {
        self.plants_offset() + index * PLANT_RECORD_SIZE
    }

    pub fn next_variant_offset(&self) -> usize {
        self.records_offset + RECORDS_SIZE - 1
    }

    /// Move every recorded offset at or after `from` by `delta` bytes.
    pub(crate) fn relocate(&mut self, from: usize, delta: isize) {
        let shift = |offset: &mut usize| {
            if *offset >= from {
                *offset = offset.saturating_add_signed(delta);
            }
        };
        for entry in self.variables.values_mut() {
            shift(&mut entry.name_offset);
            shift(&mut entry.value_offset);
        }
        shift(&mut self.variables_end);
        shift(&mut self.records_offset);
        shift(&mut self.state_count_offset);
        for state in &mut self.states {
            shift(&mut state.name_offset);
            shift(&mut state.data_offset);
        }
        shift(&mut self.states_end);
    }
}
