//! Targeted edits that derive a new buffer and document from old ones.
//!
//! Every function leaves its inputs untouched and returns a [`Patched`]
//! whose document equals a fresh parse of its buffer. Bytes outside the
//! edited span are copied verbatim.

use isle_data::{ByteCursor, encode_latin1};

use crate::document::SaveGameDocument;
use crate::error::{Result, SaveError};
use crate::header::{ACTOR_ID_OFFSET, CURRENT_ACT_OFFSET};
use crate::records::{CHARACTER_COUNT, CharacterField};
use crate::state::{GameState, MissionType, ScoreField, StatePayload};

/// Largest value a variable's one-byte length prefix can describe.
pub const MAX_VARIABLE_LENGTH: usize = u8::MAX as usize;

/// A buffer together with the document describing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Patched {
    pub document: SaveGameDocument,
    pub buffer: Vec<u8>,
}

impl Patched {
    pub fn parse(buffer: Vec<u8>) -> Result<Self> {
        let document = SaveGameDocument::parse(&buffer)?;
        Ok(Self { document, buffer })
    }
}

/// Header fields to overwrite; `None` leaves a field alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderEdit {
    pub current_act: Option<u16>,
    pub actor_id: Option<u8>,
}

pub fn update_header(
    document: &SaveGameDocument,
    buffer: &[u8],
    edit: HeaderEdit,
) -> Result<Patched> {
    let mut patched = copy(document, buffer);
    if let Some(act) = edit.current_act {
        overwrite(&mut patched.buffer, CURRENT_ACT_OFFSET, &act.to_le_bytes());
        patched.document.header.current_act = act;
    }
    if let Some(actor_id) = edit.actor_id {
        overwrite(&mut patched.buffer, ACTOR_ID_OFFSET, &[actor_id]);
        patched.document.header.actor_id = actor_id;
    }
    Ok(patched)
}

/// Append a zero-filled state for `mission` at the end of the state list.
///
/// Does nothing when the state already exists.
pub fn ensure_mission_state(
    document: &SaveGameDocument,
    buffer: &[u8],
    mission: MissionType,
) -> Result<Patched> {
    let name = mission.state_name();
    if document.state(name).is_some() {
        return Ok(copy(document, buffer));
    }

    let count_at = document.state_count_offset;
    let count = i16::from_le_bytes([buffer[count_at], buffer[count_at + 1]]);
    let new_count = count
        .checked_add(1)
        .ok_or(SaveError::TooManyStates(count))?;

    let payload = mission.default_payload();
    let mut entry = Vec::with_capacity(2 + name.len() + payload.len());
    entry.extend_from_slice(&(name.len() as i16).to_le_bytes());
    entry.extend_from_slice(name.as_bytes());
    entry.extend_from_slice(&payload);

    let insert_at = document.states_end;
    let mut spliced = Vec::with_capacity(buffer.len() + entry.len());
    spliced.extend_from_slice(&buffer[..insert_at]);
    spliced.extend_from_slice(&entry);
    spliced.extend_from_slice(&buffer[insert_at..]);
    overwrite(&mut spliced, count_at, &new_count.to_le_bytes());

    // nothing but the trailer follows the insertion point
    let mut updated = document.clone();
    updated.states_end += entry.len();
    updated.states.push(GameState {
        name: name.to_string(),
        name_offset: insert_at,
        data_offset: insert_at + 2 + name.len(),
        data_size: payload.len(),
        payload: StatePayload::Mission(mission.decode(&payload)),
    });

    log::debug!(
        "Inserted {} ({} bytes) at {:#x}",
        name,
        entry.len(),
        insert_at
    );
    Ok(Patched {
        document: updated,
        buffer: spliced,
    })
}

/// Write one score of one actor, creating the mission state if needed.
pub fn set_mission_score(
    document: &SaveGameDocument,
    buffer: &[u8],
    mission: MissionType,
    actor_id: u8,
    field: ScoreField,
    value: i16,
) -> Result<Patched> {
    let relative = mission.score_offset(actor_id, field)?;
    let mut patched = ensure_mission_state(document, buffer, mission)?;

    let name = mission.state_name();
    let Some(state) = patched
        .document
        .states
        .iter_mut()
        .find(|state| state.name == name)
    else {
        return Err(SaveError::UnexpectedState {
            name: name.to_string(),
            expected: "mission state",
        });
    };
    let StatePayload::Mission(scores) = &mut state.payload else {
        return Err(SaveError::UnexpectedState {
            name: name.to_string(),
            expected: "mission state",
        });
    };

    let bytes = value.to_le_bytes();
    overwrite(&mut patched.buffer, state.data_offset + relative, &bytes);
    scores.raw[relative..relative + 2].copy_from_slice(&bytes);
    let pair = &mut scores.actors[usize::from(actor_id - 1)];
    match field {
        ScoreField::Score => pair.score = value,
        ScoreField::HighScore => pair.high_score = value,
    }
    Ok(patched)
}

/// Replace the value of an existing variable.
///
/// Equal-length values are overwritten in place. Otherwise the length
/// prefix is rewritten and everything after the old value shifts by the
/// length difference.
pub fn set_variable(
    document: &SaveGameDocument,
    buffer: &[u8],
    name: &str,
    value: &str,
) -> Result<Patched> {
    let entry = document
        .variable(name)
        .ok_or_else(|| SaveError::UnknownVariable(name.to_string()))?;
    let encoded = encode_latin1(value);
    if encoded.len() > MAX_VARIABLE_LENGTH {
        return Err(SaveError::ValueTooLong {
            name: name.to_string(),
            length: encoded.len(),
        });
    }

    let start = entry.value_offset;
    let old_end = start + entry.value_length;
    let mut updated = document.clone();
    let buffer = if encoded.len() == entry.value_length {
        let mut patched = buffer.to_vec();
        overwrite(&mut patched, start, &encoded);
        patched
    } else {
        let mut spliced = Vec::with_capacity(buffer.len() - entry.value_length + encoded.len());
        spliced.extend_from_slice(&buffer[..start - 1]);
        spliced.push(encoded.len() as u8);
        spliced.extend_from_slice(&encoded);
        spliced.extend_from_slice(&buffer[old_end..]);
        updated.relocate(old_end, encoded.len() as isize - entry.value_length as isize);
        spliced
    };

    let stored = ByteCursor::new(&encoded).read_string(encoded.len())?;
    if let Some(edited) = updated.variables.get_mut(name) {
        edited.name_offset = entry.name_offset;
        edited.value_offset = entry.value_offset;
        edited.value_length = encoded.len();
        edited.value = stored;
    }

    Ok(Patched {
        document: updated,
        buffer,
    })
}

/// Overwrite one field of character record `index`.
pub fn set_character_field(
    document: &SaveGameDocument,
    buffer: &[u8],
    index: usize,
    field: CharacterField,
    value: i32,
) -> Result<Patched> {
    if index >= CHARACTER_COUNT {
        return Err(SaveError::InvalidCharacter {
            index,
            count: CHARACTER_COUNT,
        });
    }
    let encoded = field.encode(value)?;
    let mut patched = copy(document, buffer);
    overwrite(
        &mut patched.buffer,
        document.character_offset(index) + field.offset(),
        &encoded,
    );
    patched.document.characters[index].set(field, value);
    Ok(patched)
}

fn copy(document: &SaveGameDocument, buffer: &[u8]) -> Patched {
    Patched {
        document: document.clone(),
        buffer: buffer.to_vec(),
    }
}

fn overwrite(buffer: &mut [u8], offset: usize, bytes: &[u8]) {
    buffer[offset..offset + bytes.len()].copy_from_slice(bytes);
}

/// Applies a chain of edits to one save slot.
///
/// Each step replaces the document and buffer together, so a failed edit
/// leaves the previous state intact.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveGameEditor {
    current: Patched,
}

impl SaveGameEditor {
    pub fn open(buffer: Vec<u8>) -> Result<Self> {
        Ok(Self {
            current: Patched::parse(buffer)?,
        })
    }

    pub fn document(&self) -> &SaveGameDocument {
        &self.current.document
    }

    pub fn buffer(&self) -> &[u8] {
        &self.current.buffer
    }

    pub fn into_patched(self) -> Patched {
        self.current
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.current.buffer
    }

    pub fn update_header(&mut self, edit: HeaderEdit) -> Result<&mut Self> {
        self.current = update_header(&self.current.document, &self.current.buffer, edit)?;
        Ok(self)
    }

    pub fn set_mission_score(
        &mut self,
        mission: MissionType,
        actor_id: u8,
        field: ScoreField,
        value: i16,
    ) -> Result<&mut Self> {
        self.current = set_mission_score(
            &self.current.document,
            &self.current.buffer,
            mission,
            actor_id,
            field,
            value,
        )?;
        Ok(self)
    }

    pub fn set_variable(&mut self, name: &str, value: &str) -> Result<&mut Self> {
        self.current = set_variable(&self.current.document, &self.current.buffer, name, value)?;
        Ok(self)
    }

    pub fn set_character_field(
        &mut self,
        index: usize,
        field: CharacterField,
        value: i32,
    ) -> Result<&mut Self> {
        self.current = set_character_field(
            &self.current.document,
            &self.current.buffer,
            index,
            field,
            value,
        )?;
        Ok(self)
    }
}

impl From<Patched> for SaveGameEditor {
    fn from(current: Patched) -> Self {
        Self { current }
    }
}
