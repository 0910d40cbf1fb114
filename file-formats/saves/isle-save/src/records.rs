//! Fixed-size character, plant and building records.

use isle_data::ByteCursor;

use crate::actors::ActorInfo;
use crate::error::{Result, SaveError};

pub const CHARACTER_RECORD_SIZE: usize = 16;
pub const PLANT_RECORD_SIZE: usize = 12;
pub const BUILDING_RECORD_SIZE: usize = 10;

pub const CHARACTER_COUNT: usize = 66;
pub const PLANT_COUNT: usize = 81;
pub const BUILDING_COUNT: usize = 16;

/// Bytes from the first character record to the end of `nextVariant`.
pub const RECORDS_SIZE: usize = CHARACTER_COUNT * CHARACTER_RECORD_SIZE
    + PLANT_COUNT * PLANT_RECORD_SIZE
    + BUILDING_COUNT * BUILDING_RECORD_SIZE
    + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CharacterRecord {
    pub sound: i32,
    pub movement: i32,
    pub mood: u8,
    pub hat_part: u8,
    pub hat_color: u8,
    pub infogron_color: u8,
    pub arm_left_color: u8,
    pub arm_right_color: u8,
    pub leg_left_color: u8,
    pub leg_right_color: u8,
}

/// Part and colour names a character record selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResolvedCharacter {
    pub name: &'static str,
    pub hat_part: Option<&'static str>,
    pub hat_color: Option<&'static str>,
    pub infogron_color: Option<&'static str>,
    pub arm_left_color: Option<&'static str>,
    pub arm_right_color: Option<&'static str>,
    pub leg_left_color: Option<&'static str>,
    pub leg_right_color: Option<&'static str>,
}

impl CharacterRecord {
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Self {
            sound: cursor.read_i32()?,
            movement: cursor.read_i32()?,
            mood: cursor.read_u8()?,
            hat_part: cursor.read_u8()?,
            hat_color: cursor.read_u8()?,
            infogron_color: cursor.read_u8()?,
            arm_left_color: cursor.read_u8()?,
            arm_right_color: cursor.read_u8()?,
            leg_left_color: cursor.read_u8()?,
            leg_right_color: cursor.read_u8()?,
        })
    }

    /// Map the index fields through the actor's name tables.
    pub fn resolve(&self, info: &ActorInfo) -> ResolvedCharacter {
        let color = |index| info.colors.get(index);
        ResolvedCharacter {
            name: info.name,
            hat_part: info.hat_parts.get(self.hat_part),
            hat_color: color(self.hat_color),
            infogron_color: color(self.infogron_color),
            arm_left_color: color(self.arm_left_color),
            arm_right_color: color(self.arm_right_color),
            leg_left_color: color(self.leg_left_color),
            leg_right_color: color(self.leg_right_color),
        }
    }

    pub fn get(&self, field: CharacterField) -> i32 {
        match field {
            CharacterField::Sound => self.sound,
            CharacterField::Move => self.movement,
            CharacterField::Mood => self.mood.into(),
            CharacterField::HatPart => self.hat_part.into(),
            CharacterField::HatColor => self.hat_color.into(),
            CharacterField::InfogronColor => self.infogron_color.into(),
            CharacterField::ArmLeftColor => self.arm_left_color.into(),
            CharacterField::ArmRightColor => self.arm_right_color.into(),
            CharacterField::LegLeftColor => self.leg_left_color.into(),
            CharacterField::LegRightColor => self.leg_right_color.into(),
        }
    }

    /// Store `value`, which the caller has range-checked for the field.
    pub(crate) fn set(&mut self, field: CharacterField, value: i32) {
        let byte = value as u8;
        match field {
            CharacterField::Sound => self.sound = value,
            CharacterField::Move => self.movement = value,
            CharacterField::Mood => self.mood = byte,
            CharacterField::HatPart => self.hat_part = byte,
            CharacterField::HatColor => self.hat_color = byte,
            CharacterField::InfogronColor => self.infogron_color = byte,
            CharacterField::ArmLeftColor => self.arm_left_color = byte,
            CharacterField::ArmRightColor => self.arm_right_color = byte,
            CharacterField::LegLeftColor => self.leg_left_color = byte,
            CharacterField::LegRightColor => self.leg_right_color = byte,
        }
    }
}

/// Editable field of a character record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterField {
    Sound,
    Move,
    Mood,
    HatPart,
    HatColor,
    InfogronColor,
    ArmLeftColor,
    ArmRightColor,
    LegLeftColor,
    LegRightColor,
}

impl CharacterField {
    pub const ALL: [Self; 10] = [
        Self::Sound,
        Self::Move,
        Self::Mood,
        Self::HatPart,
        Self::HatColor,
        Self::InfogronColor,
        Self::ArmLeftColor,
        Self::ArmRightColor,
        Self::LegLeftColor,
        Self::LegRightColor,
    ];

    /// Byte offset inside the 16-byte record.
    pub fn offset(self) -> usize {
        match self {
            Self::Sound => 0,
            Self::Move => 4,
            Self::Mood => 8,
            Self::HatPart => 9,
            Self::HatColor => 10,
            Self::InfogronColor => 11,
            Self::ArmLeftColor => 12,
            Self::ArmRightColor => 13,
            Self::LegLeftColor => 14,
            Self::LegRightColor => 15,
        }
    }

    /// Width in bytes: 4 for the two `s32` fields, 1 otherwise.
    pub fn width(self) -> usize {
        match self {
            Self::Sound | Self::Move => 4,
            _ => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sound => "sound",
            Self::Move => "move",
            Self::Mood => "mood",
            Self::HatPart => "hatPart",
            Self::HatColor => "hatColor",
            Self::InfogronColor => "infogronColor",
            Self::ArmLeftColor => "armLeftColor",
            Self::ArmRightColor => "armRightColor",
            Self::LegLeftColor => "legLeftColor",
            Self::LegRightColor => "legRightColor",
        }
    }

    /// Little-endian encoding of `value` at this field's width.
    pub fn encode(self, value: i32) -> Result<Vec<u8>> {
        if self.width() == 4 {
            return Ok(value.to_le_bytes().to_vec());
        }
        let byte = u8::try_from(value).map_err(|_| SaveError::FieldOverflow {
            field: self.name(),
            value: value.into(),
        })?;
        Ok(vec![byte])
    }
}

impl std::str::FromStr for CharacterField {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(value))
            .ok_or_else(|| format!("unknown character field '{value}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PlantRecord {
    pub variant: u8,
    pub sound: u32,
    pub movement: u32,
    pub mood: u8,
    pub color: u8,
    pub initial_counter: i8,
}

impl PlantRecord {
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Self {
            variant: cursor.read_u8()?,
            sound: cursor.read_u32()?,
            movement: cursor.read_u32()?,
            mood: cursor.read_u8()?,
            color: cursor.read_u8()?,
            initial_counter: cursor.read_i8()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BuildingRecord {
    pub sound: u32,
    pub movement: u32,
    pub mood: u8,
    pub initial_counter: i8,
}

impl BuildingRecord {
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Self {
            sound: cursor.read_u32()?,
            movement: cursor.read_u32()?,
            mood: cursor.read_u8()?,
            initial_counter: cursor.read_i8()?,
        })
    }
}
