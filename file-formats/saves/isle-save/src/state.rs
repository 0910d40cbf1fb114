//! Polymorphic game-state list entries.
//!
//! Each entry is dispatched by name through a static table to a closed set
//! of kinds; names missing from the table become [`StatePayload::Unknown`].

use glam::Vec3;
use isle_data::{ByteCursor, PalettedImage};

use crate::error::{Result, SaveError};

/// Number of playable actors with mission scores.
pub const MISSION_ACTORS: u8 = 5;

/// Score-tracking missions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MissionType {
    Pizza,
    CarRace,
    JetskiRace,
    TowTrack,
    Ambulance,
}

/// Which half of a score pair an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreField {
    Score,
    HighScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MissionLayout {
    /// 8 bytes per actor: unknown, counter, score, high score
    Pizza,
    /// 5 bytes per actor: actor id, score, high score
    Race,
    /// 5 scores then 5 high scores
    Flat,
}

impl MissionType {
    pub const ALL: [Self; 5] = [
        Self::Pizza,
        Self::CarRace,
        Self::JetskiRace,
        Self::TowTrack,
        Self::Ambulance,
    ];

    pub fn state_name(self) -> &'static str {
        match self {
            Self::Pizza => "PizzaMissionState",
            Self::CarRace => "CarRaceState",
            Self::JetskiRace => "JetskiRaceState",
            Self::TowTrack => "TowTrackMissionState",
            Self::Ambulance => "AmbulanceMissionState",
        }
    }

    fn layout(self) -> MissionLayout {
        match self {
            Self::Pizza => MissionLayout::Pizza,
            Self::CarRace | Self::JetskiRace => MissionLayout::Race,
            Self::TowTrack | Self::Ambulance => MissionLayout::Flat,
        }
    }

    pub fn payload_size(self) -> usize {
        match self.layout() {
            MissionLayout::Pizza => 40,
            MissionLayout::Race => 25,
            MissionLayout::Flat => 20,
        }
    }

    /// Offset of one score field relative to the state's data offset.
    pub fn score_offset(self, actor_id: u8, field: ScoreField) -> Result<usize> {
        if !(1..=MISSION_ACTORS).contains(&actor_id) {
            return Err(SaveError::InvalidActor(actor_id));
        }
        Ok(self.slot_offset(usize::from(actor_id - 1), field))
    }

    fn slot_offset(self, slot: usize, field: ScoreField) -> usize {
        match (self.layout(), field) {
            (MissionLayout::Pizza, ScoreField::Score) => slot * 8 + 4,
            (MissionLayout::Pizza, ScoreField::HighScore) => slot * 8 + 6,
            (MissionLayout::Race, ScoreField::Score) => slot * 5 + 1,
            (MissionLayout::Race, ScoreField::HighScore) => slot * 5 + 3,
            (MissionLayout::Flat, ScoreField::Score) => slot * 2,
            (MissionLayout::Flat, ScoreField::HighScore) => 10 + slot * 2,
        }
    }

    /// Payload of a freshly created state: all zero, with race payloads
    /// carrying each slot's actor id.
    pub fn default_payload(self) -> Vec<u8> {
        let mut payload = vec![0u8; self.payload_size()];
        if self.layout() == MissionLayout::Race {
            for actor_id in 1..=MISSION_ACTORS {
                payload[usize::from(actor_id - 1) * 5] = actor_id;
            }
        }
        payload
    }

    /// Decode a payload of exactly [`payload_size`](Self::payload_size) bytes.
    pub(crate) fn decode(self, payload: &[u8]) -> MissionScores {
        let read = |offset: usize| i16::from_le_bytes([payload[offset], payload[offset + 1]]);
        let mut actors = [ScorePair::default(); MISSION_ACTORS as usize];
        for (slot, pair) in actors.iter_mut().enumerate() {
            *pair = ScorePair {
                score: read(self.slot_offset(slot, ScoreField::Score)),
                high_score: read(self.slot_offset(slot, ScoreField::HighScore)),
            };
        }
        MissionScores {
            mission: self,
            actors,
            raw: payload.to_vec(),
        }
    }
}

impl std::str::FromStr for MissionType {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let key = value.to_ascii_lowercase().replace(['-', '_'], "");
        match key.as_str() {
            "pizza" | "pizzamissionstate" => Ok(Self::Pizza),
            "carrace" | "carracestate" => Ok(Self::CarRace),
            "jetskirace" | "jetskiracestate" => Ok(Self::JetskiRace),
            "towtrack" | "towtrackmissionstate" => Ok(Self::TowTrack),
            "ambulance" | "ambulancemissionstate" => Ok(Self::Ambulance),
            _ => Err(format!("unknown mission '{value}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScorePair {
    pub score: i16,
    pub high_score: i16,
}

/// Decoded mission state. `raw` keeps the full payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MissionScores {
    pub mission: MissionType,
    /// Indexed by actor id minus one
    pub actors: [ScorePair; 5],
    #[cfg_attr(feature = "serde", serde(skip))]
    pub raw: Vec<u8>,
}

impl MissionScores {
    pub fn get(&self, actor_id: u8) -> Option<ScorePair> {
        (actor_id as usize)
            .checked_sub(1)
            .and_then(|slot| self.actors.get(slot).copied())
    }
}

/// Opaque fixed-size states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FixedState {
    Pizzeria,
    Hospital,
    GasStation,
    Police,
    CopterBuild,
    DuneCarBuild,
    JetskiBuild,
    RaceCarBuild,
}

impl FixedState {
    pub fn size(self) -> usize {
        match self {
            Self::Pizzeria => 10,
            Self::Hospital => 12,
            Self::GasStation => 6,
            Self::Police
            | Self::CopterBuild
            | Self::DuneCarBuild
            | Self::JetskiBuild
            | Self::RaceCarBuild => 4,
        }
    }
}

/// Kinds a state name can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    Fixed(FixedState),
    Mission(MissionType),
    Anim,
    Act1,
}

static STATE_KINDS: [(&str, StateKind); 15] = [
    ("PizzeriaState", StateKind::Fixed(FixedState::Pizzeria)),
    ("HospitalState", StateKind::Fixed(FixedState::Hospital)),
    ("GasStationState", StateKind::Fixed(FixedState::GasStation)),
    ("PoliceState", StateKind::Fixed(FixedState::Police)),
    ("LegoCopterBuildState", StateKind::Fixed(FixedState::CopterBuild)),
    ("LegoDuneCarBuildState", StateKind::Fixed(FixedState::DuneCarBuild)),
    ("LegoJetskiBuildState", StateKind::Fixed(FixedState::JetskiBuild)),
    ("LegoRaceCarBuildState", StateKind::Fixed(FixedState::RaceCarBuild)),
    ("PizzaMissionState", StateKind::Mission(MissionType::Pizza)),
    ("CarRaceState", StateKind::Mission(MissionType::CarRace)),
    ("JetskiRaceState", StateKind::Mission(MissionType::JetskiRace)),
    ("TowTrackMissionState", StateKind::Mission(MissionType::TowTrack)),
    ("AmbulanceMissionState", StateKind::Mission(MissionType::Ambulance)),
    ("AnimState", StateKind::Anim),
    ("Act1State", StateKind::Act1),
];

impl StateKind {
    pub fn from_name(name: &str) -> Option<Self> {
        STATE_KINDS
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, kind)| *kind)
    }
}

/// `AnimState`: which scripted animations have played.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnimState {
    pub extra_character_id: u32,
    pub anim_counts: Vec<u16>,
    pub location_flags: Vec<u8>,
}

impl AnimState {
    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let extra_character_id = cursor.read_u32()?;
        let anim_count = cursor.read_u32()?;
        let mut anim_counts = Vec::new();
        for _ in 0..anim_count {
            anim_counts.push(cursor.read_u16()?);
        }
        let flag_count = cursor.read_u32()? as usize;
        let location_flags = cursor.read_bytes(flag_count)?.to_vec();
        Ok(Self {
            extra_character_id,
            anim_counts,
            location_flags,
        })
    }
}

/// Named placement of a vehicle in act 1.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NamedPlane {
    pub name: String,
    pub position: Vec3,
    pub direction: Vec3,
    pub up: Vec3,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NamedTexture {
    pub name: String,
    pub image: PalettedImage,
}

pub const ACT1_PLANES: usize = 7;

/// Textures stored after the planes, per plane index, when that plane is named.
const ACT1_TEXTURES_PER_PLANE: [(usize, usize); 4] = [(3, 3), (4, 2), (5, 1), (6, 3)];

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Act1State {
    pub planes: Vec<NamedPlane>,
    pub textures: Vec<NamedTexture>,
    pub cpt_click_dialogue: i16,
    pub player_in_elevator: u8,
}

impl Act1State {
    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let mut planes = Vec::with_capacity(ACT1_PLANES);
        for _ in 0..ACT1_PLANES {
            planes.push(NamedPlane {
                name: cursor.read_str_i16()?,
                position: cursor.read_vec3()?,
                direction: cursor.read_vec3()?,
                up: cursor.read_vec3()?,
            });
        }

        let mut textures = Vec::new();
        for (plane, count) in ACT1_TEXTURES_PER_PLANE {
            if planes[plane].name.is_empty() {
                continue;
            }
            for _ in 0..count {
                textures.push(NamedTexture {
                    name: cursor.read_str_i16()?,
                    image: PalettedImage::read(cursor)?,
                });
            }
        }

        Ok(Self {
            planes,
            textures,
            cpt_click_dialogue: cursor.read_i16()?,
            player_in_elevator: cursor.read_u8()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum StatePayload {
    Fixed {
        kind: FixedState,
        #[cfg_attr(feature = "serde", serde(skip))]
        bytes: Vec<u8>,
    },
    Mission(MissionScores),
    Anim(AnimState),
    Act1(Act1State),
    /// Name missing from the dispatch table; read as zero bytes
    Unknown {
        #[cfg_attr(feature = "serde", serde(skip))]
        bytes: Vec<u8>,
    },
}

impl StatePayload {
    /// Read the payload for a state called `name`.
    pub fn read(cursor: &mut ByteCursor<'_>, name: &str) -> Result<Self> {
        let Some(kind) = StateKind::from_name(name) else {
            log::warn!(
                "Unknown game state '{}' at {:#x}, assuming an empty payload",
                name,
                cursor.position()
            );
            return Ok(Self::Unknown { bytes: Vec::new() });
        };

        Ok(match kind {
            StateKind::Fixed(kind) => Self::Fixed {
                kind,
                bytes: cursor.read_bytes(kind.size())?.to_vec(),
            },
            StateKind::Mission(mission) => {
                let bytes = cursor.read_bytes(mission.payload_size())?;
                Self::Mission(mission.decode(bytes))
            }
            StateKind::Anim => Self::Anim(AnimState::read(cursor)?),
            StateKind::Act1 => Self::Act1(Act1State::read(cursor)?),
        })
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Fixed { .. } => "fixed",
            Self::Mission(_) => "mission",
            Self::Anim(_) => "anim",
            Self::Act1(_) => "act1",
            Self::Unknown { .. } => "unknown",
        }
    }
}

/// One entry of the state list with its location in the buffer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GameState {
    pub name: String,
    /// Offset of the `s16` name length
    pub name_offset: usize,
    pub data_offset: usize,
    pub data_size: usize,
    pub payload: StatePayload,
}

impl GameState {
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let name_offset = cursor.position();
        let name = cursor.read_str_i16()?;
        let data_offset = cursor.position();
        let payload = StatePayload::read(cursor, &name)?;
        Ok(Self {
            name,
            name_offset,
            data_offset,
            data_size: cursor.position() - data_offset,
            payload,
        })
    }

    pub fn mission(&self) -> Option<&MissionScores> {
        match &self.payload {
            StatePayload::Mission(scores) => Some(scores),
            _ => None,
        }
    }
}
