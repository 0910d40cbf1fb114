//! Player roster (`Players.gsi`): up to nine names of seven letters each.

use isle_data::{ByteCursor, ByteWriter};

use crate::error::{Result, SaveError};

pub const NAME_LETTERS: usize = 7;
pub const MAX_PLAYERS: usize = 9;

/// Letter code for an empty slot.
pub const BLANK: i16 = -1;

/// Legacy letter codes beyond `Z`.
const EXTENDED_LETTERS: [(i16, char); 4] = [(29, 'Ä'), (30, 'Ö'), (31, 'Ü'), (32, 'ß')];

/// Encode a name into seven letter codes.
///
/// Letters are uppercased; anything outside `A-Z` becomes a blank slot.
/// Longer names are truncated, shorter ones padded with blanks.
pub fn encode_name(name: &str) -> [i16; NAME_LETTERS] {
    let mut letters = [BLANK; NAME_LETTERS];
    for (slot, c) in letters.iter_mut().zip(name.chars()) {
        let upper = c.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            *slot = (upper as u8 - b'A') as i16;
        }
    }
    letters
}

/// Decode letter codes into a name, blanks become spaces and trailing
/// spaces are trimmed.
///
/// ```
/// use isle_save::players::{decode_name, encode_name};
///
/// assert_eq!(decode_name(&encode_name("Pepper")), "PEPPER");
/// assert_eq!(decode_name(&[29, 30, 31, 32, -1, -1, -1]), "ÄÖÜß");
/// ```
pub fn decode_name(letters: &[i16]) -> String {
    let name: String = letters.iter().map(|&code| decode_letter(code)).collect();
    name.trim_end().to_string()
}

fn decode_letter(code: i16) -> char {
    match code {
        0..=25 => (b'A' + code as u8) as char,
        _ => EXTENDED_LETTERS
            .iter()
            .find(|(known, _)| *known == code)
            .map_or(' ', |(_, letter)| *letter),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PlayerEntry {
    pub letters: [i16; NAME_LETTERS],
    pub name: String,
}

impl PlayerEntry {
    pub fn from_letters(letters: [i16; NAME_LETTERS]) -> Self {
        Self {
            name: decode_name(&letters),
            letters,
        }
    }

    pub fn from_name(name: &str) -> Self {
        Self::from_letters(encode_name(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PlayerRoster {
    pub players: Vec<PlayerEntry>,
}

impl PlayerRoster {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);
        let count = cursor.read_i16()?;
        let mut players = Vec::new();
        for _ in 0..count.max(0) {
            let mut letters = [BLANK; NAME_LETTERS];
            for letter in &mut letters {
                *letter = cursor.read_i16()?;
            }
            players.push(PlayerEntry::from_letters(letters));
        }
        if !cursor.is_at_end() {
            log::debug!("{} bytes after the roster ignored", cursor.remaining());
        }
        Ok(Self { players })
    }

    pub fn write(&self, writer: &mut ByteWriter) -> Result<()> {
        if self.players.len() > MAX_PLAYERS {
            return Err(SaveError::RosterTooLarge(self.players.len()));
        }
        writer.put_i16(self.players.len() as i16);
        for player in &self.players {
            for &letter in &player.letters {
                writer.put_i16(letter);
            }
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ByteWriter::new();
        self.write(&mut writer)?;
        Ok(writer.into_bytes())
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn push(&mut self, name: &str) -> Result<()> {
        if self.players.len() >= MAX_PLAYERS {
            return Err(SaveError::RosterTooLarge(self.players.len() + 1));
        }
        self.players.push(PlayerEntry::from_name(name));
        Ok(())
    }

    pub fn rename(&mut self, index: usize, name: &str) -> Result<()> {
        let count = self.players.len();
        let player = self
            .players
            .get_mut(index)
            .ok_or(SaveError::InvalidPlayer { index, count })?;
        *player = PlayerEntry::from_name(name);
        Ok(())
    }
}
