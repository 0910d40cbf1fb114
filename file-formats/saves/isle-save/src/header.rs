use isle_data::ByteCursor;

use crate::error::{Result, SaveError};

/// Version word every save slot starts with.
pub const SAVE_VERSION: i32 = 0x1000c;

/// Size of the fixed header.
pub const HEADER_SIZE: usize = 9;

pub const PLAYER_ID_OFFSET: usize = 4;
pub const CURRENT_ACT_OFFSET: usize = 6;
pub const ACTOR_ID_OFFSET: usize = 8;

/// Fixed 9-byte header of a save slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SaveHeader {
    pub version: i32,
    pub player_id: i16,
    pub current_act: u16,
    /// Playable actor, see [`actor_name`](crate::actor_name)
    pub actor_id: u8,
}

impl SaveHeader {
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let version = cursor.read_i32()?;
        if version != SAVE_VERSION {
            return Err(SaveError::InvalidVersion {
                expected: SAVE_VERSION,
                actual: version,
            });
        }
        Ok(Self {
            version,
            player_id: cursor.read_i16()?,
            current_act: cursor.read_u16()?,
            actor_id: cursor.read_u8()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_fields() {
        let bytes = [0x0c, 0x00, 0x01, 0x00, 0x05, 0x00, 0x01, 0x00, 0x02];
        let header = SaveHeader::read(&mut ByteCursor::new(&bytes)).unwrap();
        assert_eq!(
            header,
            SaveHeader {
                version: 0x1000c,
                player_id: 5,
                current_act: 1,
                actor_id: 2,
            }
        );
    }

    #[test]
    fn test_wrong_version_is_fatal() {
        let bytes = [0x0b, 0x00, 0x01, 0x00, 0, 0, 0, 0, 0];
        assert!(matches!(
            SaveHeader::read(&mut ByteCursor::new(&bytes)),
            Err(SaveError::InvalidVersion {
                actual: 0x1000b,
                ..
            })
        ));
    }
}
