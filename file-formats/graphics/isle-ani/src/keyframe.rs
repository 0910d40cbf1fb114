//! Keyframe time packing and typed key payloads.

use glam::{Quat, Vec3};
use isle_data::{ByteCursor, ByteWriter};

use crate::error::{AniError, Result};

/// Largest representable keyframe time (24 bits, milliseconds).
pub const MAX_KEY_TIME: u32 = 0x00FF_FFFF;

/// Keyframe time and flags packed into one 32-bit word:
/// `time` in bits 0-23, `flags` in bits 24-31.
///
/// Flags are opaque to this crate and round-trip unchanged.
///
/// # Examples
///
/// ```
/// use isle_ani::KeyTime;
///
/// let key = KeyTime::new(123_456, 0xab).unwrap();
/// let word = key.pack();
/// assert_eq!(KeyTime::unpack(word), key);
/// assert!(KeyTime::new(0x0100_0000, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct KeyTime {
    pub time: u32,
    pub flags: u8,
}

impl KeyTime {
    pub fn new(time: u32, flags: u8) -> Result<Self> {
        if time > MAX_KEY_TIME {
            return Err(AniError::TimeOutOfRange(time));
        }
        Ok(Self { time, flags })
    }

    pub fn pack(self) -> i32 {
        ((self.time & MAX_KEY_TIME) | (u32::from(self.flags) << 24)) as i32
    }

    pub fn unpack(word: i32) -> Self {
        let word = word as u32;
        Self {
            time: word & MAX_KEY_TIME,
            flags: (word >> 24) as u8,
        }
    }
}

/// Payload carried by one kind of keyframe.
pub trait KeyValue: Sized {
    /// Name used in error messages.
    const KIND: &'static str;

    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self>;
    fn write(&self, writer: &mut ByteWriter);
}

impl KeyValue for Vec3 {
    const KIND: &'static str = "vector";

    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(cursor.read_vec3()?)
    }

    fn write(&self, writer: &mut ByteWriter) {
        writer.put_vec3(*self);
    }
}

/// Rotations are stored as `w, x, y, z`.
impl KeyValue for Quat {
    const KIND: &'static str = "rotation";

    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let w = cursor.read_f32()?;
        let x = cursor.read_f32()?;
        let y = cursor.read_f32()?;
        let z = cursor.read_f32()?;
        Ok(Quat::from_xyzw(x, y, z, w))
    }

    fn write(&self, writer: &mut ByteWriter) {
        writer.put_f32(self.w);
        writer.put_f32(self.x);
        writer.put_f32(self.y);
        writer.put_f32(self.z);
    }
}

/// Morph keys carry a single visibility byte.
impl KeyValue for bool {
    const KIND: &'static str = "morph";

    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(cursor.read_bool()?)
    }

    fn write(&self, writer: &mut ByteWriter) {
        writer.put_bool(*self);
    }
}

/// Camera roll keys carry only a Z angle.
impl KeyValue for f32 {
    const KIND: &'static str = "roll";

    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(cursor.read_f32()?)
    }

    fn write(&self, writer: &mut ByteWriter) {
        writer.put_f32(*self);
    }
}

/// One keyframe: packed time word followed by its payload.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Keyframe<T> {
    pub time: KeyTime,
    pub value: T,
}

impl<T: KeyValue> Keyframe<T> {
    pub fn new(time: KeyTime, value: T) -> Self {
        Self { time, value }
    }

    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let time = KeyTime::unpack(cursor.read_i32()?);
        let value = T::read(cursor)?;
        Ok(Self { time, value })
    }

    pub fn write(&self, writer: &mut ByteWriter) {
        writer.put_i32(self.time.pack());
        self.value.write(writer);
    }
}

pub type TranslationKey = Keyframe<Vec3>;
pub type RotationKey = Keyframe<Quat>;
pub type ScaleKey = Keyframe<Vec3>;
pub type MorphKey = Keyframe<bool>;
pub type RollKey = Keyframe<f32>;

/// Read a `u16`-counted keyframe list.
pub(crate) fn read_keys<T: KeyValue>(cursor: &mut ByteCursor<'_>) -> Result<Vec<Keyframe<T>>> {
    let count = cursor.read_u16()? as usize;
    let mut keys = Vec::with_capacity(count);
    for _ in 0..count {
        keys.push(Keyframe::read(cursor)?);
    }
    Ok(keys)
}

/// Write a `u16`-counted keyframe list.
pub(crate) fn write_keys<T: KeyValue>(writer: &mut ByteWriter, keys: &[Keyframe<T>]) -> Result<()> {
    let count = u16::try_from(keys.len()).map_err(|_| AniError::TooManyKeys {
        kind: T::KIND,
        count: keys.len(),
    })?;
    writer.put_u16(count);
    for key in keys {
        key.write(writer);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, 0 ; "zero")]
    #[test_case(123_456, 0xab ; "mixed")]
    #[test_case(MAX_KEY_TIME, 0xff ; "all bits")]
    #[test_case(1, 0x80 ; "high flag bit")]
    fn test_pack_unpack(time: u32, flags: u8) {
        let key = KeyTime::new(time, flags).unwrap();
        let unpacked = KeyTime::unpack(key.pack());
        assert_eq!(unpacked.time, time);
        assert_eq!(unpacked.flags, flags);
    }

    #[test]
    fn test_packed_layout() {
        let key = KeyTime::new(0x0001_e240, 0xab).unwrap();
        assert_eq!(key.pack() as u32, 0xab01_e240);
    }

    #[test]
    fn test_time_limit() {
        assert!(matches!(
            KeyTime::new(0x0100_0000, 0),
            Err(AniError::TimeOutOfRange(0x0100_0000))
        ));
    }

    #[test]
    fn test_rotation_component_order() {
        let mut writer = ByteWriter::new();
        for value in [1.0f32, 2.0, 3.0, 4.0] {
            writer.put_f32(value);
        }
        let bytes = writer.into_bytes();

        let mut cursor = ByteCursor::new(&bytes);
        let quat = Quat::read(&mut cursor).unwrap();
        assert_eq!(quat.w, 1.0);
        assert_eq!(quat.x, 2.0);
        assert_eq!(quat.y, 3.0);
        assert_eq!(quat.z, 4.0);
    }

    #[test]
    fn test_key_list_count_limit() {
        let keys = vec![Keyframe::new(KeyTime::default(), true); usize::from(u16::MAX) + 1];
        let mut writer = ByteWriter::new();
        assert!(matches!(
            write_keys(&mut writer, &keys),
            Err(AniError::TooManyKeys { kind: "morph", .. })
        ));
    }
}
