//! Bounds-checked sequential reader over a borrowed byte slice.

use byteorder::{ByteOrder, LittleEndian};
use glam::{Vec2, Vec3};

use crate::error::{DataError, Result};

/// Read cursor over a byte slice. All reads are little-endian.
///
/// Every read checks the remaining length first and fails with
/// [`DataError::OutOfBounds`] instead of panicking, so a truncated file
/// surfaces as an error at the exact offset where the data ran out.
///
/// # Examples
///
/// ```
/// use isle_data::ByteCursor;
///
/// let data = [0x0c, 0x00, 0x01, 0x00, 0x05, 0x00];
/// let mut cursor = ByteCursor::new(&data);
/// assert_eq!(cursor.read_i32().unwrap(), 0x1000c);
/// assert_eq!(cursor.read_i16().unwrap(), 5);
/// assert!(cursor.read_u8().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current byte position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of the underlying data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether every byte has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Remaining bytes from the current position.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Seek to an absolute position. Seeking past the end is allowed; the
    /// next read reports the overrun.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    fn ensure(&self, need: usize) -> Result<()> {
        if self.remaining() < need {
            return Err(DataError::OutOfBounds {
                offset: self.pos,
                need,
                have: self.remaining(),
            });
        }
        Ok(())
    }

    /// Read a slice of `n` bytes without copying.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.read_bytes(4)?))
    }

    pub fn read_vec2(&mut self) -> Result<Vec2> {
        Ok(Vec2::new(self.read_f32()?, self.read_f32()?))
    }

    pub fn read_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    /// Read a fixed-length string. Bytes are decoded as Latin-1 and trailing
    /// NUL padding is dropped.
    pub fn read_string(&mut self, len: usize) -> Result<String> {
        let bytes = self.read_bytes(len)?;
        Ok(decode_latin1(bytes))
    }

    /// Read a string prefixed by a `u8` length.
    pub fn read_str_u8(&mut self) -> Result<String> {
        let len = self.read_u8()? as usize;
        self.read_string(len)
    }

    /// Read a string prefixed by an `s16` length. Negative lengths are rejected.
    pub fn read_str_i16(&mut self) -> Result<String> {
        let offset = self.pos;
        let len = self.read_i16()?;
        if len < 0 {
            return Err(DataError::InvalidStringLength {
                offset,
                length: len as i64,
            });
        }
        self.read_string(len as usize)
    }

    /// Read a string prefixed by a `u32` length.
    pub fn read_str_u32(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        self.read_string(len)
    }

    /// Read a string prefixed by an `s32` length. Negative lengths are rejected.
    pub fn read_str_i32(&mut self) -> Result<String> {
        let offset = self.pos;
        let len = self.read_i32()?;
        if len < 0 {
            return Err(DataError::InvalidStringLength {
                offset,
                length: len as i64,
            });
        }
        self.read_string(len as usize)
    }
}

/// Decode Latin-1 bytes, dropping trailing NULs.
pub fn decode_latin1(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |last| last + 1);
    bytes[..end].iter().map(|&b| b as char).collect()
}

/// Encode a string as Latin-1. Characters outside the range become `?`.
pub fn encode_latin1(value: &str) -> Vec<u8> {
    value
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
