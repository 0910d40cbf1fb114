//! Growable little-endian writer with random access.

use byteorder::{ByteOrder, LittleEndian};
use glam::{Vec2, Vec3};

use crate::cursor::encode_latin1;
use crate::error::{DataError, Result};

/// Smallest backing allocation handed out on first write.
const MIN_CAPACITY: usize = 64;

/// Write cursor over an owned, auto-growing buffer.
///
/// Storage grows by doubling. The writer tracks the highest byte written
/// separately from the backing allocation so [`ByteWriter::into_bytes`]
/// returns exactly the used length. Seeking past the used length and writing
/// leaves a zero-filled gap.
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
    pos: usize,
    len: usize,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing bytes, positioned at offset 0. Used to overwrite
    /// fields of an already serialised buffer.
    pub fn from_vec(buf: Vec<u8>) -> Self {
        let len = buf.len();
        Self { buf, pos: 0, len }
    }

    pub fn tell(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Number of bytes written so far (highest written offset).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of the backing allocation.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Trim the backing buffer to the used length and return it.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.buf.truncate(self.len);
        self.buf
    }

    fn grow_to(&mut self, end: usize) {
        if end <= self.buf.len() {
            return;
        }
        let mut capacity = self.buf.len().max(MIN_CAPACITY);
        while capacity < end {
            capacity *= 2;
        }
        self.buf.resize(capacity, 0);
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        let end = self.pos + bytes.len();
        self.grow_to(end);
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        self.len = self.len.max(end);
    }

    /// Write `n` zero bytes.
    pub fn put_zeros(&mut self, n: usize) {
        let end = self.pos + n;
        self.grow_to(end);
        self.buf[self.pos..end].fill(0);
        self.pos = end;
        self.len = self.len.max(end);
    }

    pub fn put_u8(&mut self, value: u8) {
        self.put_bytes(&[value]);
    }

    pub fn put_i8(&mut self, value: i8) {
        self.put_bytes(&value.to_le_bytes());
    }

    pub fn put_bool(&mut self, value: bool) {
        self.put_u8(u8::from(value));
    }

    pub fn put_u16(&mut self, value: u16) {
        let mut bytes = [0u8; 2];
        LittleEndian::write_u16(&mut bytes, value);
        self.put_bytes(&bytes);
    }

    pub fn put_i16(&mut self, value: i16) {
        let mut bytes = [0u8; 2];
        LittleEndian::write_i16(&mut bytes, value);
        self.put_bytes(&bytes);
    }

    pub fn put_u32(&mut self, value: u32) {
        let mut bytes = [0u8; 4];
        LittleEndian::write_u32(&mut bytes, value);
        self.put_bytes(&bytes);
    }

    pub fn put_i32(&mut self, value: i32) {
        let mut bytes = [0u8; 4];
        LittleEndian::write_i32(&mut bytes, value);
        self.put_bytes(&bytes);
    }

    pub fn put_f32(&mut self, value: f32) {
        let mut bytes = [0u8; 4];
        LittleEndian::write_f32(&mut bytes, value);
        self.put_bytes(&bytes);
    }

    pub fn put_vec2(&mut self, value: Vec2) {
        self.put_f32(value.x);
        self.put_f32(value.y);
    }

    pub fn put_vec3(&mut self, value: Vec3) {
        self.put_f32(value.x);
        self.put_f32(value.y);
        self.put_f32(value.z);
    }

    /// Write a string with a `u8` length prefix.
    pub fn put_str_u8(&mut self, value: &str) -> Result<()> {
        let bytes = encode_latin1(value);
        let len = u8::try_from(bytes.len()).map_err(|_| self.length_error(bytes.len()))?;
        self.put_u8(len);
        self.put_bytes(&bytes);
        Ok(())
    }

    /// Write a string with an `s16` length prefix.
    pub fn put_str_i16(&mut self, value: &str) -> Result<()> {
        let bytes = encode_latin1(value);
        let len = i16::try_from(bytes.len()).map_err(|_| self.length_error(bytes.len()))?;
        self.put_i16(len);
        self.put_bytes(&bytes);
        Ok(())
    }

    /// Write a string with a `u32` length prefix.
    pub fn put_str_u32(&mut self, value: &str) -> Result<()> {
        let bytes = encode_latin1(value);
        let len = u32::try_from(bytes.len()).map_err(|_| self.length_error(bytes.len()))?;
        self.put_u32(len);
        self.put_bytes(&bytes);
        Ok(())
    }

    /// Write a string with an `s32` length prefix.
    pub fn put_str_i32(&mut self, value: &str) -> Result<()> {
        let bytes = encode_latin1(value);
        let len = i32::try_from(bytes.len()).map_err(|_| self.length_error(bytes.len()))?;
        self.put_i32(len);
        self.put_bytes(&bytes);
        Ok(())
    }

    fn length_error(&self, length: usize) -> DataError {
        DataError::InvalidStringLength {
            offset: self.pos,
            length: length as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::ByteCursor;

    #[test]
    fn test_growth_doubles() {
        let mut writer = ByteWriter::new();
        writer.put_u8(1);
        assert_eq!(writer.capacity(), MIN_CAPACITY);

        writer.put_zeros(MIN_CAPACITY);
        assert_eq!(writer.capacity(), MIN_CAPACITY * 2);
        assert_eq!(writer.len(), MIN_CAPACITY + 1);

        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), MIN_CAPACITY + 1);
    }

    #[test]
    fn test_seek_and_overwrite() {
        let mut writer = ByteWriter::new();
        writer.put_u32(0xdead_beef);
        writer.put_u16(0x1234);
        writer.seek(1);
        writer.put_u8(0x00);
        assert_eq!(writer.tell(), 2);
        assert_eq!(writer.len(), 6);
        assert_eq!(writer.as_slice(), &[0xef, 0x00, 0xad, 0xde, 0x34, 0x12]);
    }

    #[test]
    fn test_seek_past_end_zero_fills() {
        let mut writer = ByteWriter::new();
        writer.put_u8(0xaa);
        writer.seek(4);
        writer.put_u8(0xbb);
        assert_eq!(writer.into_bytes(), vec![0xaa, 0, 0, 0, 0xbb]);
    }

    #[test]
    fn test_from_vec_overwrites_in_place() {
        let mut writer = ByteWriter::from_vec(vec![0u8; 8]);
        writer.seek(6);
        writer.put_u16(2);
        assert_eq!(writer.into_bytes(), vec![0, 0, 0, 0, 0, 0, 2, 0]);
    }

    #[test]
    fn test_strings_read_back() {
        let mut writer = ByteWriter::new();
        writer.put_str_u8("pepper").unwrap();
        writer.put_str_i16("Act1State").unwrap();
        writer.put_str_u32("isle").unwrap();
        writer.put_str_i32("").unwrap();
        let bytes = writer.into_bytes();

        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(cursor.read_str_u8().unwrap(), "pepper");
        assert_eq!(cursor.read_str_i16().unwrap(), "Act1State");
        assert_eq!(cursor.read_str_u32().unwrap(), "isle");
        assert_eq!(cursor.read_str_i32().unwrap(), "");
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_u8_string_too_long() {
        let mut writer = ByteWriter::new();
        let long = "x".repeat(256);
        assert!(matches!(
            writer.put_str_u8(&long),
            Err(DataError::InvalidStringLength { length: 256, .. })
        ));
        assert!(writer.is_empty());
    }
}
