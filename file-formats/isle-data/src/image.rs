//! 8-bit paletted images as stored in world databases and save files.

use crate::cursor::ByteCursor;
use crate::error::{DataError, Result};
use crate::writer::ByteWriter;

/// Largest palette an image may carry.
pub const MAX_PALETTE_SIZE: u32 = 256;

/// One palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Paletted image: `width:u32, height:u32, paletteSize:u32`, RGB palette,
/// then `width * height` palette indices.
#[derive(Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PalettedImage {
    pub width: u32,
    pub height: u32,
    pub palette: Vec<Rgb>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub pixels: Vec<u8>,
}

impl std::fmt::Debug for PalettedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PalettedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("palette", &format_args!("{} entries", self.palette.len()))
            .field("pixels", &format_args!("{} bytes", self.pixels.len()))
            .finish()
    }
}

impl PalettedImage {
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let width = cursor.read_u32()?;
        let height = cursor.read_u32()?;

        let palette_offset = cursor.position();
        let palette_size = cursor.read_u32()?;
        if palette_size > MAX_PALETTE_SIZE {
            return Err(DataError::PaletteTooLarge {
                offset: palette_offset,
                size: palette_size,
            });
        }

        let mut palette = Vec::with_capacity(palette_size as usize);
        for _ in 0..palette_size {
            let rgb = cursor.read_bytes(3)?;
            palette.push(Rgb::new(rgb[0], rgb[1], rgb[2]));
        }

        let pixel_count = width as usize * height as usize;
        let pixels = cursor.read_bytes(pixel_count)?.to_vec();

        Ok(Self {
            width,
            height,
            palette,
            pixels,
        })
    }

    pub fn write(&self, writer: &mut ByteWriter) {
        writer.put_u32(self.width);
        writer.put_u32(self.height);
        writer.put_u32(self.palette.len() as u32);
        for entry in &self.palette {
            writer.put_bytes(&[entry.r, entry.g, entry.b]);
        }
        writer.put_bytes(&self.pixels);
    }

    /// Serialized size in bytes.
    pub fn encoded_len(&self) -> usize {
        12 + self.palette.len() * 3 + self.pixels.len()
    }

    /// Expand to packed RGB triples. Indices past the palette map to black.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for &index in &self.pixels {
            let entry = self.palette.get(index as usize).copied().unwrap_or_default();
            out.extend_from_slice(&[entry.r, entry.g, entry.b]);
        }
        out
    }
}
