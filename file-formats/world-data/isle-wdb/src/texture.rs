//! Named texture blocks shared by part and model data.

use isle_data::{ByteCursor, ByteWriter, DataError, PalettedImage};

use crate::error::{Result, WdbError};

/// Texture names starting with this marker carry a hi-res image followed by
/// a lo-res one.
pub const HI_RES_MARKER: char = '^';

/// A named paletted texture.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Texture {
    /// Name with any hi-res marker removed
    pub name: String,
    /// Set when the stored name carried the hi-res marker
    pub hi_res: bool,
    pub image: PalettedImage,
}

impl Texture {
    pub fn new(name: &str, image: PalettedImage) -> Self {
        Self {
            name: name.to_string(),
            hi_res: false,
            image,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width
    }

    pub fn height(&self) -> u32 {
        self.image.height
    }

    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let stored = cursor.read_str_u32()?;
        let (name, hi_res) = match stored.strip_prefix(HI_RES_MARKER) {
            Some(rest) => (rest.to_string(), true),
            None => (stored, false),
        };

        let image = read_image(cursor, &name)?;
        if hi_res {
            let lo_res = read_image(cursor, &name)?;
            log::trace!(
                "Discarding {}x{} lo-res variant of '{}'",
                lo_res.width,
                lo_res.height,
                name
            );
        }

        Ok(Self {
            name,
            hi_res,
            image,
        })
    }

    /// Write the texture entry. Hi-res textures get an empty lo-res image.
    pub fn write(&self, writer: &mut ByteWriter) -> Result<()> {
        if self.hi_res {
            writer.put_str_u32(&format!("{HI_RES_MARKER}{}", self.name))?;
        } else {
            writer.put_str_u32(&self.name)?;
        }
        self.image.write(writer);
        if self.hi_res {
            PalettedImage::default().write(writer);
        }
        Ok(())
    }
}

fn read_image(cursor: &mut ByteCursor<'_>, name: &str) -> Result<PalettedImage> {
    PalettedImage::read(cursor).map_err(|err| match err {
        DataError::PaletteTooLarge { size, .. } => WdbError::PaletteTooLarge {
            texture: name.to_string(),
            size,
        },
        other => other.into(),
    })
}

/// Part blocks store `count:u32` then entries.
pub fn read_part_textures(cursor: &mut ByteCursor<'_>) -> Result<Vec<Texture>> {
    let count = cursor.read_u32()?;
    read_entries(cursor, count)
}

/// Model blocks store `count:u32, skipTextures:u32` then entries.
pub fn read_model_textures(cursor: &mut ByteCursor<'_>) -> Result<(Vec<Texture>, u32)> {
    let count = cursor.read_u32()?;
    let skip_textures = cursor.read_u32()?;
    Ok((read_entries(cursor, count)?, skip_textures))
}

fn read_entries(cursor: &mut ByteCursor<'_>, count: u32) -> Result<Vec<Texture>> {
    let mut textures = Vec::new();
    for _ in 0..count {
        textures.push(Texture::read(cursor)?);
    }
    Ok(textures)
}

pub fn write_part_textures(writer: &mut ByteWriter, textures: &[Texture]) -> Result<()> {
    writer.put_u32(textures.len() as u32);
    textures.iter().try_for_each(|texture| texture.write(writer))
}

pub fn write_model_textures(
    writer: &mut ByteWriter,
    textures: &[Texture],
    skip_textures: u32,
) -> Result<()> {
    writer.put_u32(textures.len() as u32);
    writer.put_u32(skip_textures);
    textures.iter().try_for_each(|texture| texture.write(writer))
}
