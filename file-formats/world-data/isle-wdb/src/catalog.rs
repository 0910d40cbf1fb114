//! World catalog: the table of contents at the start of `WORLD.WDB`.

use glam::Vec3;
use isle_data::{ByteCursor, ByteWriter};

use crate::error::{Result, WdbError};

/// Reference to a part data block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PartRef {
    pub name: String,
    pub data_length: u32,
    pub data_offset: u32,
}

/// Placement of a model in its world.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Transform {
    pub location: Vec3,
    pub direction: Vec3,
    pub up: Vec3,
}

/// Reference to a model data block plus its placement.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ModelRef {
    pub name: String,
    pub data_length: u32,
    pub data_offset: u32,
    pub presenter: String,
    pub transform: Transform,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WorldEntry {
    pub name: String,
    pub parts: Vec<PartRef>,
    pub models: Vec<ModelRef>,
}

impl WorldEntry {
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let name = cursor.read_str_i32()?;

        let part_count = read_count(cursor, "part")?;
        let mut parts = Vec::new();
        for _ in 0..part_count {
            parts.push(PartRef {
                name: cursor.read_str_i32()?,
                data_length: cursor.read_u32()?,
                data_offset: cursor.read_u32()?,
            });
        }

        let model_count = read_count(cursor, "model")?;
        let mut models = Vec::new();
        for _ in 0..model_count {
            let name = cursor.read_str_i32()?;
            let data_length = cursor.read_u32()?;
            let data_offset = cursor.read_u32()?;
            let presenter = cursor.read_str_i32()?;
            let transform = Transform {
                location: cursor.read_vec3()?,
                direction: cursor.read_vec3()?,
                up: cursor.read_vec3()?,
            };
            let visible = cursor.read_bool()?;
            models.push(ModelRef {
                name,
                data_length,
                data_offset,
                presenter,
                transform,
                visible,
            });
        }

        log::trace!(
            "World '{}': {} parts, {} models",
            name,
            parts.len(),
            models.len()
        );
        Ok(Self {
            name,
            parts,
            models,
        })
    }

    /// Write the entry, returning the positions of every `dataOffset` field
    /// (parts first, then models) so callers can patch them.
    pub fn write(&self, writer: &mut ByteWriter) -> Result<Vec<usize>> {
        let mut offset_slots = Vec::with_capacity(self.parts.len() + self.models.len());
        writer.put_str_i32(&self.name)?;

        writer.put_i32(self.parts.len() as i32);
        for part in &self.parts {
            writer.put_str_i32(&part.name)?;
            writer.put_u32(part.data_length);
            offset_slots.push(writer.tell());
            writer.put_u32(part.data_offset);
        }

        writer.put_i32(self.models.len() as i32);
        for model in &self.models {
            writer.put_str_i32(&model.name)?;
            writer.put_u32(model.data_length);
            offset_slots.push(writer.tell());
            writer.put_u32(model.data_offset);
            writer.put_str_i32(&model.presenter)?;
            writer.put_vec3(model.transform.location);
            writer.put_vec3(model.transform.direction);
            writer.put_vec3(model.transform.up);
            writer.put_bool(model.visible);
        }
        Ok(offset_slots)
    }
}

pub(crate) fn read_count(cursor: &mut ByteCursor<'_>, kind: &'static str) -> Result<u32> {
    let count = cursor.read_i32()?;
    u32::try_from(count).map_err(|_| WdbError::NegativeCount { kind, count })
}
