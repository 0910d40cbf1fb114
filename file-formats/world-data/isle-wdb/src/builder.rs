//! Assemble complete world database files from blocks.

use isle_data::ByteWriter;

use crate::block::{ModelData, PartData};
use crate::catalog::{ModelRef, PartRef, Transform, WorldEntry};
use crate::error::{Result, WdbError};
use crate::file::WdbFile;
use crate::texture::{Texture, write_part_textures};

/// A model placed in a world together with its data block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlacedModel {
    pub name: String,
    pub presenter: String,
    pub transform: Transform,
    pub visible: bool,
    pub data: ModelData,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorldBuilder {
    name: String,
    parts: Vec<(String, PartData)>,
    models: Vec<PlacedModel>,
}

impl WorldBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn part(mut self, name: &str, data: PartData) -> Self {
        self.parts.push((name.to_string(), data));
        self
    }

    pub fn model(mut self, model: PlacedModel) -> Self {
        self.models.push(model);
        self
    }
}

/// Lays out a file as catalog, global textures, global parts and then every
/// data block in catalog order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WdbBuilder {
    worlds: Vec<WorldBuilder>,
    global_textures: Vec<Texture>,
    global_parts: Option<PartData>,
}

impl WdbBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-read every block referenced by `file` into a builder.
    pub fn from_file(file: &WdbFile, data: &[u8]) -> Result<Self> {
        let mut builder = Self {
            global_textures: file.global_textures.clone(),
            global_parts: file.global_parts.clone(),
            ..Self::default()
        };
        for world in &file.worlds {
            let mut entry = WorldBuilder::new(&world.name);
            for part in &world.parts {
                entry = entry.part(&part.name, PartData::read_from(data, part)?);
            }
            for model in &world.models {
                entry = entry.model(PlacedModel {
                    name: model.name.clone(),
                    presenter: model.presenter.clone(),
                    transform: model.transform,
                    visible: model.visible,
                    data: ModelData::read_from(data, model)?,
                });
            }
            builder.worlds.push(entry);
        }
        Ok(builder)
    }

    pub fn world(mut self, world: WorldBuilder) -> Self {
        self.worlds.push(world);
        self
    }

    pub fn global_textures(mut self, textures: Vec<Texture>) -> Self {
        self.global_textures = textures;
        self
    }

    pub fn global_parts(mut self, parts: PartData) -> Self {
        self.global_parts = Some(parts);
        self
    }

    pub fn build(&self) -> Result<Vec<u8>> {
        let mut blocks = Vec::new();
        let mut entries = Vec::with_capacity(self.worlds.len());
        for world in &self.worlds {
            let mut entry = WorldEntry {
                name: world.name.clone(),
                ..WorldEntry::default()
            };
            for (name, data) in &world.parts {
                let block = data.to_bytes()?;
                entry.parts.push(PartRef {
                    name: name.clone(),
                    data_length: block_len(&block)?,
                    data_offset: 0,
                });
                blocks.push(block);
            }
            for model in &world.models {
                let block = model.data.to_bytes()?;
                entry.models.push(ModelRef {
                    name: model.name.clone(),
                    data_length: block_len(&block)?,
                    data_offset: 0,
                    presenter: model.presenter.clone(),
                    transform: model.transform,
                    visible: model.visible,
                });
                blocks.push(block);
            }
            entries.push(entry);
        }

        let mut writer = ByteWriter::new();
        writer.put_i32(entries.len() as i32);
        let mut offset_slots = Vec::with_capacity(blocks.len());
        for entry in &entries {
            offset_slots.extend(entry.write(&mut writer)?);
        }

        if self.global_textures.is_empty() {
            writer.put_u32(0);
        } else {
            let mut body = ByteWriter::new();
            write_part_textures(&mut body, &self.global_textures)?;
            let body = body.into_bytes();
            writer.put_u32(block_len(&body)?);
            writer.put_bytes(&body);
        }

        match &self.global_parts {
            Some(parts) => {
                let body = parts.to_bytes()?;
                writer.put_u32(block_len(&body)?);
                writer.put_bytes(&body);
            }
            None => writer.put_u32(0),
        }

        for (slot, block) in offset_slots.into_iter().zip(&blocks) {
            let offset = block_len_at(writer.tell())?;
            writer.put_bytes(block);
            let end = writer.tell();
            writer.seek(slot);
            writer.put_u32(offset);
            writer.seek(end);
        }

        Ok(writer.into_bytes())
    }
}

fn block_len(block: &[u8]) -> Result<u32> {
    block_len_at(block.len())
}

fn block_len_at(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| WdbError::TooMany {
        kind: "file bytes",
        count: len,
    })
}
