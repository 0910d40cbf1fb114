//! Part and model data blocks.
//!
//! All offsets stored inside a block are relative to the block start, so
//! each block is read through a cursor spanning exactly its bytes.

use isle_ani::AnimationClip;
use isle_data::{ByteCursor, ByteWriter};

use crate::catalog::{ModelRef, PartRef};
use crate::error::{Result, WdbError};
use crate::lod::Lod;
use crate::roi::{Roi, patch_offset};
use crate::texture::{
    Texture, read_model_textures, read_part_textures, write_model_textures, write_part_textures,
};

/// Version tag every model data block starts with.
pub const MODEL_DATA_VERSION: u32 = 19;

/// Named LOD list inside a part block.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PartRoi {
    pub name: String,
    pub lods: Vec<Lod>,
}

/// A part data block: reusable LOD lists plus their textures.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PartData {
    pub textures: Vec<Texture>,
    pub rois: Vec<PartRoi>,
}

impl PartData {
    pub fn parse(block: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(block);
        let texture_info_offset = cursor.read_u32()? as usize;

        cursor.seek(texture_info_offset);
        let textures = read_part_textures(&mut cursor)?;

        cursor.seek(4);
        let roi_count = cursor.read_u32()?;
        let mut rois = Vec::new();
        for _ in 0..roi_count {
            let name = cursor.read_str_u32()?;
            let lod_count = cursor.read_u32()?;
            let roi_end = cursor.read_u32()? as usize;
            let mut lods = Vec::new();
            for _ in 0..lod_count {
                lods.push(Lod::read(&mut cursor)?);
            }
            if roi_end < cursor.position() {
                return Err(WdbError::InvalidEndOffset {
                    name,
                    offset: roi_end,
                    position: cursor.position(),
                });
            }
            if cursor.position() != roi_end {
                log::warn!(
                    "Part ROI '{}': LODs ended at {:#x}, end offset says {:#x}",
                    name,
                    cursor.position(),
                    roi_end
                );
            }
            cursor.seek(roi_end);
            rois.push(PartRoi { name, lods });
        }

        log::debug!(
            "Parsed part block: {} ROIs, {} textures",
            rois.len(),
            textures.len()
        );
        Ok(Self { textures, rois })
    }

    /// Read the block a catalog entry points at.
    pub fn read_from(file: &[u8], part: &PartRef) -> Result<Self> {
        Self::parse(block_slice(file, &part.name, part.data_offset, part.data_length)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ByteWriter::new();
        writer.put_u32(0);
        writer.put_u32(self.rois.len() as u32);
        for roi in &self.rois {
            writer.put_str_u32(&roi.name)?;
            writer.put_u32(roi.lods.len() as u32);
            let end_slot = writer.tell();
            writer.put_u32(0);
            for lod in &roi.lods {
                lod.write(&mut writer)?;
            }
            patch_offset(&mut writer, end_slot)?;
        }
        patch_offset(&mut writer, 0)?;
        write_part_textures(&mut writer, &self.textures)?;
        Ok(writer.into_bytes())
    }

    /// Case-insensitive lookup of a named LOD list.
    pub fn find(&self, name: &str) -> Option<&PartRoi> {
        self.rois
            .iter()
            .find(|roi| roi.name.eq_ignore_ascii_case(name))
    }
}

/// A model data block: embedded animation, ROI tree and textures.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ModelData {
    pub animation: AnimationClip,
    pub roi: Roi,
    pub textures: Vec<Texture>,
    /// Opaque second count word of the model texture block
    pub skip_textures: u32,
}

impl ModelData {
    pub fn parse(block: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(block);
        let version = cursor.read_u32()?;
        if version != MODEL_DATA_VERSION {
            return Err(WdbError::UnsupportedModelVersion {
                expected: MODEL_DATA_VERSION,
                actual: version,
            });
        }
        let texture_info_offset = cursor.read_u32()? as usize;

        let animation = AnimationClip::read_embedded(&mut cursor)?;
        let roi = Roi::read(&mut cursor)?;

        cursor.seek(texture_info_offset);
        let (textures, skip_textures) = read_model_textures(&mut cursor)?;

        log::debug!(
            "Parsed model block '{}': {} ROIs, {} textures",
            roi.name,
            roi.node_count(),
            textures.len()
        );
        Ok(Self {
            animation,
            roi,
            textures,
            skip_textures,
        })
    }

    pub fn read_from(file: &[u8], model: &ModelRef) -> Result<Self> {
        Self::parse(block_slice(
            file,
            &model.name,
            model.data_offset,
            model.data_length,
        )?)
    }

    /// Serialize the block. The animation is always written header-less.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ByteWriter::new();
        writer.put_u32(MODEL_DATA_VERSION);
        writer.put_u32(0);
        let embedded = AnimationClip {
            header: None,
            camera: None,
            ..self.animation.clone()
        };
        embedded.write(&mut writer)?;
        self.roi.write(&mut writer)?;
        patch_offset(&mut writer, 4)?;
        write_model_textures(&mut writer, &self.textures, self.skip_textures)?;
        Ok(writer.into_bytes())
    }
}

fn block_slice<'a>(file: &'a [u8], name: &str, offset: u32, length: u32) -> Result<&'a [u8]> {
    let start = offset as usize;
    start
        .checked_add(length as usize)
        .and_then(|end| file.get(start..end))
        .ok_or_else(|| WdbError::BlockOutOfRange {
            name: name.to_string(),
            offset,
            length,
            file_len: file.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use isle_ani::TreeNode;
    use isle_data::PalettedImage;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_model_version_mismatch_is_fatal() {
        let mut block = ModelData::default().to_bytes().unwrap();
        block[0] = 18;
        assert!(matches!(
            ModelData::parse(&block),
            Err(WdbError::UnsupportedModelVersion {
                expected: 19,
                actual: 18
            })
        ));
    }

    #[test]
    fn test_model_block_write_then_parse() {
        let model = ModelData {
            animation: AnimationClip {
                duration: 500,
                root: TreeNode::named("car"),
                ..AnimationClip::default()
            },
            roi: Roi {
                name: "car".to_string(),
                lods: vec![Lod::default()],
                ..Roi::default()
            },
            textures: vec![Texture::new(
                "tire.gif",
                PalettedImage {
                    width: 1,
                    height: 1,
                    palette: vec![Default::default()],
                    pixels: vec![0],
                },
            )],
            skip_textures: 0,
        };
        let block = model.to_bytes().unwrap();
        assert_eq!(ModelData::parse(&block).unwrap(), model);
    }

    #[test]
    fn test_part_block_write_then_parse() {
        let part = PartData {
            textures: Vec::new(),
            rois: vec![
                PartRoi {
                    name: "wheel".to_string(),
                    lods: vec![Lod {
                        flags: 4,
                        vertices: vec![Vec3::ZERO],
                        normals: vec![Vec3::Y],
                        ..Lod::default()
                    }],
                },
                PartRoi {
                    name: "axle".to_string(),
                    lods: Vec::new(),
                },
            ],
        };
        let block = part.to_bytes().unwrap();
        let parsed = PartData::parse(&block).unwrap();
        // meshless LODs drop their vertex arrays on disk
        assert_eq!(parsed.rois[0].lods[0].vertices, Vec::<Vec3>::new());
        assert_eq!(parsed.rois[1], part.rois[1]);
        assert!(parsed.find("WHEEL").is_some());
    }

    #[test]
    fn test_block_outside_file() {
        let file = [0u8; 16];
        let part = PartRef {
            name: "late".to_string(),
            data_length: 8,
            data_offset: 12,
        };
        assert!(matches!(
            PartData::read_from(&file, &part),
            Err(WdbError::BlockOutOfRange { offset: 12, .. })
        ));
    }

    #[test]
    fn test_backward_part_roi_end_offset_is_rejected() {
        let part = PartData {
            textures: Vec::new(),
            rois: vec![PartRoi {
                name: "wheel".to_string(),
                lods: vec![Lod::default()],
            }],
        };
        let mut block = part.to_bytes().unwrap();

        // texture offset, ROI count, name, LOD count, then the end offset
        let slot = 4 + 4 + 4 + 5 + 4;
        block[slot..slot + 4].copy_from_slice(&8u32.to_le_bytes());
        assert!(matches!(
            PartData::parse(&block),
            Err(WdbError::InvalidEndOffset { ref name, offset: 8, position: 33 }) if name == "wheel"
        ));
    }
}
