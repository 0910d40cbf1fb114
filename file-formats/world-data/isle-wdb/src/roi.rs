use glam::Vec3;
use isle_data::{ByteCursor, ByteWriter};

use crate::error::{Result, WdbError};
use crate::lod::{Lod, non_empty};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

/// A named 3D sub-assembly node. Children are owned by their parent.
///
/// ROIs with `shared_lod_list` set carry no local LODs; see
/// [`WdbFile::resolve_lods`](crate::WdbFile::resolve_lods).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Roi {
    pub name: String,
    pub bounding_sphere: BoundingSphere,
    pub bounding_box: BoundingBox,
    pub texture_name: Option<String>,
    pub shared_lod_list: bool,
    pub lods: Vec<Lod>,
    pub children: Vec<Roi>,
}

impl Roi {
    /// Read a ROI subtree. `lodsEndOffset` values are positions in the
    /// cursor's buffer, so the cursor must span exactly the enclosing block.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let name = cursor.read_str_u32()?;
        let bounding_sphere = BoundingSphere {
            center: cursor.read_vec3()?,
            radius: cursor.read_f32()?,
        };
        let bounding_box = BoundingBox {
            min: cursor.read_vec3()?,
            max: cursor.read_vec3()?,
        };
        let texture_name = non_empty(cursor.read_str_u32()?);
        let shared_lod_list = cursor.read_bool()?;

        let mut lods = Vec::new();
        if !shared_lod_list {
            let lod_count = cursor.read_u32()?;
            if lod_count > 0 {
                let lods_end = cursor.read_u32()? as usize;
                for _ in 0..lod_count {
                    lods.push(Lod::read(cursor)?);
                }
                if lods_end < cursor.position() {
                    return Err(WdbError::InvalidEndOffset {
                        name,
                        offset: lods_end,
                        position: cursor.position(),
                    });
                }
                if cursor.position() != lods_end {
                    log::warn!(
                        "ROI '{}': LOD list ended at {:#x}, end offset says {:#x}",
                        name,
                        cursor.position(),
                        lods_end
                    );
                }
                cursor.seek(lods_end);
            }
        }

        let child_count = cursor.read_u32()?;
        let mut children = Vec::new();
        for _ in 0..child_count {
            children.push(Self::read(cursor)?);
        }

        Ok(Self {
            name,
            bounding_sphere,
            bounding_box,
            texture_name,
            shared_lod_list,
            lods,
            children,
        })
    }

    /// Write the subtree; the writer position is the block-relative offset.
    pub fn write(&self, writer: &mut ByteWriter) -> Result<()> {
        writer.put_str_u32(&self.name)?;
        writer.put_vec3(self.bounding_sphere.center);
        writer.put_f32(self.bounding_sphere.radius);
        writer.put_vec3(self.bounding_box.min);
        writer.put_vec3(self.bounding_box.max);
        writer.put_str_u32(self.texture_name.as_deref().unwrap_or(""))?;
        writer.put_bool(self.shared_lod_list);

        if !self.shared_lod_list {
            writer.put_u32(self.lods.len() as u32);
            if !self.lods.is_empty() {
                let end_slot = writer.tell();
                writer.put_u32(0);
                for lod in &self.lods {
                    lod.write(writer)?;
                }
                patch_offset(writer, end_slot)?;
            }
        } else if !self.lods.is_empty() {
            log::warn!(
                "ROI '{}' is shared; its {} local LODs are not written",
                self.name,
                self.lods.len()
            );
        }

        writer.put_u32(self.children.len() as u32);
        self.children.iter().try_for_each(|child| child.write(writer))
    }

    /// Number of ROIs in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Depth-first search by name, case-insensitive.
    pub fn find(&self, name: &str) -> Option<&Self> {
        if self.name.eq_ignore_ascii_case(name) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }
}

/// Store the current position into the `u32` slot at `slot` and return to
/// the end.
pub(crate) fn patch_offset(writer: &mut ByteWriter, slot: usize) -> Result<()> {
    let end = writer.tell();
    let offset = u32::try_from(end).map_err(|_| WdbError::TooMany {
        kind: "block bytes",
        count: end,
    })?;
    writer.seek(slot);
    writer.put_u32(offset);
    writer.seek(end);
    Ok(())
}
