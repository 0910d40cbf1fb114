use isle_data::ByteCursor;

use crate::block::PartData;
use crate::catalog::{ModelRef, PartRef, WorldEntry, read_count};
use crate::error::Result;
use crate::lod::Lod;
use crate::roi::Roi;
use crate::texture::{Texture, read_part_textures};

/// Parsed `WORLD.WDB` catalog plus the global texture and part blocks.
///
/// Model and part data blocks referenced from the catalog are read on
/// demand with [`ModelData::read_from`](crate::ModelData::read_from) and
/// [`PartData::read_from`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WdbFile {
    pub worlds: Vec<WorldEntry>,
    pub global_textures: Vec<Texture>,
    pub global_parts: Option<PartData>,
}

impl WdbFile {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);

        let world_count = read_count(&mut cursor, "world")?;
        let mut worlds = Vec::new();
        for _ in 0..world_count {
            worlds.push(WorldEntry::read(&mut cursor)?);
        }
        log::debug!(
            "Catalog: {} worlds, ends at {:#x}",
            worlds.len(),
            cursor.position()
        );

        let global_textures = match read_optional_block(&mut cursor)? {
            Some(body) => read_part_textures(&mut ByteCursor::new(body))?,
            None => Vec::new(),
        };
        let global_parts = read_optional_block(&mut cursor)?
            .map(PartData::parse)
            .transpose()?;

        Ok(Self {
            worlds,
            global_textures,
            global_parts,
        })
    }

    /// Look a model up across all worlds, case-insensitive.
    pub fn find_model(&self, name: &str) -> Option<(&WorldEntry, &ModelRef)> {
        self.worlds.iter().find_map(|world| {
            world
                .models
                .iter()
                .find(|model| model.name.eq_ignore_ascii_case(name))
                .map(|model| (world, model))
        })
    }

    /// Look a part up across all worlds, case-insensitive.
    pub fn find_part(&self, name: &str) -> Option<(&WorldEntry, &PartRef)> {
        self.worlds.iter().find_map(|world| {
            world
                .parts
                .iter()
                .find(|part| part.name.eq_ignore_ascii_case(name))
                .map(|part| (world, part))
        })
    }

    /// LODs to render for `roi`: its own list, or for shared ROIs the global
    /// part named by [`lod_lookup_name`]. `None` when a shared ROI has no
    /// matching global part.
    pub fn resolve_lods<'a>(&'a self, roi: &'a Roi) -> Option<&'a [Lod]> {
        if !roi.shared_lod_list {
            return Some(roi.lods.as_slice());
        }
        let lookup = lod_lookup_name(&roi.name);
        let resolved = self
            .global_parts
            .as_ref()
            .and_then(|parts| parts.find(lookup))
            .map(|part| part.lods.as_slice());
        if resolved.is_none() {
            log::debug!("No global part '{}' for shared ROI '{}'", lookup, roi.name);
        }
        resolved
    }

    pub fn model_count(&self) -> usize {
        self.worlds.iter().map(|world| world.models.len()).sum()
    }

    pub fn part_count(&self) -> usize {
        self.worlds.iter().map(|world| world.parts.len()).sum()
    }
}

/// Name under which a shared ROI's LODs are stored: the ROI name with all
/// trailing ASCII digits removed.
///
/// ```
/// use isle_wdb::lod_lookup_name;
///
/// assert_eq!(lod_lookup_name("wheel12"), "wheel");
/// assert_eq!(lod_lookup_name("bike"), "bike");
/// ```
pub fn lod_lookup_name(roi_name: &str) -> &str {
    roi_name.trim_end_matches(|c: char| c.is_ascii_digit())
}

/// `size:u32` then `size` bytes; a missing size word counts as zero.
fn read_optional_block<'a>(cursor: &mut ByteCursor<'a>) -> Result<Option<&'a [u8]>> {
    if cursor.remaining() < 4 {
        return Ok(None);
    }
    let size = cursor.read_u32()? as usize;
    if size == 0 {
        return Ok(None);
    }
    Ok(Some(cursor.read_bytes(size)?))
}
