use isle_data::{ByteCursor, ByteWriter};

use crate::error::Result;
use crate::keyframe::{MorphKey, RotationKey, ScaleKey, TranslationKey, read_keys, write_keys};

/// One node of an animation tree. Children are owned by their parent.
///
/// Layout: `nameLen:u32[, name]`, four `u16`-counted keyframe lists
/// (translation, rotation, scale, morph) and `childCount:u32` children.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TreeNode {
    /// Track name, `None` for unnamed grouping nodes
    pub name: Option<String>,
    pub translation_keys: Vec<TranslationKey>,
    pub rotation_keys: Vec<RotationKey>,
    pub scale_keys: Vec<ScaleKey>,
    pub morph_keys: Vec<MorphKey>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let name = cursor.read_str_u32()?;
        let name = (!name.is_empty()).then_some(name);

        let translation_keys = read_keys(cursor)?;
        let rotation_keys = read_keys(cursor)?;
        let scale_keys = read_keys(cursor)?;
        let morph_keys = read_keys(cursor)?;

        let child_count = cursor.read_u32()?;
        let mut children = Vec::new();
        for _ in 0..child_count {
            children.push(Self::read(cursor)?);
        }

        Ok(Self {
            name,
            translation_keys,
            rotation_keys,
            scale_keys,
            morph_keys,
            children,
        })
    }

    pub fn write(&self, writer: &mut ByteWriter) -> Result<()> {
        writer.put_str_u32(self.name.as_deref().unwrap_or(""))?;
        write_keys(writer, &self.translation_keys)?;
        write_keys(writer, &self.rotation_keys)?;
        write_keys(writer, &self.scale_keys)?;
        write_keys(writer, &self.morph_keys)?;

        writer.put_u32(self.children.len() as u32);
        for child in &self.children {
            child.write(writer)?;
        }
        Ok(())
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Total keyframes across all four lists of this node only.
    pub fn key_count(&self) -> usize {
        self.translation_keys.len()
            + self.rotation_keys.len()
            + self.scale_keys.len()
            + self.morph_keys.len()
    }

    /// Depth-first search by name, case-insensitive.
    pub fn find(&self, name: &str) -> Option<&Self> {
        if self
            .name
            .as_deref()
            .is_some_and(|own| own.eq_ignore_ascii_case(name))
        {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }
}
