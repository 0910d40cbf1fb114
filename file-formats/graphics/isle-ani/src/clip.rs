use glam::Vec3;
use isle_data::{ByteCursor, ByteWriter};

use crate::error::{AniError, Result};
use crate::keyframe::{RollKey, TranslationKey, read_keys, write_keys};
use crate::tree::TreeNode;

/// Magic word opening every standalone `.ani` file
pub const ANI_MAGIC: i32 = 0x11;

/// Header fields present only in standalone clips
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ClipHeader {
    pub bounding_radius: f32,
    pub center: Vec3,
}

/// Actor table entry. An empty name is a placeholder slot with no type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ActorBinding {
    pub name: String,
    pub actor_type: u32,
}

impl ActorBinding {
    pub fn is_placeholder(&self) -> bool {
        self.name.is_empty()
    }
}

/// Camera track of a standalone clip
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CameraTrack {
    pub translation_keys: Vec<TranslationKey>,
    pub target_keys: Vec<TranslationKey>,
    pub rotation_keys: Vec<RollKey>,
}

impl CameraTrack {
    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Self {
            translation_keys: read_keys(cursor)?,
            target_keys: read_keys(cursor)?,
            rotation_keys: read_keys(cursor)?,
        })
    }

    fn write(&self, writer: &mut ByteWriter) -> Result<()> {
        write_keys(writer, &self.translation_keys)?;
        write_keys(writer, &self.target_keys)?;
        write_keys(writer, &self.rotation_keys)
    }
}

/// A parsed skeletal animation clip.
///
/// Standalone files start with [`ANI_MAGIC`] and a [`ClipHeader`]; the
/// variant embedded in world database models starts directly at the actor
/// table and never carries a camera track.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnimationClip {
    /// `None` for embedded trees
    pub header: Option<ClipHeader>,
    pub actors: Vec<ActorBinding>,
    /// Duration in milliseconds
    pub duration: i32,
    pub camera: Option<CameraTrack>,
    pub root: TreeNode,
}

impl AnimationClip {
    /// Parse a standalone `.ani` file.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);
        Self::read(&mut cursor)
    }

    /// Read a standalone clip from the cursor position.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let magic = cursor.read_i32()?;
        if magic != ANI_MAGIC {
            return Err(AniError::InvalidMagic {
                expected: ANI_MAGIC,
                actual: magic,
            });
        }

        let bounding_radius = cursor.read_f32()?;
        let center = cursor.read_vec3()?;
        let has_camera_anim = cursor.read_i32()? != 0;

        let (actors, duration) = read_actor_table(cursor)?;
        let camera = if has_camera_anim {
            Some(CameraTrack::read(cursor)?)
        } else {
            None
        };
        let root = TreeNode::read(cursor)?;

        log::debug!(
            "Parsed animation clip: {} actors, {} nodes, {} ms",
            actors.len(),
            root.node_count(),
            duration
        );

        Ok(Self {
            header: Some(ClipHeader {
                bounding_radius,
                center,
            }),
            actors,
            duration,
            camera,
            root,
        })
    }

    /// Read the header-less tree embedded in a model data block.
    pub fn read_embedded(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let (actors, duration) = read_actor_table(cursor)?;
        let root = TreeNode::read(cursor)?;
        Ok(Self {
            header: None,
            actors,
            duration,
            camera: None,
            root,
        })
    }

    /// Serialize in the variant matching `header`.
    pub fn write(&self, writer: &mut ByteWriter) -> Result<()> {
        match &self.header {
            Some(header) => {
                writer.put_i32(ANI_MAGIC);
                writer.put_f32(header.bounding_radius);
                writer.put_vec3(header.center);
                writer.put_i32(i32::from(self.camera.is_some()));
            }
            None if self.camera.is_some() => return Err(AniError::CameraWithoutHeader),
            None => {}
        }

        writer.put_u32(self.actors.len() as u32);
        for actor in &self.actors {
            writer.put_str_u32(&actor.name)?;
            if !actor.is_placeholder() {
                writer.put_u32(actor.actor_type);
            }
        }
        writer.put_i32(self.duration);

        if let Some(camera) = &self.camera {
            camera.write(writer)?;
        }
        self.root.write(writer)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ByteWriter::new();
        self.write(&mut writer)?;
        Ok(writer.into_bytes())
    }

    pub fn is_embedded(&self) -> bool {
        self.header.is_none()
    }

    /// Names of all non-placeholder actor bindings.
    pub fn actor_names(&self) -> impl Iterator<Item = &str> {
        self.actors
            .iter()
            .filter(|actor| !actor.is_placeholder())
            .map(|actor| actor.name.as_str())
    }
}

fn read_actor_table(cursor: &mut ByteCursor<'_>) -> Result<(Vec<ActorBinding>, i32)> {
    let count = cursor.read_u32()?;
    let mut actors = Vec::new();
    for _ in 0..count {
        let name = cursor.read_str_u32()?;
        let actor_type = if name.is_empty() {
            0
        } else {
            cursor.read_u32()?
        };
        actors.push(ActorBinding { name, actor_type });
    }
    let duration = cursor.read_i32()?;
    Ok((actors, duration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::{KeyTime, Keyframe};

    fn key(time: u32) -> KeyTime {
        KeyTime::new(time, 0).unwrap()
    }

    #[test]
    fn test_embedded_has_no_header_bytes() {
        let clip = AnimationClip {
            duration: 1000,
            ..AnimationClip::default()
        };
        let bytes = clip.to_bytes().unwrap();

        // actor count, duration, then an empty root node
        assert_eq!(&bytes[..8], &[0, 0, 0, 0, 0xe8, 0x03, 0, 0]);
        assert_eq!(bytes.len(), 8 + 16);

        let mut cursor = ByteCursor::new(&bytes);
        let parsed = AnimationClip::read_embedded(&mut cursor).unwrap();
        assert!(parsed.is_embedded());
        assert_eq!(parsed, clip);
    }

    #[test]
    fn test_standalone_with_camera() {
        let clip = AnimationClip {
            header: Some(ClipHeader {
                bounding_radius: 12.5,
                center: Vec3::new(1.0, 2.0, 3.0),
            }),
            actors: vec![
                ActorBinding {
                    name: "pepper".to_string(),
                    actor_type: 2,
                },
                ActorBinding::default(),
            ],
            duration: 4000,
            camera: Some(CameraTrack {
                translation_keys: vec![Keyframe::new(key(0), Vec3::X)],
                target_keys: vec![Keyframe::new(key(0), Vec3::ZERO)],
                rotation_keys: vec![Keyframe::new(key(100), 0.5)],
            }),
            root: TreeNode::named("pepper"),
        };

        let bytes = clip.to_bytes().unwrap();
        assert_eq!(&bytes[..4], &ANI_MAGIC.to_le_bytes());
        let parsed = AnimationClip::parse(&bytes).unwrap();
        assert_eq!(parsed, clip);
        assert_eq!(parsed.actor_names().collect::<Vec<_>>(), vec!["pepper"]);
    }

    #[test]
    fn test_bad_magic() {
        let bytes = 0x12i32.to_le_bytes();
        assert!(matches!(
            AnimationClip::parse(&bytes),
            Err(AniError::InvalidMagic {
                expected: 0x11,
                actual: 0x12
            })
        ));
    }

    #[test]
    fn test_camera_requires_header() {
        let clip = AnimationClip {
            camera: Some(CameraTrack::default()),
            ..AnimationClip::default()
        };
        assert!(matches!(
            clip.to_bytes(),
            Err(AniError::CameraWithoutHeader)
        ));
    }

    #[test]
    fn test_truncated_clip_is_fatal() {
        let mut bytes = AnimationClip {
            header: Some(ClipHeader::default()),
            ..AnimationClip::default()
        }
        .to_bytes()
        .unwrap();
        bytes.truncate(bytes.len() - 1);
        assert!(matches!(
            AnimationClip::parse(&bytes),
            Err(AniError::Data(isle_data::DataError::OutOfBounds { .. }))
        ));
    }
}
