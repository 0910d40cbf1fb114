//! Integration tests for standalone and embedded animation clips

use glam::{Quat, Vec3};
use isle_ani::{
    ANI_MAGIC, ActorBinding, AniError, AnimationClip, KeyTime, Keyframe, TreeNode,
};
use isle_data::ByteCursor;
use pretty_assertions::assert_eq;

/// Hand-assembled standalone clip: one actor, one placeholder, no camera,
/// a root node with a single translated child.
fn standalone_bytes() -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&ANI_MAGIC.to_le_bytes());
    data.extend_from_slice(&5.0f32.to_le_bytes());
    for value in [0.0f32, 1.0, 2.0] {
        data.extend_from_slice(&value.to_le_bytes());
    }
    data.extend_from_slice(&0i32.to_le_bytes()); // no camera

    data.extend_from_slice(&2u32.to_le_bytes());
    data.extend_from_slice(&4u32.to_le_bytes());
    data.extend_from_slice(b"mama");
    data.extend_from_slice(&3u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes()); // placeholder, no type

    data.extend_from_slice(&2500i32.to_le_bytes());

    // root: unnamed, no keys, one child
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&[0u8; 8]);
    data.extend_from_slice(&1u32.to_le_bytes());

    // child "mama" with one translation key at t=100, flags=2
    data.extend_from_slice(&4u32.to_le_bytes());
    data.extend_from_slice(b"mama");
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&(100i32 | (2 << 24)).to_le_bytes());
    for value in [1.0f32, 0.0, -1.0] {
        data.extend_from_slice(&value.to_le_bytes());
    }
    data.extend_from_slice(&[0u8; 6]);
    data.extend_from_slice(&0u32.to_le_bytes());
    data
}

#[test]
fn test_parse_hand_built_standalone() {
    let clip = AnimationClip::parse(&standalone_bytes()).unwrap();

    let header = clip.header.unwrap();
    assert_eq!(header.bounding_radius, 5.0);
    assert_eq!(header.center, Vec3::new(0.0, 1.0, 2.0));
    assert!(clip.camera.is_none());
    assert_eq!(
        clip.actors,
        vec![
            ActorBinding {
                name: "mama".to_string(),
                actor_type: 3,
            },
            ActorBinding::default(),
        ]
    );
    assert_eq!(clip.duration, 2500);
    assert_eq!(clip.root.name, None);

    let child = clip.root.find("MAMA").unwrap();
    assert_eq!(child.translation_keys.len(), 1);
    assert_eq!(child.translation_keys[0].time, KeyTime { time: 100, flags: 2 });
    assert_eq!(child.translation_keys[0].value, Vec3::new(1.0, 0.0, -1.0));
}

#[test]
fn test_unedited_write_reparses_identically() {
    let original = standalone_bytes();
    let clip = AnimationClip::parse(&original).unwrap();
    let written = clip.to_bytes().unwrap();

    assert_eq!(written, original);
    assert_eq!(AnimationClip::parse(&written).unwrap(), clip);
}

#[test]
fn test_embedded_tree_followed_by_other_data() {
    let mut root = TreeNode::named("bike");
    root.rotation_keys.push(Keyframe::new(
        KeyTime::new(0x00ff_ffff, 0).unwrap(),
        Quat::from_xyzw(0.0, 0.0, 0.0, 1.0),
    ));
    root.scale_keys
        .push(Keyframe::new(KeyTime::default(), Vec3::ONE));
    let clip = AnimationClip {
        actors: vec![ActorBinding {
            name: "bike".to_string(),
            actor_type: 1,
        }],
        duration: 0,
        root,
        ..AnimationClip::default()
    };

    let mut bytes = clip.to_bytes().unwrap();
    let tree_len = bytes.len();
    bytes.extend_from_slice(&[0xaa; 8]);

    let mut cursor = ByteCursor::new(&bytes);
    let parsed = AnimationClip::read_embedded(&mut cursor).unwrap();
    assert_eq!(cursor.position(), tree_len);
    assert_eq!(parsed, clip);
}

#[test]
fn test_standalone_parse_rejects_embedded_layout() {
    let bytes = AnimationClip::default().to_bytes().unwrap();
    assert!(matches!(
        AnimationClip::parse(&bytes),
        Err(AniError::InvalidMagic { actual: 0, .. })
    ));
}

#[test]
fn test_truncated_keyframe_is_out_of_bounds() {
    let mut bytes = standalone_bytes();
    bytes.truncate(bytes.len() - 12);
    assert!(matches!(
        AnimationClip::parse(&bytes),
        Err(AniError::Data(_))
    ));
}
