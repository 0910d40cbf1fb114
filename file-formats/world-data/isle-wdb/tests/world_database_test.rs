//! Integration tests for world database parsing

use glam::{Vec2, Vec3};
use isle_ani::{AnimationClip, KeyTime, Keyframe, TreeNode};
use isle_data::{PalettedImage, Rgb};
use isle_wdb::lod::NEW_VERTEX_FLAG;
use isle_wdb::*;
use pretty_assertions::assert_eq;

fn swatch(width: u32, height: u32) -> PalettedImage {
    PalettedImage {
        width,
        height,
        palette: vec![Rgb::new(255, 0, 0), Rgb::new(0, 0, 255)],
        pixels: (0..width * height).map(|i| (i % 2) as u8).collect(),
    }
}

fn triangle_lod() -> Lod {
    let corner = |position: u32| NEW_VERTEX_FLAG | position;
    Lod {
        flags: 0,
        vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        normals: vec![Vec3::Z],
        uvs: vec![Vec2::ZERO, Vec2::X, Vec2::Y],
        meshes: vec![Mesh {
            vertex_count: 3,
            polygons: vec![[corner(0), corner(1), corner(2)]],
            texture_indices: vec![[0, 1, 2]],
            properties: MeshProperties {
                color: Rgb::new(255, 255, 0),
                texture_name: Some("top.gif".to_string()),
                ..MeshProperties::default()
            },
        }],
    }
}

fn pizza_model() -> ModelData {
    let mut root = TreeNode::named("pizza");
    root.translation_keys
        .push(Keyframe::new(KeyTime::new(40, 0).unwrap(), Vec3::Y));
    ModelData {
        animation: AnimationClip {
            duration: 40,
            root,
            ..AnimationClip::default()
        },
        roi: Roi {
            name: "pizza".to_string(),
            bounding_sphere: BoundingSphere {
                center: Vec3::ZERO,
                radius: 1.5,
            },
            texture_name: Some("top.gif".to_string()),
            lods: vec![triangle_lod()],
            children: vec![Roi {
                name: "wheel2".to_string(),
                shared_lod_list: true,
                ..Roi::default()
            }],
            ..Roi::default()
        },
        textures: vec![Texture {
            name: "top.gif".to_string(),
            hi_res: true,
            image: swatch(4, 2),
        }],
        skip_textures: 0,
    }
}

fn global_parts() -> PartData {
    PartData {
        textures: vec![Texture::new("rubber.gif", swatch(1, 1))],
        rois: vec![PartRoi {
            name: "wheel".to_string(),
            lods: vec![triangle_lod(), Lod::default()],
        }],
    }
}

fn sample_builder() -> WdbBuilder {
    WdbBuilder::new()
        .world(
            WorldBuilder::new("ACT1")
                .part("b_wheel", global_parts())
                .model(PlacedModel {
                    name: "pizza".to_string(),
                    presenter: "LegoModelPresenter".to_string(),
                    transform: Transform {
                        location: Vec3::new(10.0, 0.0, -4.0),
                        direction: Vec3::Z,
                        up: Vec3::Y,
                    },
                    visible: true,
                    data: pizza_model(),
                }),
        )
        .world(WorldBuilder::new("ACT2M"))
        .global_textures(vec![Texture::new("sky.gif", swatch(2, 2))])
        .global_parts(global_parts())
}

#[test]
fn test_catalog_and_global_blocks() {
    let data = sample_builder().build().unwrap();
    let wdb = WdbFile::parse(&data).unwrap();

    assert_eq!(wdb.worlds.len(), 2);
    assert_eq!(wdb.worlds[1].name, "ACT2M");
    assert_eq!(wdb.model_count(), 1);
    assert_eq!(wdb.part_count(), 1);
    assert_eq!(wdb.global_textures[0].name, "sky.gif");
    assert_eq!(wdb.global_parts.as_ref(), Some(&global_parts()));

    let (world, model) = wdb.find_model("PIZZA").unwrap();
    assert_eq!(world.name, "ACT1");
    assert_eq!(model.presenter, "LegoModelPresenter");
    assert!(model.visible);
    assert!(wdb.find_part("B_Wheel").is_some());
}

#[test]
fn test_model_block_contents() {
    let data = sample_builder().build().unwrap();
    let wdb = WdbFile::parse(&data).unwrap();
    let (_, model) = wdb.find_model("pizza").unwrap();

    let block = ModelData::read_from(&data, model).unwrap();
    assert_eq!(block, pizza_model());
    assert_eq!(block.textures[0].name, "top.gif");
    assert!(block.animation.is_embedded());

    let lod = &block.roi.lods[0];
    let geometry = lod.mesh_geometry(&lod.meshes[0]).unwrap();
    assert_eq!(geometry.triangles, vec![[2, 1, 0]]);
    assert_eq!(geometry.positions, vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
    assert_eq!(geometry.uvs, vec![Vec2::ZERO, Vec2::X, Vec2::Y]);
}

#[test]
fn test_shared_child_uses_global_part_lods() {
    let data = sample_builder().build().unwrap();
    let wdb = WdbFile::parse(&data).unwrap();
    let (_, model) = wdb.find_model("pizza").unwrap();
    let block = ModelData::read_from(&data, model).unwrap();

    let wheel = block.roi.find("wheel2").unwrap();
    assert!(wheel.lods.is_empty());
    let lods = wdb.resolve_lods(wheel).unwrap();
    assert_eq!(lods.len(), 2);
    assert_eq!(lods[0], triangle_lod());
}

#[test]
fn test_unedited_rebuild_is_identical() {
    let data = sample_builder().build().unwrap();
    let wdb = WdbFile::parse(&data).unwrap();

    let rebuilt = WdbBuilder::from_file(&wdb, &data).unwrap().build().unwrap();
    assert_eq!(rebuilt, data);
    assert_eq!(WdbFile::parse(&rebuilt).unwrap(), wdb);
}

#[test]
fn test_truncated_file_is_fatal() {
    let data = sample_builder().build().unwrap();
    // cut inside the catalog
    assert!(matches!(
        WdbFile::parse(&data[..20]),
        Err(WdbError::Data(_))
    ));
}

#[test]
fn test_model_offset_past_end() {
    let data = sample_builder().build().unwrap();
    let wdb = WdbFile::parse(&data).unwrap();
    let (_, model) = wdb.find_model("pizza").unwrap();
    let mut moved = model.clone();
    moved.data_offset = data.len() as u32;
    assert!(matches!(
        ModelData::read_from(&data, &moved),
        Err(WdbError::BlockOutOfRange { .. })
    ));
}
