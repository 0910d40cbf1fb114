//! Level-of-detail geometry: shared vertex arrays and the meshes that index
//! into them.

use glam::{Vec2, Vec3};
use isle_data::{ByteCursor, ByteWriter, Rgb};

use crate::error::{Result, WdbError};

/// Set on a packed corner index that introduces a new local vertex.
pub const NEW_VERTEX_FLAG: u32 = 0x8000_0000;

const COUNT_MASK: u32 = 0x7fff;
const NORMAL_COUNT_SHIFT: u32 = 17;

/// Unpack `vertexCount` (bits 0-14) and `normalCount` (bits 17-31).
pub fn unpack_vertex_normal_counts(packed: u32) -> (u32, u32) {
    (packed & COUNT_MASK, (packed >> NORMAL_COUNT_SHIFT) & COUNT_MASK)
}

pub fn pack_vertex_normal_counts(vertices: u32, normals: u32) -> u32 {
    (vertices & COUNT_MASK) | ((normals & COUNT_MASK) << NORMAL_COUNT_SHIFT)
}

/// Flat, Gouraud or wireframe shading as stored in mesh properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Shading {
    Flat,
    Gouraud,
    Wireframe,
    Other(u8),
}

impl From<u8> for Shading {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Flat,
            1 => Self::Gouraud,
            2 => Self::Wireframe,
            other => Self::Other(other),
        }
    }
}

impl From<Shading> for u8 {
    fn from(value: Shading) -> Self {
        match value {
            Shading::Flat => 0,
            Shading::Gouraud => 1,
            Shading::Wireframe => 2,
            Shading::Other(other) => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MeshProperties {
    pub color: Rgb,
    pub alpha: f32,
    pub shading: Shading,
    /// Three opaque flag bytes
    pub flags: [u8; 3],
    pub texture_name: Option<String>,
    pub material_name: Option<String>,
}

impl Default for MeshProperties {
    fn default() -> Self {
        Self {
            color: Rgb::default(),
            alpha: 1.0,
            shading: Shading::Gouraud,
            flags: [0; 3],
            texture_name: None,
            material_name: None,
        }
    }
}

impl MeshProperties {
    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let rgb = cursor.read_bytes(3)?;
        let color = Rgb::new(rgb[0], rgb[1], rgb[2]);
        let alpha = cursor.read_f32()?;
        let shading = Shading::from(cursor.read_u8()?);
        let flag_bytes = cursor.read_bytes(3)?;
        let flags = [flag_bytes[0], flag_bytes[1], flag_bytes[2]];
        let texture_name = non_empty(cursor.read_str_u32()?);
        let material_name = non_empty(cursor.read_str_u32()?);
        Ok(Self {
            color,
            alpha,
            shading,
            flags,
            texture_name,
            material_name,
        })
    }

    fn write(&self, writer: &mut ByteWriter) -> Result<()> {
        writer.put_bytes(&[self.color.r, self.color.g, self.color.b]);
        writer.put_f32(self.alpha);
        writer.put_u8(self.shading.into());
        writer.put_bytes(&self.flags);
        writer.put_str_u32(self.texture_name.as_deref().unwrap_or(""))?;
        writer.put_str_u32(self.material_name.as_deref().unwrap_or(""))?;
        Ok(())
    }
}

pub(crate) fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// One mesh of a LOD, kept in its packed on-disk form.
///
/// Use [`Lod::mesh_geometry`] for renderer-ready arrays.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Mesh {
    /// Local vertex count declared by the mesh header
    pub vertex_count: u16,
    /// Packed corner indices, one triple per polygon
    pub polygons: Vec<[u32; 3]>,
    /// Per-corner UV indices, empty for untextured meshes
    pub texture_indices: Vec<[u32; 3]>,
    pub properties: MeshProperties,
}

impl Mesh {
    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let polygon_count = cursor.read_u16()? as usize;
        let vertex_count = cursor.read_u16()?;

        let polygons = read_triples(cursor, polygon_count)?;
        let texture_index_count = cursor.read_u32()?;
        let texture_indices = if texture_index_count > 0 {
            read_triples(cursor, polygon_count)?
        } else {
            Vec::new()
        };
        let properties = MeshProperties::read(cursor)?;

        Ok(Self {
            vertex_count,
            polygons,
            texture_indices,
            properties,
        })
    }

    fn write(&self, writer: &mut ByteWriter) -> Result<()> {
        let polygon_count = u16::try_from(self.polygons.len()).map_err(|_| WdbError::TooMany {
            kind: "polygons",
            count: self.polygons.len(),
        })?;
        writer.put_u16(polygon_count);
        writer.put_u16(self.vertex_count);
        write_triples(writer, &self.polygons);
        writer.put_u32((self.texture_indices.len() * 3) as u32);
        write_triples(writer, &self.texture_indices);
        self.properties.write(writer)
    }

    pub fn is_textured(&self) -> bool {
        !self.texture_indices.is_empty()
    }
}

fn read_triples(cursor: &mut ByteCursor<'_>, count: usize) -> Result<Vec<[u32; 3]>> {
    let mut triples = Vec::with_capacity(count.min(cursor.remaining() / 12));
    for _ in 0..count {
        triples.push([cursor.read_u32()?, cursor.read_u32()?, cursor.read_u32()?]);
    }
    Ok(triples)
}

fn write_triples(writer: &mut ByteWriter, triples: &[[u32; 3]]) {
    for triple in triples {
        for &index in triple {
            writer.put_u32(index);
        }
    }
}

/// Decoded mesh: one entry per local vertex plus triangle indices into them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshGeometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Empty for untextured meshes
    pub uvs: Vec<Vec2>,
    pub triangles: Vec<[u32; 3]>,
}

/// Expand packed corner indices into local vertices.
///
/// Corners are visited in file order. A corner with [`NEW_VERTEX_FLAG`] set
/// emits a new local vertex: bits 0-15 select the position, bits 16-30 the
/// normal and the texture index at the same corner the UV. A corner without
/// the flag reuses an already emitted local vertex by emission order. Once a
/// triple is decoded its winding is reversed (corners 0 and 2 swapped).
pub fn decode_mesh(
    polygons: &[[u32; 3]],
    texture_indices: &[[u32; 3]],
    vertices: &[Vec3],
    normals: &[Vec3],
    uvs: &[Vec2],
) -> Result<MeshGeometry> {
    let textured = !texture_indices.is_empty();
    let mut geometry = MeshGeometry::default();

    for (polygon_index, polygon) in polygons.iter().enumerate() {
        let uv_corners = texture_indices.get(polygon_index);

        let mut triangle = [0u32; 3];
        for (corner, &packed) in polygon.iter().enumerate() {
            triangle[corner] = if packed & NEW_VERTEX_FLAG != 0 {
                let position = lookup(vertices, packed & 0xffff, "vertex")?;
                let normal = lookup(normals, (packed >> 16) & 0x7fff, "normal")?;
                geometry.positions.push(position);
                geometry.normals.push(normal);
                if textured {
                    let uv_index = match uv_corners {
                        Some(corners) => corners[corner],
                        None => {
                            return Err(WdbError::InvalidIndex {
                                kind: "texture polygon",
                                index: polygon_index as u32,
                                len: texture_indices.len(),
                            });
                        }
                    };
                    geometry.uvs.push(lookup(uvs, uv_index, "texture vertex")?);
                }
                (geometry.positions.len() - 1) as u32
            } else {
                if packed as usize >= geometry.positions.len() {
                    return Err(WdbError::InvalidIndex {
                        kind: "local vertex",
                        index: packed,
                        len: geometry.positions.len(),
                    });
                }
                packed
            };
        }
        triangle.swap(0, 2);
        geometry.triangles.push(triangle);
    }

    Ok(geometry)
}

fn lookup<T: Copy>(items: &[T], index: u32, kind: &'static str) -> Result<T> {
    items
        .get(index as usize)
        .copied()
        .ok_or(WdbError::InvalidIndex {
            kind,
            index,
            len: items.len(),
        })
}

/// One level-of-detail variant of a ROI.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Lod {
    pub flags: u32,
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub meshes: Vec<Mesh>,
}

impl Lod {
    /// Read a LOD and check every mesh index against its arrays.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let flags = cursor.read_u32()?;
        let mesh_count = cursor.read_u32()?;
        if mesh_count == 0 {
            return Ok(Self {
                flags,
                ..Self::default()
            });
        }

        let (vertex_count, normal_count) = unpack_vertex_normal_counts(cursor.read_u32()?);
        let uv_count = cursor.read_i32()?;
        if uv_count < 0 {
            return Err(WdbError::NegativeCount {
                kind: "texture vertex",
                count: uv_count,
            });
        }

        let mut vertices = Vec::with_capacity(vertex_count as usize);
        for _ in 0..vertex_count {
            vertices.push(cursor.read_vec3()?);
        }
        let mut normals = Vec::with_capacity(normal_count as usize);
        for _ in 0..normal_count {
            normals.push(cursor.read_vec3()?);
        }
        let mut uvs = Vec::new();
        for _ in 0..uv_count {
            uvs.push(cursor.read_vec2()?);
        }

        let mut meshes = Vec::new();
        for _ in 0..mesh_count {
            meshes.push(Mesh::read(cursor)?);
        }

        let lod = Self {
            flags,
            vertices,
            normals,
            uvs,
            meshes,
        };
        for mesh in &lod.meshes {
            lod.mesh_geometry(mesh)?;
        }
        Ok(lod)
    }

    pub fn write(&self, writer: &mut ByteWriter) -> Result<()> {
        writer.put_u32(self.flags);
        writer.put_u32(self.meshes.len() as u32);
        if self.meshes.is_empty() {
            return Ok(());
        }

        for (kind, count) in [("vertices", self.vertices.len()), ("normals", self.normals.len())] {
            if count > COUNT_MASK as usize {
                return Err(WdbError::TooMany { kind, count });
            }
        }
        writer.put_u32(pack_vertex_normal_counts(
            self.vertices.len() as u32,
            self.normals.len() as u32,
        ));
        writer.put_i32(self.uvs.len() as i32);
        for &vertex in &self.vertices {
            writer.put_vec3(vertex);
        }
        for &normal in &self.normals {
            writer.put_vec3(normal);
        }
        for &uv in &self.uvs {
            writer.put_vec2(uv);
        }
        self.meshes.iter().try_for_each(|mesh| mesh.write(writer))
    }

    pub fn mesh_geometry(&self, mesh: &Mesh) -> Result<MeshGeometry> {
        decode_mesh(
            &mesh.polygons,
            &mesh.texture_indices,
            &self.vertices,
            &self.normals,
            &self.uvs,
        )
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.polygons.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn new_vertex(position: u32, normal: u32) -> u32 {
        NEW_VERTEX_FLAG | (normal << 16) | position
    }

    #[test_case(0, 0 ; "empty")]
    #[test_case(3, 3 ; "small")]
    #[test_case(0x7fff, 1 ; "max vertices")]
    #[test_case(1, 0x7fff ; "max normals")]
    fn test_vertex_normal_count_bits(vertices: u32, normals: u32) {
        let packed = pack_vertex_normal_counts(vertices, normals);
        assert_eq!(packed & 0x0001_8000, 0);
        assert_eq!(unpack_vertex_normal_counts(packed), (vertices, normals));
    }

    #[test]
    fn test_normal_count_ignores_bits_15_and_16() {
        assert_eq!(unpack_vertex_normal_counts(0x0006_8005), (5, 3));
    }

    #[test]
    fn test_three_new_vertices_decode_in_order() {
        let vertices = [Vec3::X, Vec3::Y, Vec3::Z];
        let normals = [Vec3::Z, Vec3::Y, Vec3::X];
        let polygons = [[new_vertex(0, 2), new_vertex(1, 1), new_vertex(2, 0)]];

        let geometry = decode_mesh(&polygons, &[], &vertices, &normals, &[]).unwrap();
        // emitted as 0, 1, 2 then wound the other way
        assert_eq!(geometry.triangles, vec![[2, 1, 0]]);
        assert_eq!(geometry.positions, vec![Vec3::X, Vec3::Y, Vec3::Z]);
        assert_eq!(geometry.normals, vec![Vec3::X, Vec3::Y, Vec3::Z]);
        assert!(geometry.uvs.is_empty());
    }

    #[test]
    fn test_reused_vertices_skip_array_lookup() {
        let vertices = [Vec3::X, Vec3::Y, Vec3::Z, Vec3::ONE];
        let normals = [Vec3::Z];
        let polygons = [
            [new_vertex(0, 0), new_vertex(1, 0), new_vertex(2, 0)],
            // reuse local 2 and 0; only the new corner reads the arrays
            [new_vertex(3, 0), 2, 0],
        ];

        let geometry = decode_mesh(&polygons, &[], &vertices, &normals, &[]).unwrap();
        assert_eq!(geometry.positions.len(), 4);
        assert_eq!(geometry.positions[3], Vec3::ONE);
        assert_eq!(geometry.triangles[1], [0, 2, 3]);
    }

    #[test]
    fn test_reuse_index_follows_file_corner_order() {
        let (a, b, c, d) = (Vec3::X, Vec3::Y, Vec3::Z, Vec3::ONE);
        let vertices = [a, b, c, d];
        let normals = [Vec3::Z];
        let polygons = [
            [new_vertex(0, 0), new_vertex(1, 0), new_vertex(2, 0)],
            [0, 1, new_vertex(3, 0)],
        ];

        let geometry = decode_mesh(&polygons, &[], &vertices, &normals, &[]).unwrap();
        let corners: Vec<Vec3> = geometry.triangles[1]
            .iter()
            .map(|&index| geometry.positions[index as usize])
            .collect();
        assert_eq!(corners, vec![d, b, a]);

        let first: Vec<Vec3> = geometry.triangles[0]
            .iter()
            .map(|&index| geometry.positions[index as usize])
            .collect();
        assert_eq!(first, vec![c, b, a]);
    }

    #[test]
    fn test_uvs_follow_corner_texture_index() {
        let vertices = [Vec3::ZERO; 3];
        let normals = [Vec3::Z];
        let uvs = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        let polygons = [[new_vertex(0, 0), new_vertex(1, 0), new_vertex(2, 0)]];
        let texture_indices = [[2, 0, 1]];

        let geometry = decode_mesh(&polygons, &texture_indices, &vertices, &normals, &uvs).unwrap();
        assert_eq!(geometry.uvs, vec![uvs[2], uvs[0], uvs[1]]);
        assert_eq!(geometry.triangles, vec![[2, 1, 0]]);
    }

    #[test]
    fn test_out_of_range_indices() {
        let vertices = [Vec3::ZERO];
        let normals = [Vec3::Z];

        let bad_position = [[new_vertex(0, 0), new_vertex(0, 0), new_vertex(4, 0)]];
        assert!(matches!(
            decode_mesh(&bad_position, &[], &vertices, &normals, &[]),
            Err(WdbError::InvalidIndex { kind: "vertex", index: 4, len: 1 })
        ));

        let bad_reuse = [[new_vertex(0, 0), new_vertex(0, 0), 5]];
        assert!(matches!(
            decode_mesh(&bad_reuse, &[], &vertices, &normals, &[]),
            Err(WdbError::InvalidIndex { kind: "local vertex", index: 5, .. })
        ));
    }

    #[test]
    fn test_lod_without_meshes_stops_after_header() {
        let mut writer = ByteWriter::new();
        writer.put_u32(0x10);
        writer.put_u32(0);
        writer.put_u32(0xdead_beef);
        let bytes = writer.into_bytes();

        let mut cursor = ByteCursor::new(&bytes);
        let lod = Lod::read(&mut cursor).unwrap();
        assert_eq!(lod.flags, 0x10);
        assert!(lod.meshes.is_empty());
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn test_lod_write_then_read() {
        let lod = Lod {
            flags: 1,
            vertices: vec![Vec3::X, Vec3::Y, Vec3::Z],
            normals: vec![Vec3::Z],
            uvs: vec![Vec2::ZERO, Vec2::ONE, Vec2::X],
            meshes: vec![Mesh {
                vertex_count: 3,
                polygons: vec![[new_vertex(0, 0), new_vertex(1, 0), new_vertex(2, 0)]],
                texture_indices: vec![[0, 1, 2]],
                properties: MeshProperties {
                    color: Rgb::new(200, 10, 10),
                    alpha: 0.5,
                    shading: Shading::Flat,
                    flags: [1, 0, 1],
                    texture_name: Some("brick.gif".to_string()),
                    material_name: None,
                },
            }],
        };

        let mut writer = ByteWriter::new();
        lod.write(&mut writer).unwrap();
        let bytes = writer.into_bytes();
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(Lod::read(&mut cursor).unwrap(), lod);
        assert!(cursor.is_at_end());
        assert_eq!(lod.triangle_count(), 1);
    }
}
