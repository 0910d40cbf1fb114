//! Parser for the LEGO Island world database (`WORLD.WDB`).
//!
//! The file opens with a catalog of worlds, each listing part and model data
//! blocks by absolute offset. Global textures and global parts follow the
//! catalog; shared ROIs borrow their geometry from the global parts.
//!
//! # Examples
//!
//! ```no_run
//! use isle_wdb::{ModelData, WdbFile};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("WORLD.WDB")?;
//! let wdb = WdbFile::parse(&data)?;
//! if let Some((world, model)) = wdb.find_model("pizza") {
//!     let block = ModelData::read_from(&data, model)?;
//!     println!("{} in {}: {} ROIs", model.name, world.name, block.roi.node_count());
//! }
//! # Ok(())
//! # }
//! ```

pub mod block;
pub mod builder;
pub mod catalog;
pub mod error;
pub mod file;
pub mod lod;
pub mod roi;
pub mod texture;

pub use block::{MODEL_DATA_VERSION, ModelData, PartData, PartRoi};
pub use builder::{PlacedModel, WdbBuilder, WorldBuilder};
pub use catalog::{ModelRef, PartRef, Transform, WorldEntry};
pub use error::{Result, WdbError};
pub use file::{WdbFile, lod_lookup_name};
pub use lod::{Lod, Mesh, MeshGeometry, MeshProperties, Shading, decode_mesh};
pub use roi::{BoundingBox, BoundingSphere, Roi};
pub use texture::Texture;
