//! Shared binary primitives for the isle-rs format crates.
//!
//! - [`ByteCursor`]: bounds-checked little-endian reads over `&[u8]`
//! - [`ByteWriter`]: growable little-endian writer with `seek`/`tell`
//! - [`PalettedImage`]: the 8-bit paletted image layout shared by world
//!   databases and save files
//! - [`ByteStore`]: the collaborator that supplies and persists raw buffers

pub mod cursor;
pub mod error;
pub mod image;
pub mod store;
pub mod writer;

pub use cursor::{ByteCursor, decode_latin1, encode_latin1};
pub use error::{DataError, Result};
pub use image::{MAX_PALETTE_SIZE, PalettedImage, Rgb};
pub use store::{ByteStore, DirectoryStore, MemoryStore};
pub use writer::ByteWriter;
