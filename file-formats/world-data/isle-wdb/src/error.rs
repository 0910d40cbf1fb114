//! Error handling for world database parsing

use isle_ani::AniError;
use isle_data::DataError;
use thiserror::Error;

/// Errors that can occur when reading or building a world database
#[derive(Debug, Error)]
pub enum WdbError {
    /// Truncated data or malformed primitive
    #[error(transparent)]
    Data(#[from] DataError),

    /// The animation tree embedded in a model block is malformed
    #[error("Embedded animation: {0}")]
    Ani(#[from] AniError),

    /// Model data block carries an unexpected version tag
    #[error("Unsupported model data version: expected {expected}, found {actual}")]
    UnsupportedModelVersion {
        /// The only version this parser understands
        expected: u32,
        /// The version found in the block
        actual: u32,
    },

    /// A mesh index points outside the array it refers to
    #[error("{kind} index {index} out of range ({len} available)")]
    InvalidIndex {
        /// Which array was indexed
        kind: &'static str,
        /// The offending index
        index: u32,
        /// Length of the indexed array
        len: usize,
    },

    /// A texture palette exceeds 256 entries
    #[error("Texture '{texture}' has a palette of {size} entries, at most 256 allowed")]
    PaletteTooLarge {
        /// Texture name
        texture: String,
        /// Declared palette size
        size: u32,
    },

    /// A catalog entry points outside the file
    #[error("Block '{name}' at {offset:#x}+{length:#x} exceeds file length {file_len:#x}")]
    BlockOutOfRange {
        /// Catalog entry name
        name: String,
        /// Absolute block offset
        offset: u32,
        /// Declared block length
        length: u32,
        /// Total file length
        file_len: usize,
    },

    /// An end offset points back before data already read
    #[error("'{name}' end offset {offset:#x} lies before the read position {position:#x}")]
    InvalidEndOffset {
        /// ROI whose end offset is wrong
        name: String,
        /// Declared end offset
        offset: usize,
        /// Cursor position after its LODs
        position: usize,
    },

    /// A signed count field is negative
    #[error("Negative {kind} count {count}")]
    NegativeCount {
        /// What was being counted
        kind: &'static str,
        /// The value read
        count: i32,
    },

    /// A list is too long for its count field when writing
    #[error("Too many {kind}: {count}")]
    TooMany {
        /// What was being counted
        kind: &'static str,
        /// Number of entries
        count: usize,
    },
}

/// Type alias for Results from world database operations
pub type Result<T> = std::result::Result<T, WdbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = WdbError::UnsupportedModelVersion {
            expected: 19,
            actual: 18,
        };
        assert_eq!(
            error.to_string(),
            "Unsupported model data version: expected 19, found 18"
        );

        let error = WdbError::InvalidIndex {
            kind: "vertex",
            index: 7,
            len: 3,
        };
        assert_eq!(error.to_string(), "vertex index 7 out of range (3 available)");

        let error = WdbError::InvalidEndOffset {
            name: "bike".to_string(),
            offset: 0x10,
            position: 0x40,
        };
        assert_eq!(
            error.to_string(),
            "'bike' end offset 0x10 lies before the read position 0x40"
        );
    }
}
