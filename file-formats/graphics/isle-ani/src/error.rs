use isle_data::DataError;
use thiserror::Error;

/// Error types for animation clip parsing and writing
#[derive(Error, Debug)]
pub enum AniError {
    /// Truncated data or malformed primitive
    #[error(transparent)]
    Data(#[from] DataError),

    /// Invalid magic word at the start of a standalone clip
    #[error("Invalid magic number: expected {expected:#x}, got {actual:#x}")]
    InvalidMagic { expected: i32, actual: i32 },

    /// Keyframe time does not fit in 24 bits
    #[error("Keyframe time {0:#x} exceeds the 24-bit limit")]
    TimeOutOfRange(u32),

    /// A keyframe list is longer than its u16 count prefix allows
    #[error("Too many {kind} keys: {count}")]
    TooManyKeys { kind: &'static str, count: usize },

    /// Only standalone clips carry a camera track
    #[error("Camera track requires a standalone clip header")]
    CameraWithoutHeader,
}

/// Result type using AniError
pub type Result<T> = std::result::Result<T, AniError>;
