//! Error handling for save file parsing and patching

use isle_data::DataError;
use thiserror::Error;

/// Errors that can occur when reading or patching save data
#[derive(Debug, Error)]
pub enum SaveError {
    /// Truncated data or malformed primitive
    #[error(transparent)]
    Data(#[from] DataError),

    /// Save header carries an unexpected version word
    #[error("Invalid save version: expected {expected:#x}, found {actual:#x}")]
    InvalidVersion {
        /// The only version this parser understands
        expected: i32,
        /// The version found in the header
        actual: i32,
    },

    /// No variable with this name exists in the save
    #[error("Unknown variable '{0}'")]
    UnknownVariable(String),

    /// Variable values are limited by their one-byte length prefix
    #[error("Value for '{name}' is {length} bytes, at most 255 allowed")]
    ValueTooLong {
        /// Variable name
        name: String,
        /// Encoded value length
        length: usize,
    },

    /// Mission actor ids run from 1 to 5
    #[error("Invalid actor id {0}, expected 1-5")]
    InvalidActor(u8),

    /// Character record index outside the fixed table
    #[error("Invalid character index {index}, the save holds {count}")]
    InvalidCharacter {
        /// Requested index
        index: usize,
        /// Number of character records
        count: usize,
    },

    /// A field value does not fit its on-disk width
    #[error("Value {value} does not fit field {field}")]
    FieldOverflow {
        /// Field name
        field: &'static str,
        /// Rejected value
        value: i64,
    },

    /// A state with this name exists but does not have the expected kind
    #[error("State '{name}' is not a {expected}")]
    UnexpectedState {
        /// State name
        name: String,
        /// Kind the caller required
        expected: &'static str,
    },

    /// The state list cannot grow past its s16 count
    #[error("State list is full ({0} entries)")]
    TooManyStates(i16),

    /// The roster holds at most nine players
    #[error("Roster has {0} players, at most 9 allowed")]
    RosterTooLarge(usize),

    /// Player index outside the roster
    #[error("Invalid player index {index}, the roster holds {count}")]
    InvalidPlayer {
        /// Requested index
        index: usize,
        /// Number of roster entries
        count: usize,
    },
}

/// Type alias for Results from save file operations
pub type Result<T> = std::result::Result<T, SaveError>;
