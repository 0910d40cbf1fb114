use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("unexpected end of data at offset {offset:#x} (need {need} bytes, have {have})")]
    OutOfBounds {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("string at offset {offset:#x} has invalid length {length}")]
    InvalidStringLength { offset: usize, length: i64 },

    #[error("palette at offset {offset:#x} has {size} entries, at most 256 allowed")]
    PaletteTooLarge { offset: usize, size: u32 },

    #[error("store entry '{0}' does not exist")]
    StoreMissing(String),

    #[error("store I/O error on {path}: {source}")]
    StoreIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, DataError>;
