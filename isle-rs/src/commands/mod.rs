//! Command implementations for each file format

pub mod ani;
pub mod players;
pub mod save;
pub mod wdb;
