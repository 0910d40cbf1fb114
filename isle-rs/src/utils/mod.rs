//! Shared utilities for the isle-rs CLI

pub mod io;
pub mod tree;

pub use io::*;
pub use tree::*;
