//! File access through the directory-backed byte store

use anyhow::{Context, Result};
use isle_data::{ByteStore, DirectoryStore};
use std::path::Path;

/// Split a path into a store rooted at its parent and the entry name.
pub fn open_store(path: &Path) -> Result<(DirectoryStore, String)> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Not a file path: {}", path.display()))?
        .to_string();
    let root = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => ".".into(),
    };
    Ok((DirectoryStore::new(root), name))
}

pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    let (store, name) = open_store(path)?;
    store
        .read(&name)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

pub fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    let (store, name) = open_store(path)?;
    store
        .write(&name, data)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Format bytes in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_store_bare_name() {
        let (store, name) = open_store(Path::new("G0.GS")).unwrap();
        assert_eq!(name, "G0.GS");
        assert_eq!(store.root(), Path::new("."));
    }

    #[test]
    fn test_read_write_through_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Players.gsi");
        write_file(&path, &[1, 2, 3]).unwrap();
        assert_eq!(read_file(&path).unwrap(), vec![1, 2, 3]);
        assert!(read_file(&dir.path().join("missing.gs")).is_err());
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
    }
}
