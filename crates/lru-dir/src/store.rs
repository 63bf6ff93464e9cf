//! Value files, one per key

use crate::codec::encode;
use crate::error::{LruDirError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read a whole file, classifying a missing file as `NotFound`
pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| LruDirError::io_at(path, e))
}

/// Create or truncate a file with the given contents
pub(crate) fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|e| LruDirError::io_at(path, e))
}

pub(crate) fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| LruDirError::io_at(path, e))
}

/// Entry files addressed by encoded key. Callers serialize access.
#[derive(Debug, Clone)]
pub struct EntryStore {
    dir: PathBuf,
}

impl EntryStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Path of the entry file for a key, whether or not it exists
    pub fn path(&self, key: &[u8]) -> PathBuf {
        self.dir.join(encode(key))
    }

    pub fn write(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let path = self.path(key);
        write_file(&path, value)?;
        debug!(path = ?path, size = value.len(), "Wrote entry");
        Ok(())
    }

    pub fn read(&self, key: &[u8]) -> Result<Vec<u8>> {
        read_file(&self.path(key))
    }

    pub fn remove(&self, key: &[u8]) -> Result<()> {
        let path = self.path(key);
        remove_file(&path)?;
        debug!(path = ?path, "Removed entry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let store = EntryStore::new(dir.path().to_path_buf());

        store.write(b"foo", b"bar").unwrap();
        assert_eq!(store.read(b"foo").unwrap(), b"bar");
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempdir().unwrap();
        let store = EntryStore::new(dir.path().to_path_buf());

        store.write(b"foo", b"a much longer first value").unwrap();
        store.write(b"foo", b"short").unwrap();
        assert_eq!(store.read(b"foo").unwrap(), b"short");
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let store = EntryStore::new(dir.path().to_path_buf());

        let err = store.read(b"missing").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_remove() {
        let dir = tempdir().unwrap();
        let store = EntryStore::new(dir.path().to_path_buf());

        store.write(b"foo", b"bar").unwrap();
        store.remove(b"foo").unwrap();
        assert!(!store.path(b"foo").exists());
        assert!(store.remove(b"foo").unwrap_err().is_not_found());
    }

    #[test]
    fn test_path_uses_encoded_key() {
        let dir = tempdir().unwrap();
        let store = EntryStore::new(dir.path().to_path_buf());

        assert_eq!(store.path(b"a/b"), dir.path().join("a_%_b"));
    }

    #[test]
    fn test_binary_value() {
        let dir = tempdir().unwrap();
        let store = EntryStore::new(dir.path().to_path_buf());

        let value: Vec<u8> = (0..=255).collect();
        store.write(&[0x00, 0xff], &value).unwrap();
        assert_eq!(store.read(&[0x00, 0xff]).unwrap(), value);
    }
}
