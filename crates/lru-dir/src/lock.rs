//! Cross-process lock scoped to a cache directory
//!
//! Cache operations never take this lock. Callers that share a directory
//! between processes hold a guard around their own call sequences.

use crate::error::{LruDirError, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Debug)]
pub struct DirLock {
    file: File,
    path: PathBuf,
}

impl DirLock {
    /// Open (creating if needed) the lock file at `path`
    pub fn new(path: PathBuf) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| LruDirError::Lock(Box::new(e)))?;
        Ok(Self { file, path })
    }

    /// Block until the exclusive lock is held
    pub fn lock(&self) -> Result<DirLockGuard<'_>> {
        FileExt::lock_exclusive(&self.file).map_err(|e| LruDirError::Lock(Box::new(e)))?;
        debug!(path = ?self.path, "Acquired directory lock");
        Ok(DirLockGuard { lock: self })
    }

    /// Take the exclusive lock if no one else holds it
    pub fn try_lock(&self) -> Result<Option<DirLockGuard<'_>>> {
        match FileExt::try_lock_exclusive(&self.file) {
            Ok(()) => {
                debug!(path = ?self.path, "Acquired directory lock");
                Ok(Some(DirLockGuard { lock: self }))
            }
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(None),
            Err(e) => Err(LruDirError::Lock(Box::new(e))),
        }
    }
}

/// Holds the directory lock until dropped
#[derive(Debug)]
pub struct DirLockGuard<'a> {
    lock: &'a DirLock,
}

impl Drop for DirLockGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.lock.file) {
            warn!(path = ?self.lock.path, error = %e, "Failed to release directory lock");
        } else {
            debug!(path = ?self.lock.path, "Released directory lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_new_creates_lock_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".lrulock");
        DirLock::new(path.clone()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_new_in_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let err = DirLock::new(dir.path().join("missing").join(".lrulock")).unwrap_err();
        assert!(matches!(err, LruDirError::Lock(_)));
    }

    #[test]
    fn test_second_handle_is_excluded_while_held() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".lrulock");
        let first = DirLock::new(path.clone()).unwrap();
        let second = DirLock::new(path).unwrap();

        let guard = first.lock().unwrap();
        assert!(second.try_lock().unwrap().is_none());

        drop(guard);
        assert!(second.try_lock().unwrap().is_some());
    }

    #[test]
    fn test_guard_released_on_early_return() {
        fn locked_failure(lock: &DirLock) -> Result<()> {
            let _guard = lock.lock()?;
            Err(LruDirError::InvalidArgument("bail out"))
        }

        let dir = tempdir().unwrap();
        let path = dir.path().join(".lrulock");
        let first = DirLock::new(path.clone()).unwrap();
        let second = DirLock::new(path).unwrap();

        assert!(locked_failure(&first).is_err());
        assert!(second.try_lock().unwrap().is_some());
    }
}
