//! Directory-backed LRU cache

use crate::codec::encode;
use crate::error::{LruDirError, Result};
use crate::lock::{DirLock, DirLockGuard};
use crate::recency::RecencyList;
use crate::store::EntryStore;
use crate::types::{CacheState, LOCK_FILE, MAX_NAME_LEN, NEXT_SUFFIX, PREV_SUFFIX, STATE_FILE};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// An LRU cache whose entries and recency order live in one directory
#[derive(Debug)]
pub struct Cache {
    /// Root directory of the cache
    dir: PathBuf,
    /// Value files
    entries: EntryStore,
    /// Recency order, most recently used first
    list: RecencyList,
    /// Cross-process lock, never taken by cache operations
    lock: DirLock,
}

/// Reject keys that are empty or whose pointer filenames would be too long,
/// before anything touches the disk
fn check_key(key: &[u8], empty: &'static str) -> Result<()> {
    if key.is_empty() {
        return Err(LruDirError::InvalidArgument(empty));
    }
    let suffix = NEXT_SUFFIX.len().max(PREV_SUFFIX.len());
    if encode(key).len() + suffix > MAX_NAME_LEN {
        return Err(LruDirError::InvalidArgument(
            "encoded key exceeds the filename length limit",
        ));
    }
    Ok(())
}

impl Cache {
    fn with_lock(dir: &Path, lock: DirLock) -> Self {
        Self {
            dir: dir.to_path_buf(),
            entries: EntryStore::new(dir.to_path_buf()),
            list: RecencyList::new(dir.to_path_buf()),
            lock,
        }
    }

    /// Initialize a cache in `path`, which must already be a directory.
    ///
    /// If initialization fails part way, the whole directory is removed.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let meta = fs::metadata(path).map_err(|e| LruDirError::io_at(path, e))?;
        if !meta.is_dir() {
            return Err(LruDirError::Io(Box::new(io::Error::other(format!(
                "{} is not a directory",
                path.display()
            )))));
        }

        match Self::init(path) {
            Ok(cache) => {
                info!(dir = ?path, "Created LRU cache");
                Ok(cache)
            }
            Err(e) => {
                warn!(dir = ?path, error = %e, "Cache initialization failed, removing directory");
                if let Err(rm) = fs::remove_dir_all(path) {
                    warn!(dir = ?path, error = %rm, "Failed to remove half-initialized cache");
                }
                Err(e)
            }
        }
    }

    fn init(path: &Path) -> Result<Self> {
        let lock = DirLock::new(path.join(LOCK_FILE))?;
        let cache = Self::with_lock(path, lock);
        cache.list.init()?;
        cache.write_state(&CacheState::default())?;
        Ok(cache)
    }

    /// Open an existing cache, failing with `NotACache` if `path` has no
    /// readable state marker. List consistency is not checked.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let lock = DirLock::new(path.join(LOCK_FILE))?;
        let cache = Self::with_lock(path, lock);
        let state = cache.read_state()?;
        info!(dir = ?path, version = state.version, "Opened LRU cache");
        Ok(cache)
    }

    /// Create the cache if `path` does not exist, otherwise open it
    pub fn open_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::metadata(path) {
            Ok(_) => Self::open(path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(path).map_err(|e| LruDirError::io_at(path, e))?;
                Self::create(path)
            }
            Err(e) => Err(LruDirError::io_at(path, e)),
        }
    }

    fn read_state(&self) -> Result<CacheState> {
        let path = self.dir.join(STATE_FILE);
        let buf = fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                LruDirError::NotACache(format!("missing {}", path.display()))
            }
            _ => LruDirError::Io(Box::new(e)),
        })?;
        Ok(serde_json::from_slice(&buf)?)
    }

    fn write_state(&self, state: &CacheState) -> Result<()> {
        let path = self.dir.join(STATE_FILE);
        let mut buf = serde_json::to_vec(state).map_err(|e| LruDirError::Io(Box::new(e.into())))?;
        buf.push(b'\n');
        fs::write(&path, buf).map_err(|e| LruDirError::io_at(&path, e))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry file for `key`, whether or not the entry exists
    pub fn path(&self, key: &[u8]) -> PathBuf {
        self.entries.path(key)
    }

    /// Block until this process holds the directory's cross-process lock.
    /// The lock is released when the guard drops.
    pub fn lock(&self) -> Result<DirLockGuard<'_>> {
        self.lock.lock()
    }

    /// Take the directory lock if it is free
    pub fn try_lock(&self) -> Result<Option<DirLockGuard<'_>>> {
        self.lock.try_lock()
    }

    /// Read the value for `key` and mark it most recently used
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        check_key(key, "cannot get the empty key")?;

        let value = self.entries.read(key)?;
        self.list.detach(key)?;
        self.list.attach_head(key)?;
        Ok(value)
    }

    /// Store `value` under `key` and mark it most recently used.
    ///
    /// Keys whose encoded name plus pointer suffix exceeds `MAX_NAME_LEN`
    /// bytes are rejected with `InvalidArgument`.
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        check_key(key, "cannot put the empty key")?;

        self.entries.write(key, value)?;
        match self.list.detach(key) {
            Ok(()) => {}
            // new key, nothing to unlink
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
        self.list.attach_head(key)
    }

    /// Remove `key`. Fails with `NotFound` if it is not in the cache.
    ///
    /// A failure part way through can leave some of the key's files behind.
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        check_key(key, "cannot delete the empty key")?;

        self.list.detach(key)?;
        self.entries.remove(key)?;
        self.list.remove(key)?;
        debug!(key = ?String::from_utf8_lossy(key), "Deleted");
        Ok(())
    }

    /// All keys from most to least recently used. O(n) in the entry count.
    pub fn keys(&self) -> Result<Vec<Vec<u8>>> {
        self.list.keys()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.keys()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.list.head()?.is_empty())
    }

    /// The least recently used key
    pub fn oldest(&self) -> Result<Vec<u8>> {
        let tail = self.list.tail()?;
        if tail.is_empty() {
            return Err(LruDirError::NotFound(self.dir.clone()));
        }
        Ok(tail)
    }

    /// Remove the least recently used key
    pub fn delete_oldest(&self) -> Result<()> {
        let key = self.oldest()?;
        self.delete(&key)
    }
}
