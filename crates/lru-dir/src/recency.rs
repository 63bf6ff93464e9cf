//! Doubly linked recency list stored as pointer files
//!
//! Every attached key owns two files, `<name>~next` (toward the tail, less
//! recently used) and `<name>~prev` (toward the head). Each holds the literal
//! bytes of the neighbouring key, or nothing when there is no neighbour.
//!
//! The empty key's own pair, `~next` and `~prev`, anchors the list: `~next`
//! holds the head key and `~prev` holds the tail key. Because an empty pointer
//! names the anchor, splices at either end rewrite the anchors without any
//! special casing.
//!
//! Splices are sequences of independent file writes. A crash part way through
//! leaves the list inconsistent and nothing here detects or repairs that.

use crate::codec::encode;
use crate::error::{LruDirError, Result};
use crate::store::{read_file, remove_file, write_file};
use crate::types::{NEXT_SUFFIX, PREV_SUFFIX};
use std::path::PathBuf;
use tracing::debug;

/// The anchor's key
const ANCHOR: &[u8] = b"";

#[derive(Debug, Clone)]
pub struct RecencyList {
    dir: PathBuf,
}

impl RecencyList {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn next_path(&self, key: &[u8]) -> PathBuf {
        let mut name = encode(key);
        name.push_str(NEXT_SUFFIX);
        self.dir.join(name)
    }

    fn prev_path(&self, key: &[u8]) -> PathBuf {
        let mut name = encode(key);
        name.push_str(PREV_SUFFIX);
        self.dir.join(name)
    }

    fn next(&self, key: &[u8]) -> Result<Vec<u8>> {
        read_file(&self.next_path(key))
    }

    fn prev(&self, key: &[u8]) -> Result<Vec<u8>> {
        read_file(&self.prev_path(key))
    }

    fn set_next(&self, key: &[u8], next: &[u8]) -> Result<()> {
        write_file(&self.next_path(key), next)
    }

    fn set_prev(&self, key: &[u8], prev: &[u8]) -> Result<()> {
        write_file(&self.prev_path(key), prev)
    }

    /// Write both anchors empty, making an empty list
    pub fn init(&self) -> Result<()> {
        self.set_next(ANCHOR, ANCHOR)?;
        self.set_prev(ANCHOR, ANCHOR)
    }

    /// Most recently used key, empty if the list is empty
    pub fn head(&self) -> Result<Vec<u8>> {
        self.next(ANCHOR)
    }

    /// Least recently used key, empty if the list is empty
    pub fn tail(&self) -> Result<Vec<u8>> {
        self.prev(ANCHOR)
    }

    /// Link `key` in front of the current head. `key` must not be attached.
    pub fn attach_head(&self, key: &[u8]) -> Result<()> {
        let head = self.head()?;

        self.set_next(ANCHOR, key)?;
        self.set_prev(key, ANCHOR)?;
        self.set_next(key, &head)?;
        // when the list was empty this writes the tail anchor
        self.set_prev(&head, key)?;

        debug!(key = ?String::from_utf8_lossy(key), "Attached at head");
        Ok(())
    }

    /// Unlink `key` from its neighbours, leaving its own pointer files stale.
    ///
    /// Fails with `NotFound` if `key` is not attached.
    pub fn detach(&self, key: &[u8]) -> Result<()> {
        if key.is_empty() {
            return Err(LruDirError::InvalidArgument("cannot detach the empty key"));
        }

        let next = self.next(key)?;
        let prev = self.prev(key)?;

        self.set_prev(&next, &prev)?;
        self.set_next(&prev, &next)?;

        debug!(key = ?String::from_utf8_lossy(key), "Detached");
        Ok(())
    }

    /// Delete the pointer files of a detached key
    pub fn remove(&self, key: &[u8]) -> Result<()> {
        remove_file(&self.next_path(key))?;
        remove_file(&self.prev_path(key))
    }

    /// All keys from most to least recently used
    pub fn keys(&self) -> Result<Vec<Vec<u8>>> {
        let mut keys = Vec::new();
        let mut key = self.head()?;
        while !key.is_empty() {
            let next = self.next(&key)?;
            keys.push(key);
            key = next;
        }
        Ok(keys)
    }
}
