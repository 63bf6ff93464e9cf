//! Error types for the directory-backed LRU cache

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum LruDirError {
    /// The empty key was passed where a user key is required
    InvalidArgument(&'static str),
    /// An entry or pointer file is absent
    NotFound(PathBuf),
    Io(Box<io::Error>),
    /// The directory has no valid state marker
    NotACache(String),
    /// The directory lock could not be established
    Lock(Box<io::Error>),
}

impl LruDirError {
    /// Classify an I/O error raised while touching `path`
    pub(crate) fn io_at(path: &Path, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            LruDirError::NotFound(path.to_path_buf())
        } else {
            LruDirError::Io(Box::new(err))
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LruDirError::NotFound(_))
    }
}

impl fmt::Display for LruDirError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LruDirError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            LruDirError::NotFound(path) => write!(f, "Not found: {}", path.display()),
            LruDirError::Io(err) => write!(f, "IO error: {}", err),
            LruDirError::NotACache(msg) => write!(f, "Not an LRU cache directory: {}", msg),
            LruDirError::Lock(err) => write!(f, "Lock error: {}", err),
        }
    }
}

impl std::error::Error for LruDirError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LruDirError::Io(err) | LruDirError::Lock(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LruDirError {
    fn from(err: serde_json::Error) -> Self {
        LruDirError::NotACache(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LruDirError>;
