//! Directory-backed LRU cache
//!
//! Stores each entry as a file and keeps least-recently-used order on disk as
//! a doubly linked list of pointer files, so the key set never has to be
//! loaded into memory.
//!
//! ```no_run
//! use lru_dir::Cache;
//!
//! # fn main() -> lru_dir::Result<()> {
//! let cache = Cache::open_or_create("/tmp/my-cache")?;
//! let _guard = cache.lock()?;
//! cache.put(b"key", b"value")?;
//! assert_eq!(cache.get(b"key")?, b"value");
//! if cache.len()? > 100 {
//!     cache.delete_oldest()?;
//! }
//! # Ok(())
//! # }
//! ```

mod cache;
mod codec;
mod error;
mod lock;
mod recency;
mod store;
mod types;

pub use cache::Cache;
pub use codec::encode;
pub use error::{LruDirError, Result};
pub use lock::DirLockGuard;
pub use types::{CacheState, LOCK_FILE, NEXT_SUFFIX, PREV_SUFFIX, STATE_FILE};
