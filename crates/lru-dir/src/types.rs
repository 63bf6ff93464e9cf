//! On-disk layout and the state marker record

use serde::{Deserialize, Serialize};

/// State marker, written once at creation and parsed at open
pub const STATE_FILE: &str = ".lru";

/// Backing file for the cross-process lock
pub const LOCK_FILE: &str = ".lrulock";

/// Suffix of the file holding the key that follows a key (toward the tail)
pub const NEXT_SUFFIX: &str = "~next";

/// Suffix of the file holding the key that precedes a key (toward the head)
pub const PREV_SUFFIX: &str = "~prev";

/// Longest filename, in bytes, accepted by common filesystems
pub const MAX_NAME_LEN: usize = 255;

pub const STATE_VERSION: u32 = 1;

/// Contents of the state marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheState {
    #[serde(default)]
    pub version: u32,
}

impl Default for CacheState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = CacheState::default();
        assert_eq!(state.version, STATE_VERSION);
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&CacheState::default()).unwrap();
        assert_eq!(json, r#"{"version":1}"#);
    }

    #[test]
    fn test_legacy_empty_record_parses() {
        let state: CacheState = serde_json::from_str("{}").unwrap();
        assert_eq!(state.version, 0);
    }

    #[test]
    fn test_non_record_rejected() {
        assert!(serde_json::from_str::<CacheState>("not json").is_err());
        assert!(serde_json::from_str::<CacheState>("42").is_err());
    }
}
