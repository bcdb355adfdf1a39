//! Opaque token owned by the shared-storage synchronization layer.
//!
//! The entry core stores and copies it but never interprets it.

use serde::{Deserialize, Serialize};

/// Remote identity and optimistic-locking version of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedEntryData {
    /// `-1` until the entry has been stored remotely.
    pub shared_id: i64,
    pub version: i64,
}

impl SharedEntryData {
    pub fn is_shared(&self) -> bool {
        self.shared_id >= 0
    }
}

impl Default for SharedEntryData {
    fn default() -> Self {
        Self {
            shared_id: -1,
            version: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SharedEntryData;

    #[test]
    fn default_is_not_shared() {
        let data = SharedEntryData::default();
        assert!(!data.is_shared());
        assert_eq!(data.version, 1);
    }
}
