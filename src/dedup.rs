//! In-memory (url, digest) → record-id index driving revisit decisions.
//!
//! The index lives for the whole archive lifetime, so duplicates are
//! detected across segment rotations.

use std::collections::HashMap;

use crate::types::RecordId;

/// Composite key: dedup is scoped per URL. Identical bytes served at two
/// different URLs are legitimate separate resources, and a genuine key
/// struct avoids the collisions a separator-joined string would invite
/// from delimiter characters inside URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DedupKey {
    url: String,
    digest: String,
}

/// First record that stored a given (url, digest) payload.
#[derive(Debug, Clone)]
pub struct DedupEntry {
    pub record_id: RecordId,
    pub url: String,
}

/// Map of every payload stored so far, queried before each byte-bearing
/// write to decide resource-vs-revisit.
#[derive(Debug, Default)]
pub struct DedupIndex {
    entries: HashMap<DedupKey, DedupEntry>,
}

impl DedupIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lookup(&self, url: &str, digest: &str) -> Option<&DedupEntry> {
        self.entries.get(&DedupKey {
            url: url.to_string(),
            digest: digest.to_string(),
        })
    }

    pub fn record(&mut self, url: &str, digest: &str, record_id: RecordId) {
        self.entries.insert(
            DedupKey {
                url: url.to_string(),
                digest: digest.to_string(),
            },
            DedupEntry {
                record_id,
                url: url.to_string(),
            },
        );
    }

    /// Number of distinct payloads stored in full.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
