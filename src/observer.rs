//! Observer seam for progress-reporting integrations.
//!
//! The surrounding pipeline surfaces progress through an observer the
//! caller installs at construction; the writer invokes it synchronously
//! from the write path, so implementations should return quickly.

use crate::types::{RecordKind, WarcStats};

/// Callbacks fired by `WarcWriter` at lifecycle points.
///
/// Every method defaults to a no-op so implementors override only what
/// they need.
pub trait ArchiveObserver {
    /// First segment opened and its warcinfo written.
    fn on_started(&self, filename: &str) {
        let _ = filename;
    }

    /// One record appended to the current segment.
    fn on_record_written(&self, url: &str, kind: RecordKind) {
        let _ = (url, kind);
    }

    /// Archive finished; the stats are final.
    fn on_finished(&self, stats: &WarcStats) {
        let _ = stats;
    }
}
