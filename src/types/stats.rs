//! Archive counters and the finish-time summary.

use std::path::PathBuf;

use serde::Serialize;

/// Live snapshot of archive counters; callable at any point in the
/// writer's lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WarcStats {
    /// Records written across all segments, warcinfo included.
    pub record_count: u64,
    /// Segment files opened so far.
    pub file_count: u64,
    /// Bytes on disk across all segments.
    pub total_bytes: u64,
    /// Rows accumulated for the CDX index.
    pub cdx_records: u64,
    /// Distinct (url, digest) payloads stored in full.
    pub unique_resources: u64,
    /// Writes answered with a revisit record instead of stored bytes.
    pub duplicates_skipped: u64,
}

/// Paths and final counters returned by `WarcWriter::finish`.
#[derive(Debug, Clone, Serialize)]
pub struct FinishedArchive {
    /// Path of the first WARC segment.
    pub warc_path: PathBuf,
    /// Path of the serialized CDX index.
    pub cdx_path: PathBuf,
    pub stats: WarcStats,
}
