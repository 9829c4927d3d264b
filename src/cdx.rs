//! CDX index accumulation and serialization.
//!
//! One row per byte-bearing record (`resource`/`response`); revisits are
//! intentionally absent. The index must only point at offsets where
//! retrievable bytes actually live, and a revisit has no payload to serve.
//! A second, unchanged visit therefore leaves no CDX trace for its
//! timestamp; discovering it means scanning the WARC's revisit records and
//! following their `refers-to` chain.
//!
//! Rows accumulate in memory and are sorted once at finish time. For very
//! large crawls this is a known scaling limit; bounded archives are the
//! intended use.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::constants::CDX_LEGEND;

/// One line of the CDX index.
#[derive(Debug, Clone)]
pub struct CdxRow {
    /// SURT-canonicalized url key.
    pub urlkey: String,
    /// 14-digit UTC timestamp, `YYYYMMDDHHMMSS`.
    pub timestamp: String,
    /// Original URL as captured.
    pub url: String,
    /// Bare MIME type, parameters stripped.
    pub mime: String,
    pub status: u16,
    /// SHA-256 hex of the record payload.
    pub digest: String,
    /// Record content byte length.
    pub length: u64,
    /// Byte offset of the record within its segment file.
    pub offset: u64,
    /// Segment file name the record lives in.
    pub filename: String,
}

/// Accumulates rows during the archive's lifetime and renders the sorted
/// index file at finish.
#[derive(Debug, Default)]
pub struct CdxBuilder {
    rows: Vec<CdxRow>,
}

impl CdxBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: CdxRow) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sort rows ascending by (urlkey, timestamp) and render the legend
    /// plus one space-separated line per row. The `-` column is the unused
    /// redirect field.
    #[must_use]
    pub fn serialize(&mut self) -> String {
        self.rows.sort_by(|a, b| {
            a.urlkey
                .cmp(&b.urlkey)
                .then_with(|| a.timestamp.cmp(&b.timestamp))
        });

        let mut out = String::with_capacity(64 + self.rows.len() * 128);
        out.push_str(CDX_LEGEND);
        out.push('\n');
        for row in &self.rows {
            let _ = writeln!(
                out,
                "{} {} {} {} {} {} - {} {} {}",
                row.urlkey,
                row.timestamp,
                row.url,
                row.mime,
                row.status,
                row.digest,
                row.length,
                row.offset,
                row.filename
            );
        }
        out
    }
}

/// 14-digit UTC timestamp used in CDX rows.
#[must_use]
pub fn cdx_timestamp(date: &DateTime<Utc>) -> String {
    date.format("%Y%m%d%H%M%S").to_string()
}

/// Strip MIME parameters: `text/html; charset=utf-8` → `text/html`.
#[must_use]
pub fn bare_mime(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_string()
}
