//! The WARC record model.
//!
//! Records are a true sum type: each variant carries only the fields legal
//! for its kind, so a warcinfo with a `refers-to` (or a revisit with
//! content) cannot be constructed. The framer derives everything else —
//! `Content-Length` in particular — from the variant itself.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// URN-form record identifier, e.g. `urn:uuid:5f2a…`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    /// Mint a fresh globally-unique identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("urn:uuid:{}", Uuid::new_v4()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Angle-bracketed form used as a WARC header value.
    #[must_use]
    pub fn bracketed(&self) -> String {
        format!("<{}>", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discriminant of a [`WarcRecord`], as spelled in the `WARC-Type` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Warcinfo,
    Request,
    Response,
    Resource,
    Metadata,
    Revisit,
}

impl RecordKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warcinfo => "warcinfo",
            Self::Request => "request",
            Self::Response => "response",
            Self::Resource => "resource",
            Self::Metadata => "metadata",
            Self::Revisit => "revisit",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra header lines a caller may attach to a record; passed through by
/// the framer after the type-specific headers.
pub type ExtraHeaders = Vec<(String, String)>;

/// One fully-populated WARC record.
///
/// `payload_digest` fields hold the bare SHA-256 hex of the payload; the
/// framer renders them as `sha-256:<hex>`. Revisit carries no content
/// field at all — its `Content-Length` is zero by construction.
#[derive(Debug, Clone)]
pub enum WarcRecord {
    Warcinfo {
        id: RecordId,
        date: DateTime<Utc>,
        /// Name of the segment file this record opens.
        filename: String,
        /// `application/warc-fields` body describing the writing tool.
        content: Vec<u8>,
    },
    Request {
        id: RecordId,
        date: DateTime<Utc>,
        target_uri: String,
        /// The response (or revisit) record captured in the same exchange.
        concurrent_to: RecordId,
        warcinfo_id: RecordId,
        content_type: String,
        content: Vec<u8>,
        extra_headers: ExtraHeaders,
    },
    Response {
        id: RecordId,
        date: DateTime<Utc>,
        target_uri: String,
        warcinfo_id: RecordId,
        content_type: String,
        payload_digest: String,
        content: Vec<u8>,
        extra_headers: ExtraHeaders,
    },
    Resource {
        id: RecordId,
        date: DateTime<Utc>,
        target_uri: String,
        warcinfo_id: RecordId,
        content_type: String,
        payload_digest: String,
        content: Vec<u8>,
        extra_headers: ExtraHeaders,
    },
    Metadata {
        id: RecordId,
        date: DateTime<Utc>,
        target_uri: String,
        warcinfo_id: RecordId,
        content_type: String,
        content: Vec<u8>,
    },
    Revisit {
        id: RecordId,
        date: DateTime<Utc>,
        target_uri: String,
        warcinfo_id: RecordId,
        /// The record that first stored these bytes for this URL.
        refers_to: RecordId,
        payload_digest: String,
    },
}

impl WarcRecord {
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Warcinfo { .. } => RecordKind::Warcinfo,
            Self::Request { .. } => RecordKind::Request,
            Self::Response { .. } => RecordKind::Response,
            Self::Resource { .. } => RecordKind::Resource,
            Self::Metadata { .. } => RecordKind::Metadata,
            Self::Revisit { .. } => RecordKind::Revisit,
        }
    }

    #[must_use]
    pub fn id(&self) -> &RecordId {
        match self {
            Self::Warcinfo { id, .. }
            | Self::Request { id, .. }
            | Self::Response { id, .. }
            | Self::Resource { id, .. }
            | Self::Metadata { id, .. }
            | Self::Revisit { id, .. } => id,
        }
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        match self {
            Self::Warcinfo { date, .. }
            | Self::Request { date, .. }
            | Self::Response { date, .. }
            | Self::Resource { date, .. }
            | Self::Metadata { date, .. }
            | Self::Revisit { date, .. } => *date,
        }
    }

    /// Record content bytes; empty for revisit records.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        match self {
            Self::Warcinfo { content, .. }
            | Self::Request { content, .. }
            | Self::Response { content, .. }
            | Self::Resource { content, .. }
            | Self::Metadata { content, .. } => content,
            Self::Revisit { .. } => &[],
        }
    }

    /// Target URI; absent only on warcinfo records.
    #[must_use]
    pub fn target_uri(&self) -> Option<&str> {
        match self {
            Self::Warcinfo { .. } => None,
            Self::Request { target_uri, .. }
            | Self::Response { target_uri, .. }
            | Self::Resource { target_uri, .. }
            | Self::Metadata { target_uri, .. }
            | Self::Revisit { target_uri, .. } => Some(target_uri),
        }
    }
}
