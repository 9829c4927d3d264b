//! Builder-style options used when constructing a `WarcWriter`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_SEGMENT_BYTES;
use crate::error::{Result, WarcError};

fn default_max_segment_bytes() -> u64 {
    DEFAULT_MAX_SEGMENT_BYTES
}

/// Static configuration for an archive writer.
///
/// Set only what you need through the builder; everything has a sensible
/// default except the output directory and base name, which default to the
/// current directory and `archive`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarcWriterOptions {
    /// Directory all archive files are written into (created recursively).
    pub output_dir: PathBuf,
    /// Base name for segment and index files, without extension.
    pub base_name: String,
    /// Rotate to a new segment once the current one exceeds this many bytes.
    #[serde(default = "default_max_segment_bytes")]
    pub max_segment_bytes: u64,
    /// Compress each record as an independent gzip member (`.warc.gz`).
    #[serde(default)]
    pub gzip: bool,
    /// Descriptive fields recorded in every segment's warcinfo record,
    /// rendered after the built-in `software`/`format`/`isPartOf` lines.
    #[serde(default)]
    pub warcinfo_fields: BTreeMap<String, String>,
}

impl Default for WarcWriterOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            base_name: "archive".to_string(),
            max_segment_bytes: DEFAULT_MAX_SEGMENT_BYTES,
            gzip: false,
            warcinfo_fields: BTreeMap::new(),
        }
    }
}

impl WarcWriterOptions {
    /// Start a fluent builder for `WarcWriterOptions`.
    #[must_use]
    pub fn builder() -> WarcWriterOptionsBuilder {
        WarcWriterOptionsBuilder::default()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.base_name.is_empty() {
            return Err(WarcError::InvalidOptions {
                reason: "base_name must not be empty".to_string(),
            });
        }
        if self.max_segment_bytes == 0 {
            return Err(WarcError::InvalidOptions {
                reason: "max_segment_bytes must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct WarcWriterOptionsBuilder {
    inner: WarcWriterOptions,
}

impl WarcWriterOptionsBuilder {
    #[must_use]
    pub fn output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.inner.output_dir = dir.into();
        self
    }

    #[must_use]
    pub fn base_name<S: Into<String>>(mut self, name: S) -> Self {
        self.inner.base_name = name.into();
        self
    }

    #[must_use]
    pub fn max_segment_bytes(mut self, bytes: u64) -> Self {
        self.inner.max_segment_bytes = bytes;
        self
    }

    #[must_use]
    pub fn gzip(mut self, gzip: bool) -> Self {
        self.inner.gzip = gzip;
        self
    }

    /// Add one descriptive field to every segment's warcinfo record.
    #[must_use]
    pub fn warcinfo_field<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.inner.warcinfo_fields.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn build(self) -> WarcWriterOptions {
        self.inner
    }
}
