//! Segment file ownership and rotation.
//!
//! Responsibilities:
//! - Keep exactly one output handle open at a time; writes land in program
//!   order through it.
//! - Apply size-based rotation and the `<name>-NNNNN.warc[.gz]` naming
//!   scheme (sequence starts at `00002`).
//! - Compress each record block as an independent gzip member when
//!   compression is on, so every recorded offset addresses a boundary a
//!   reader can seek to and inflate.
//! - Account bytes on disk for CDX offsets and rotation decisions.
//!
//! Writes go through blocking `write_all`, which bounds memory: a producer
//! faster than the disk simply blocks until the bytes drain.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::constants::SEGMENT_SEQUENCE_WIDTH;
use crate::error::Result;

/// Where a record block landed within its segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPlacement {
    /// Byte offset of the block within the current segment file.
    pub offset: u64,
    /// Bytes the block occupies on disk (post-compression under gzip).
    pub written: u64,
}

/// Owner of the single open segment stream.
#[derive(Debug)]
pub struct SegmentWriter {
    dir: PathBuf,
    base_name: String,
    gzip: bool,
    max_segment_bytes: u64,
    out: BufWriter<File>,
    sequence: u32,
    current_path: PathBuf,
    first_path: PathBuf,
    segment_bytes: u64,
    total_bytes: u64,
}

impl SegmentWriter {
    /// Create the output directory (recursively) and open the first segment.
    pub fn create(dir: &Path, base_name: &str, gzip: bool, max_segment_bytes: u64) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let first_path = dir.join(segment_file_name(base_name, 1, gzip));
        let out = BufWriter::new(File::create(&first_path)?);
        tracing::info!(segment.path = %first_path.display(), "opened first segment");
        Ok(Self {
            dir: dir.to_path_buf(),
            base_name: base_name.to_string(),
            gzip,
            max_segment_bytes,
            out,
            sequence: 1,
            current_path: first_path.clone(),
            first_path,
            segment_bytes: 0,
            total_bytes: 0,
        })
    }

    /// True once the current segment has grown past the rotation threshold.
    /// The controller checks this before a record (or record pair), never
    /// in the middle of one.
    #[must_use]
    pub fn should_rotate(&self) -> bool {
        self.segment_bytes > self.max_segment_bytes
    }

    /// Close the current segment (fully drained) and open the next one in
    /// sequence.
    pub fn rotate(&mut self) -> Result<()> {
        self.out.flush()?;
        self.out.get_ref().sync_all()?;

        self.sequence += 1;
        let path = self
            .dir
            .join(segment_file_name(&self.base_name, self.sequence, self.gzip));
        tracing::info!(
            segment.sequence = self.sequence,
            segment.path = %path.display(),
            "rotating segment"
        );
        self.out = BufWriter::new(File::create(&path)?);
        self.current_path = path;
        self.segment_bytes = 0;
        Ok(())
    }

    /// Append one framed record block, gzip-wrapping it when enabled.
    pub fn append(&mut self, block: &[u8]) -> Result<BlockPlacement> {
        let offset = self.segment_bytes;
        let written = if self.gzip {
            let capacity = block.len() / 2 + 64;
            let mut encoder = GzEncoder::new(Vec::with_capacity(capacity), Compression::default());
            encoder.write_all(block)?;
            let member = encoder.finish()?;
            self.out.write_all(&member)?;
            member.len() as u64
        } else {
            self.out.write_all(block)?;
            block.len() as u64
        };
        self.segment_bytes += written;
        self.total_bytes += written;
        Ok(BlockPlacement { offset, written })
    }

    /// Flush and fsync the open segment. Called once at archive finish.
    pub fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        self.out.get_ref().sync_all()?;
        Ok(())
    }

    /// File name (no directory) of the segment currently being written.
    #[must_use]
    pub fn current_file_name(&self) -> String {
        self.current_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Path of the first segment; this is the archive's `warc_path`.
    #[must_use]
    pub fn first_path(&self) -> &Path {
        &self.first_path
    }

    #[must_use]
    pub fn file_count(&self) -> u64 {
        u64::from(self.sequence)
    }

    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    #[must_use]
    pub fn segment_bytes(&self) -> u64 {
        self.segment_bytes
    }
}

fn segment_file_name(base: &str, sequence: u32, gzip: bool) -> String {
    let ext = if gzip { "warc.gz" } else { "warc" };
    if sequence == 1 {
        format!("{base}.{ext}")
    } else {
        format!("{base}-{sequence:0width$}.{ext}", width = SEGMENT_SEQUENCE_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn naming_follows_sequence_scheme() {
        assert_eq!(segment_file_name("site", 1, false), "site.warc");
        assert_eq!(segment_file_name("site", 2, false), "site-00002.warc");
        assert_eq!(segment_file_name("site", 13, true), "site-00013.warc.gz");
    }

    #[test]
    fn append_accounts_offsets() {
        let dir = tempdir().expect("tmp");
        let mut writer = SegmentWriter::create(dir.path(), "site", false, 1024).expect("create");

        let first = writer.append(b"aaaa").expect("append");
        let second = writer.append(b"bb").expect("append");
        assert_eq!(first.offset, 0);
        assert_eq!(first.written, 4);
        assert_eq!(second.offset, 4);
        assert_eq!(writer.total_bytes(), 6);
    }

    #[test]
    fn rotation_resets_segment_accounting() {
        let dir = tempdir().expect("tmp");
        let mut writer = SegmentWriter::create(dir.path(), "site", false, 8).expect("create");

        writer.append(&[0u8; 16]).expect("append");
        assert!(writer.should_rotate());
        writer.rotate().expect("rotate");

        assert_eq!(writer.segment_bytes(), 0);
        assert_eq!(writer.file_count(), 2);
        assert_eq!(writer.current_file_name(), "site-00002.warc");
        assert!(dir.path().join("site-00002.warc").exists());
    }

    #[test]
    fn gzip_blocks_are_independent_members() {
        let dir = tempdir().expect("tmp");
        let mut writer = SegmentWriter::create(dir.path(), "site", true, 1024).expect("create");

        let first = writer.append(b"first block").expect("append");
        let second = writer.append(b"second block").expect("append");
        writer.finish().expect("finish");

        let bytes = fs::read(dir.path().join("site.warc.gz")).expect("read");
        assert_eq!(bytes.len() as u64, first.written + second.written);

        // Each recorded offset starts a member a reader can inflate alone.
        let mut inflated = String::new();
        GzDecoder::new(&bytes[second.offset as usize..])
            .read_to_string(&mut inflated)
            .expect("inflate second member");
        assert_eq!(inflated, "second block");
    }
}
