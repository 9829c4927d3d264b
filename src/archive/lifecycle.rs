//! Lifecycle management for `WarcWriter`.
//!
//! Responsibilities:
//! - Hold the `Uninitialized → Started → Finished` state machine; writes
//!   while uninitialized start the archive implicitly, writes after finish
//!   are a hard error.
//! - Open the output directory and first segment, and write each segment's
//!   warcinfo record so every file is independently self-describing.
//! - Close the stream and materialize the CDX index at finish.
//! - Keep the stats snapshot consistent with what is on disk.

use std::fs;

use crate::cdx::CdxBuilder;
use crate::dedup::DedupIndex;
use crate::error::{Result, WarcError};
use crate::io::SegmentWriter;
use crate::observer::ArchiveObserver;
use crate::types::{FinishedArchive, RecordId, WarcStats, WarcWriterOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriterState {
    Uninitialized,
    Started,
    Finished,
}

/// Archive controller: receives captured exchanges and resource bytes and
/// records them as WARC segments plus a CDX index.
///
/// Single-writer by design. All operations take `&mut self` and writes
/// land in call order; offset bookkeeping depends on it. Callers needing
/// concurrency serialize access externally.
pub struct WarcWriter {
    pub(crate) options: WarcWriterOptions,
    pub(crate) state: WriterState,
    pub(crate) segments: Option<SegmentWriter>,
    pub(crate) dedup: DedupIndex,
    pub(crate) cdx: CdxBuilder,
    /// Id of the current segment's warcinfo record; every other record in
    /// the segment points back at it.
    pub(crate) warcinfo_id: Option<RecordId>,
    pub(crate) record_count: u64,
    pub(crate) duplicates_skipped: u64,
    pub(crate) observer: Option<Box<dyn ArchiveObserver>>,
}

impl WarcWriter {
    #[must_use]
    pub fn new(options: WarcWriterOptions) -> Self {
        Self {
            options,
            state: WriterState::Uninitialized,
            segments: None,
            dedup: DedupIndex::new(),
            cdx: CdxBuilder::new(),
            warcinfo_id: None,
            record_count: 0,
            duplicates_skipped: 0,
            observer: None,
        }
    }

    /// Like [`new`](Self::new), with an observer receiving lifecycle
    /// notifications.
    #[must_use]
    pub fn with_observer(options: WarcWriterOptions, observer: Box<dyn ArchiveObserver>) -> Self {
        let mut writer = Self::new(options);
        writer.observer = Some(observer);
        writer
    }

    /// Create the output directory, open the first segment, and write its
    /// warcinfo record. Idempotent while started; an error once finished.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            WriterState::Started => Ok(()),
            WriterState::Finished => Err(WarcError::ArchiveFinished),
            WriterState::Uninitialized => {
                self.options.validate()?;
                let segments = SegmentWriter::create(
                    &self.options.output_dir,
                    &self.options.base_name,
                    self.options.gzip,
                    self.options.max_segment_bytes,
                )?;
                self.segments = Some(segments);
                self.state = WriterState::Started;
                self.write_warcinfo()?;

                tracing::info!(
                    archive.base = %self.options.base_name,
                    archive.gzip = self.options.gzip,
                    archive.max_segment_bytes = self.options.max_segment_bytes,
                    "archive started"
                );
                if let Some(observer) = &self.observer {
                    let filename = self.current_file_name().unwrap_or_default();
                    observer.on_started(&filename);
                }
                Ok(())
            }
        }
    }

    /// Flush and close the stream, serialize the CDX index, and return the
    /// final paths and counters. Terminal: any later `write*` or `finish`
    /// fails with [`WarcError::ArchiveFinished`].
    pub fn finish(&mut self) -> Result<FinishedArchive> {
        if self.state == WriterState::Finished {
            return Err(WarcError::ArchiveFinished);
        }
        // An archive finished before any write still yields a valid
        // warcinfo-only segment and an empty index.
        self.ensure_started()?;

        let Some(segments) = self.segments.as_mut() else {
            return Err(WarcError::NotStarted);
        };
        segments.finish()?;
        let warc_path = segments.first_path().to_path_buf();

        let cdx_path = self
            .options
            .output_dir
            .join(format!("{}.cdx", self.options.base_name));
        fs::write(&cdx_path, self.cdx.serialize())?;

        self.state = WriterState::Finished;
        let stats = self.stats();
        tracing::info!(
            archive.records = stats.record_count,
            archive.files = stats.file_count,
            archive.bytes = stats.total_bytes,
            archive.cdx_rows = stats.cdx_records,
            archive.duplicates = stats.duplicates_skipped,
            "archive finished"
        );
        if let Some(observer) = &self.observer {
            observer.on_finished(&stats);
        }

        Ok(FinishedArchive {
            warc_path,
            cdx_path,
            stats,
        })
    }

    /// Live counter snapshot; callable in any state.
    #[must_use]
    pub fn stats(&self) -> WarcStats {
        WarcStats {
            record_count: self.record_count,
            file_count: self.segments.as_ref().map_or(0, SegmentWriter::file_count),
            total_bytes: self.segments.as_ref().map_or(0, SegmentWriter::total_bytes),
            cdx_records: self.cdx.len() as u64,
            unique_resources: self.dedup.len() as u64,
            duplicates_skipped: self.duplicates_skipped,
        }
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.state != WriterState::Uninitialized
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == WriterState::Finished
    }

    /// File name of the segment currently being written, if any.
    #[must_use]
    pub fn current_file_name(&self) -> Option<String> {
        self.segments.as_ref().map(SegmentWriter::current_file_name)
    }

    /// Gate shared by every write operation: finished archives reject
    /// writes outright, uninitialized ones start implicitly.
    pub(crate) fn ensure_started(&mut self) -> Result<()> {
        match self.state {
            WriterState::Started => Ok(()),
            WriterState::Finished => Err(WarcError::ArchiveFinished),
            WriterState::Uninitialized => self.start(),
        }
    }
}

impl Drop for WarcWriter {
    fn drop(&mut self) {
        // Safety net mirroring explicit finish; errors here have no caller
        // left to report to.
        if self.state == WriterState::Started {
            let _ = self.finish();
        }
    }
}
