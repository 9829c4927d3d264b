#![deny(clippy::all, clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![allow(clippy::module_name_repetitions)]
//
// Documentation lints: internal/self-documenting functions don't need
// extensive docs; public APIs should still have proper documentation.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
//
// Casts here are bounded by real-world constraints (buffer and file
// sizes); widening usize counters into u64 stats is lossless on every
// supported target.
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_possible_truncation)]
//
// Archive write paths naturally run long; breaking them up hurts
// readability.
#![allow(clippy::too_many_lines)]
#![allow(clippy::len_without_is_empty)]

/// The webarc-core crate version (matches `Cargo.toml`).
pub const WEBARC_CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod archive;
pub mod cdx;
pub mod constants;
pub mod dedup;
pub mod error;
pub mod framer;
pub mod io;
pub mod observer;
pub mod surt;
pub mod types;

pub use archive::WarcWriter;
pub use cdx::{CdxBuilder, CdxRow, bare_mime, cdx_timestamp};
pub use dedup::{DedupEntry, DedupIndex};
pub use error::{Result, WarcError};
pub use framer::frame_record;
pub use observer::ArchiveObserver;
pub use surt::to_surt;
pub use types::{
    ExtraHeaders, FinishedArchive, HttpRequest, HttpResponse, RecordId, RecordKind, WarcRecord,
    WarcStats, WarcWriterOptions, WarcWriterOptionsBuilder,
};
