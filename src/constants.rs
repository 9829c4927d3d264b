//! Shared constants for WARC framing and archive layout.

/// Version line emitted at the top of every record.
pub const WARC_VERSION: &str = "WARC/1.1";

/// Default segment rotation threshold: 1 GiB.
pub const DEFAULT_MAX_SEGMENT_BYTES: u64 = 1024 * 1024 * 1024;

/// Width of the zero-padded sequence number in rotated segment names.
pub const SEGMENT_SEQUENCE_WIDTH: usize = 5;

/// Fixed legend line at the top of every CDX file.
pub const CDX_LEGEND: &str = " CDX N b a m s k r M S V g";

/// Profile URI asserted by revisit records for byte-identical payloads.
pub const REVISIT_PROFILE_IDENTICAL_DIGEST: &str =
    "http://netpreserve.org/warc/1.1/revisit/identical-payload-digest";

/// `software` field recorded in every segment's warcinfo record.
pub const SOFTWARE: &str = concat!("webarc-core/", env!("CARGO_PKG_VERSION"));

/// `format` field recorded in every segment's warcinfo record.
pub const WARC_FORMAT: &str = "WARC File Format 1.1";
