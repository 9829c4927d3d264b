//! File-level I/O: segment ownership, rotation, and gzip framing.

pub mod segment;

pub use segment::{BlockPlacement, SegmentWriter};
