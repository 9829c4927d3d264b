//! The `WarcWriter` controller orchestrating framing, dedup, segments, and
//! the CDX index behind a small lifecycle API.

pub mod lifecycle;
pub mod write;

pub use lifecycle::WarcWriter;
