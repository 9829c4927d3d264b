//! Error types for the `webarc-core` crate.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WarcError>;

/// Failures surfaced by the archive writer.
///
/// Stream failures are unrecoverable for the archive that raised them: a
/// half-written record corrupts parsing of everything after it in that
/// segment, so the corrective action is the caller's (discard and start
/// fresh), never an internal retry.
#[derive(Debug, Error)]
pub enum WarcError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metadata serialization failed: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("archive already finished; no further writes are accepted")]
    ArchiveFinished,

    #[error("archive not started")]
    NotStarted,

    #[error("invalid writer options: {reason}")]
    InvalidOptions { reason: String },
}
