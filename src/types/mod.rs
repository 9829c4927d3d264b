//! Public types exposed by the `webarc-core` crate.

pub mod http;
pub mod options;
pub mod record;
pub mod stats;

pub use http::{HttpRequest, HttpResponse};
pub use options::{WarcWriterOptions, WarcWriterOptionsBuilder};
pub use record::{ExtraHeaders, RecordId, RecordKind, WarcRecord};
pub use stats::{FinishedArchive, WarcStats};
