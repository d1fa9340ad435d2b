//! Submission records and the remote-log payload schema.
//!
//! Everything in this crate is a total mapping over arbitrary strings:
//! formatting never validates and never fails, so there is no error type.

mod types;

pub use types::{compact_from_display, FormSource, SheetPayload, SubmissionRecord};
