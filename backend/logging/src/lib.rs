//! Structured logging for the warelay tools.
//!
//! Console and rolling NDJSON file output, plus redaction of message previews
//! before they reach a log line.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::{redact_preview, redact_sensitive_data};
