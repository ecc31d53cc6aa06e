use thiserror::Error;

/// Errors raised while interpreting caller-supplied names.
///
/// Compilation and chunking themselves never fail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkdownError {
    #[error("unknown heading style '{0}' (expected 'none' or 'bold')")]
    UnknownHeadingStyle(String),

    #[error("unknown channel '{0}' (expected 'whatsapp' or 'plain')")]
    UnknownChannel(String),
}
