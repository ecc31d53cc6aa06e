//! Length-bounded text splitting
//!
//! Limits count characters, the unit messaging transports enforce on message
//! bodies. Pieces are sub-slices of the input.

use std::convert::Infallible;

/// Splits text into pieces of at most `limit` characters.
///
/// Joining the pieces with whitespace between consecutive pieces must give
/// back the input text. Only whitespace may be dropped at a split point.
pub trait TextSplitter {
    type Error;

    fn split<'t>(&self, text: &'t str, limit: usize) -> Result<Vec<&'t str>, Self::Error>;
}

/// Default splitter: prefers line breaks, then word boundaries, then a hard
/// break at the limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceSplitter;

impl TextSplitter for WhitespaceSplitter {
    type Error = Infallible;

    fn split<'t>(&self, text: &'t str, limit: usize) -> Result<Vec<&'t str>, Self::Error> {
        Ok(split_text(text, limit))
    }
}

pub fn split_text(text: &str, limit: usize) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    if limit == 0 || text.char_indices().nth(limit).is_none() {
        return vec![text];
    }

    let mut pieces = Vec::new();
    let mut remaining = text;
    // `nth(limit)` exists exactly when more than `limit` characters remain; its
    // byte offset is the end of the window.
    while let Some((window_end, _)) = remaining.char_indices().nth(limit) {
        let window = &remaining[..window_end];
        let break_at = window
            .rfind('\n')
            .filter(|&idx| idx > 0)
            .or_else(|| {
                window
                    .char_indices()
                    .rev()
                    .find(|(_, c)| c.is_whitespace())
                    .map(|(idx, _)| idx)
                    .filter(|&idx| idx > 0)
            })
            .unwrap_or(window_end);

        let piece = remaining[..break_at].trim_end();
        if !piece.is_empty() {
            pieces.push(piece);
        }
        remaining = remaining[break_at..].trim_start();
    }
    if !remaining.is_empty() {
        pieces.push(remaining);
    }
    pieces
}
