//! Markdown Intermediate Representation
//!
//! Flat text plus byte-offset style and link annotations. Channels that only
//! accept plain text re-encode these spans into their own formatting syntax.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Inline formatting kinds carried by the IR.
///
/// Variants are declared in the order of their serialized names, so the derived
/// `Ord` is the name order used when canonicalizing spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkdownStyle {
    Bold,
    Code,
    CodeBlock,
    Italic,
    Spoiler,
    Strikethrough,
}

impl MarkdownStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            MarkdownStyle::Bold => "bold",
            MarkdownStyle::Code => "code",
            MarkdownStyle::CodeBlock => "code_block",
            MarkdownStyle::Italic => "italic",
            MarkdownStyle::Spoiler => "spoiler",
            MarkdownStyle::Strikethrough => "strikethrough",
        }
    }
}

/// A styled half-open byte range `[start, end)` of [`MarkdownIr::text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownStyleSpan {
    pub start: usize,
    pub end: usize,
    pub style: MarkdownStyle,
}

impl MarkdownStyleSpan {
    pub fn new(start: usize, end: usize, style: MarkdownStyle) -> Self {
        Self { start, end, style }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// A link target attached to a half-open byte range of the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownLinkSpan {
    pub start: usize,
    pub end: usize,
    pub href: String,
}

impl MarkdownLinkSpan {
    pub fn new(start: usize, end: usize, href: impl Into<String>) -> Self {
        Self {
            start,
            end,
            href: href.into(),
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Rendered text with its style and link annotations.
///
/// `styles` is sorted by `(start, end, style)` and never holds two spans of the
/// same style that touch or overlap. Links are kept in closing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownIr {
    pub text: String,
    pub styles: Vec<MarkdownStyleSpan>,
    pub links: Vec<MarkdownLinkSpan>,
}

impl MarkdownIr {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text covered by a span, or `None` if the range is out of bounds.
    pub fn slice(&self, range: Range<usize>) -> Option<&str> {
        self.text.get(range)
    }
}
