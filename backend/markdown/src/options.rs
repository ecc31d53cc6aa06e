//! Parse options for [`markdown_to_ir`](crate::markdown_to_ir).
//!
//! Every field is optional when deserialized; omitted fields take the
//! documented defaults and no combination is rejected.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::MarkdownError;

/// How headings are styled in the rendered text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    #[default]
    None,
    Bold,
}

impl FromStr for HeadingStyle {
    type Err = MarkdownError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(HeadingStyle::None),
            "bold" => Ok(HeadingStyle::Bold),
            other => Err(MarkdownError::UnknownHeadingStyle(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkdownParseOptions {
    /// Turn bare URLs and e-mail addresses into links.
    pub linkify: bool,
    /// Treat `||text||` as a spoiler.
    pub enable_spoilers: bool,
    pub heading_style: HeadingStyle,
    /// Literal text written at the start of every blockquote.
    pub blockquote_prefix: String,
    /// Recognize `<scheme:...>` autolinks. When off they stay literal text.
    pub autolink: bool,
}

impl Default for MarkdownParseOptions {
    fn default() -> Self {
        Self {
            linkify: true,
            enable_spoilers: false,
            heading_style: HeadingStyle::None,
            blockquote_prefix: String::new(),
            autolink: true,
        }
    }
}
