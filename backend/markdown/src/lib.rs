//! Markdown to styled-text compiler for plain-text messaging channels.
//!
//! Converts Markdown into a flat text string plus byte-offset style and link
//! spans ([`MarkdownIr`]), splits that IR into length-bounded chunks for
//! transports with a message size cap, and re-encodes chunks into a channel's
//! own formatting syntax.

pub mod chunk;
pub mod compile;
pub mod error;
pub mod format;
pub mod ir;
pub mod linkify;
pub mod normalize;
pub mod options;
pub mod render;
pub mod spans;
pub mod split;
pub mod spoiler;
pub mod token;

pub use chunk::{chunk_markdown_ir, chunk_markdown_ir_with};
pub use compile::{markdown_to_ir, render_tokens};
pub use error::MarkdownError;
pub use format::{Channel, format_ir};
pub use ir::{MarkdownIr, MarkdownLinkSpan, MarkdownStyle, MarkdownStyleSpan};
pub use options::{HeadingStyle, MarkdownParseOptions};
pub use split::{TextSplitter, WhitespaceSplitter, split_text};
pub use token::{Token, TokenKind, tokenize};
