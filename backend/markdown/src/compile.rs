//! Markdown to IR compilation
//!
//! tokenize → linkify → spoilers → render → normalize. Each call owns its
//! parser and render state; nothing is shared between calls.

use tracing::debug;

use crate::ir::MarkdownIr;
use crate::linkify::linkify_tokens;
use crate::normalize::normalize_ir;
use crate::options::MarkdownParseOptions;
use crate::render::render_ir;
use crate::spoiler::apply_spoiler_tokens;
use crate::token::{Token, tokenize};

/// Compile Markdown into text with style and link spans.
pub fn markdown_to_ir(markdown: &str, options: &MarkdownParseOptions) -> MarkdownIr {
    let mut tokens = tokenize(markdown, options);
    if options.linkify {
        linkify_tokens(&mut tokens);
    }
    let ir = render_tokens(tokens, options);
    debug!(
        input_len = markdown.len(),
        text_len = ir.text.len(),
        styles = ir.styles.len(),
        links = ir.links.len(),
        "compiled markdown IR"
    );
    ir
}

/// Compile an already tokenized document.
///
/// Spoiler markers are injected when enabled; linkification is left to
/// whoever produced the tokens.
pub fn render_tokens(mut tokens: Vec<Token>, options: &MarkdownParseOptions) -> MarkdownIr {
    if options.enable_spoilers {
        apply_spoiler_tokens(&mut tokens);
    }
    normalize_ir(render_ir(&tokens, options))
}
