use tracing::trace;

use crate::ir::{MarkdownIr, MarkdownStyle};
use crate::spans::{clamp_link_spans, clamp_style_spans, merge_style_spans};

/// Trim, clamp and canonicalize a freshly rendered IR.
///
/// Trailing whitespace is removed except where it belongs to a code block.
pub fn normalize_ir(raw: MarkdownIr) -> MarkdownIr {
    let MarkdownIr {
        mut text,
        styles,
        links,
    } = raw;

    let trimmed_len = text.trim_end().len();
    let code_block_end = styles
        .iter()
        .filter(|span| span.style == MarkdownStyle::CodeBlock)
        .map(|span| span.end)
        .max()
        .unwrap_or(0);
    let final_len = trimmed_len.max(code_block_end).min(text.len());
    text.truncate(final_len);

    let clamped_styles = clamp_style_spans(&styles, final_len);
    let links = clamp_link_spans(&links, final_len);
    let dropped = styles.len() - clamped_styles.len();
    if dropped > 0 {
        trace!(dropped, final_len, "dropped empty style spans");
    }

    MarkdownIr {
        text,
        styles: merge_style_spans(&clamped_styles),
        links,
    }
}
