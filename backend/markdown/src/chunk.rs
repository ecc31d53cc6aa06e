//! IR chunking
//!
//! Splits an IR into length-bounded IRs for transports with a message size
//! cap. Every chunk carries its own spans, re-sliced to chunk-local offsets; a
//! span crossing a split point becomes one closed span per chunk.

use tracing::debug;

use crate::ir::MarkdownIr;
use crate::spans::{slice_link_spans, slice_style_spans};
use crate::split::{TextSplitter, WhitespaceSplitter};

/// Chunk `ir` into pieces of at most `limit` characters.
///
/// A `limit` of zero means unlimited. Empty text yields no chunks.
pub fn chunk_markdown_ir(ir: &MarkdownIr, limit: usize) -> Vec<MarkdownIr> {
    match chunk_markdown_ir_with(ir, limit, &WhitespaceSplitter) {
        Ok(chunks) => chunks,
        Err(never) => match never {},
    }
}

/// Chunk `ir` using a custom splitter. Splitter errors are returned as is.
pub fn chunk_markdown_ir_with<S: TextSplitter>(
    ir: &MarkdownIr,
    limit: usize,
    splitter: &S,
) -> Result<Vec<MarkdownIr>, S::Error> {
    if ir.is_empty() {
        return Ok(Vec::new());
    }
    if limit == 0 || ir.text.char_indices().nth(limit).is_none() {
        return Ok(vec![ir.clone()]);
    }

    let text = ir.text.as_str();
    let pieces = splitter.split(text, limit)?;
    let mut chunks = Vec::with_capacity(pieces.len());
    let mut cursor = 0;

    for (index, piece) in pieces.iter().enumerate() {
        if piece.is_empty() {
            continue;
        }
        // Splitters drop whitespace at split points, so re-anchor the cursor.
        if index > 0 || !text[cursor..].starts_with(piece) {
            cursor = skip_whitespace(text, cursor);
        }
        let start = cursor;
        let end = floor_char_boundary(text, (start + piece.len()).min(text.len()));
        chunks.push(MarkdownIr {
            text: (*piece).to_string(),
            styles: slice_style_spans(&ir.styles, start, end),
            links: slice_link_spans(&ir.links, start, end),
        });
        cursor = end;
    }

    debug!(
        limit,
        text_len = text.len(),
        chunks = chunks.len(),
        "chunked markdown IR"
    );
    Ok(chunks)
}

fn skip_whitespace(text: &str, from: usize) -> usize {
    text[from..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(idx, _)| from + idx)
        .unwrap_or(text.len())
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::MarkdownStyle::{Bold, Italic};
    use crate::ir::{MarkdownLinkSpan, MarkdownStyleSpan};

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(chunk_markdown_ir(&MarkdownIr::default(), 10).is_empty());
    }

    #[test]
    fn zero_limit_and_short_text_pass_through() {
        let ir = MarkdownIr {
            text: "short".to_string(),
            styles: vec![MarkdownStyleSpan::new(0, 5, Bold)],
            links: Vec::new(),
        };
        assert_eq!(chunk_markdown_ir(&ir, 0), vec![ir.clone()]);
        assert_eq!(chunk_markdown_ir(&ir, 5), vec![ir.clone()]);
    }

    #[test]
    fn bold_span_straddling_split_becomes_two_spans() {
        // 20 plain characters, then a 50 character bold run split at offset 30.
        let plain = "a".repeat(19);
        let bold_head = "b".repeat(10);
        let bold_tail = "c".repeat(39);
        let text = format!("{plain} {bold_head} {bold_tail}");
        let ir = MarkdownIr {
            text: text.clone(),
            styles: vec![MarkdownStyleSpan::new(20, 70, Bold)],
            links: Vec::new(),
        };

        let chunks = chunk_markdown_ir(&ir, 40);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, format!("{plain} {bold_head}"));
        assert_eq!(chunks[0].styles, vec![MarkdownStyleSpan::new(20, 30, Bold)]);
        assert_eq!(chunks[1].text, bold_tail);
        assert_eq!(chunks[1].styles, vec![MarkdownStyleSpan::new(0, 39, Bold)]);
    }

    #[test]
    fn links_are_resliced_per_chunk() {
        let ir = MarkdownIr {
            text: "one two three four".to_string(),
            styles: vec![MarkdownStyleSpan::new(4, 13, Italic)],
            links: vec![MarkdownLinkSpan::new(8, 18, "http://x.test")],
        };
        let chunks = chunk_markdown_ir(&ir, 8);
        assert_eq!(
            chunks.iter().map(|c| c.text.as_str()).collect::<Vec<_>>(),
            vec!["one two", "three", "four"]
        );
        assert_eq!(chunks[0].styles, vec![MarkdownStyleSpan::new(4, 7, Italic)]);
        assert_eq!(chunks[1].styles, vec![MarkdownStyleSpan::new(0, 5, Italic)]);
        assert_eq!(chunks[1].links, vec![MarkdownLinkSpan::new(0, 5, "http://x.test")]);
        assert_eq!(chunks[2].links, vec![MarkdownLinkSpan::new(0, 4, "http://x.test")]);
        assert!(chunks[2].styles.is_empty());
    }

    struct FailingSplitter;

    impl TextSplitter for FailingSplitter {
        type Error = String;

        fn split<'t>(&self, _text: &'t str, _limit: usize) -> Result<Vec<&'t str>, Self::Error> {
            Err("splitter unavailable".to_string())
        }
    }

    #[test]
    fn splitter_errors_propagate() {
        let ir = MarkdownIr {
            text: "long enough text".to_string(),
            ..Default::default()
        };
        assert_eq!(
            chunk_markdown_ir_with(&ir, 4, &FailingSplitter),
            Err("splitter unavailable".to_string())
        );
    }
}
