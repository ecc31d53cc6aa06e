//! Span clamping, merging and re-slicing.

use crate::ir::{MarkdownLinkSpan, MarkdownStyle, MarkdownStyleSpan};

/// Clamp spans into `[0, max_len]`, dropping any left empty.
pub fn clamp_style_spans(spans: &[MarkdownStyleSpan], max_len: usize) -> Vec<MarkdownStyleSpan> {
    spans
        .iter()
        .filter_map(|span| {
            let start = span.start.min(max_len);
            let end = span.end.min(max_len).max(start);
            (end > start).then(|| MarkdownStyleSpan::new(start, end, span.style))
        })
        .collect()
}

pub fn clamp_link_spans(spans: &[MarkdownLinkSpan], max_len: usize) -> Vec<MarkdownLinkSpan> {
    spans
        .iter()
        .filter_map(|span| {
            let start = span.start.min(max_len);
            let end = span.end.min(max_len).max(start);
            (end > start).then(|| MarkdownLinkSpan::new(start, end, span.href.clone()))
        })
        .collect()
}

/// Canonicalize style spans.
///
/// Spans are ordered by `(start, end, style)`; a span that starts at or before
/// the end of the previous span of the same style extends it, even when spans
/// of other styles sit between the two.
pub fn merge_style_spans(spans: &[MarkdownStyleSpan]) -> Vec<MarkdownStyleSpan> {
    let mut sorted = spans.to_vec();
    sorted.sort_by_key(span_order);

    let mut merged: Vec<MarkdownStyleSpan> = Vec::with_capacity(sorted.len());
    for span in sorted {
        if let Some(prev) = merged.iter_mut().rev().find(|prev| prev.style == span.style) {
            if span.start <= prev.end {
                prev.end = prev.end.max(span.end);
                continue;
            }
        }
        merged.push(span);
    }
    // Extending an end can move a span past a neighbour with the same start.
    merged.sort_by_key(span_order);
    merged
}

fn span_order(span: &MarkdownStyleSpan) -> (usize, usize, MarkdownStyle) {
    (span.start, span.end, span.style)
}

/// Spans overlapping `[start, end)`, clipped and made relative to `start`.
pub fn slice_style_spans(
    spans: &[MarkdownStyleSpan],
    start: usize,
    end: usize,
) -> Vec<MarkdownStyleSpan> {
    if spans.is_empty() {
        return Vec::new();
    }
    let sliced: Vec<MarkdownStyleSpan> = spans
        .iter()
        .filter_map(|span| {
            let slice_start = span.start.max(start);
            let slice_end = span.end.min(end);
            (slice_end > slice_start).then(|| {
                MarkdownStyleSpan::new(slice_start - start, slice_end - start, span.style)
            })
        })
        .collect();
    merge_style_spans(&sliced)
}

pub fn slice_link_spans(spans: &[MarkdownLinkSpan], start: usize, end: usize) -> Vec<MarkdownLinkSpan> {
    spans
        .iter()
        .filter_map(|span| {
            let slice_start = span.start.max(start);
            let slice_end = span.end.min(end);
            (slice_end > slice_start).then(|| {
                MarkdownLinkSpan::new(slice_start - start, slice_end - start, span.href.clone())
            })
        })
        .collect()
}
