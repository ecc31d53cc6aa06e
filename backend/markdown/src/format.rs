//! Channel formatting for the Markdown IR
//!
//! Re-encodes IR text and spans into a channel's own formatting syntax
//! (WhatsApp markers, or plain text for transports without formatting).

use std::fmt;
use std::str::FromStr;

use crate::error::MarkdownError;
use crate::ir::{MarkdownIr, MarkdownLinkSpan, MarkdownStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    WhatsApp,
    Plain,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::WhatsApp => "whatsapp",
            Channel::Plain => "plain",
        }
    }

    /// Opening and closing markers for `style`, if the channel has any.
    fn markers(self, style: MarkdownStyle) -> Option<(&'static str, &'static str)> {
        match self {
            Channel::Plain => None,
            Channel::WhatsApp => match style {
                MarkdownStyle::Bold => Some(("*", "*")),
                MarkdownStyle::Italic => Some(("_", "_")),
                MarkdownStyle::Strikethrough => Some(("~", "~")),
                MarkdownStyle::Code => Some(("`", "`")),
                MarkdownStyle::CodeBlock => Some(("```", "```")),
                MarkdownStyle::Spoiler => None,
            },
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = MarkdownError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whatsapp" => Ok(Channel::WhatsApp),
            "plain" => Ok(Channel::Plain),
            other => Err(MarkdownError::UnknownChannel(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    // At one offset: closes, then link targets, then opens.
    Close,
    LinkTarget,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct FormatEvent {
    pos: usize,
    kind: EventKind,
    /// Opens of longer spans and closes of later-starting spans go first.
    rank: usize,
    index: usize,
}

/// Render `ir` as text for `channel`.
///
/// Markers always nest: when a style ends while styles opened after it are
/// still active, those are closed and reopened around the boundary.
pub fn format_ir(ir: &MarkdownIr, channel: Channel) -> String {
    let text = ir.text.as_str();
    let mut events = Vec::with_capacity(ir.styles.len() * 2 + ir.links.len());
    for (index, span) in ir.styles.iter().enumerate() {
        if span.start >= span.end || channel.markers(span.style).is_none() {
            continue;
        }
        events.push(FormatEvent {
            pos: span.start,
            kind: EventKind::Open,
            rank: usize::MAX - span.end,
            index,
        });
        events.push(FormatEvent {
            pos: span.end,
            kind: EventKind::Close,
            rank: usize::MAX - span.start,
            index,
        });
    }
    for (index, link) in ir.links.iter().enumerate() {
        events.push(FormatEvent {
            pos: link.end,
            kind: EventKind::LinkTarget,
            rank: 0,
            index,
        });
    }
    events.sort();

    let mut out = String::with_capacity(text.len() + events.len() * 2);
    let mut active: Vec<usize> = Vec::new();
    let mut last_pos = 0;

    for event in events {
        let pos = event.pos.min(text.len());
        if pos > last_pos {
            if let Some(segment) = text.get(last_pos..pos) {
                out.push_str(segment);
            }
            last_pos = pos;
        }

        match event.kind {
            EventKind::Open => {
                push_marker(&mut out, ir, channel, event.index, true);
                active.push(event.index);
            }
            EventKind::Close => {
                let Some(at) = active.iter().rposition(|&idx| idx == event.index) else {
                    continue;
                };
                let drained: Vec<usize> = active.drain(at..).collect();
                for &idx in drained.iter().rev() {
                    push_marker(&mut out, ir, channel, idx, false);
                }
                for &idx in drained.iter().skip(1) {
                    push_marker(&mut out, ir, channel, idx, true);
                    active.push(idx);
                }
            }
            EventKind::LinkTarget => {
                let link = &ir.links[event.index];
                if let Some(target) = link_target(text, link) {
                    out.push_str(" (");
                    out.push_str(target);
                    out.push(')');
                }
            }
        }
    }

    if last_pos < text.len() {
        out.push_str(&text[last_pos..]);
    }
    for &idx in active.iter().rev() {
        push_marker(&mut out, ir, channel, idx, false);
    }
    out
}

fn push_marker(out: &mut String, ir: &MarkdownIr, channel: Channel, index: usize, open: bool) {
    if let Some((open_marker, close_marker)) = channel.markers(ir.styles[index].style) {
        out.push_str(if open { open_marker } else { close_marker });
    }
}

/// The href to show after a link label, or `None` when the label already
/// spells it out.
fn link_target<'a>(text: &str, link: &'a MarkdownLinkSpan) -> Option<&'a str> {
    let label = text.get(link.start..link.end).unwrap_or("").trim();
    let href = link.href.as_str();
    let spelled_out = ["", "mailto:", "http://", "https://"]
        .iter()
        .any(|prefix| href.strip_prefix(prefix) == Some(label));
    (!spelled_out).then_some(href)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::MarkdownStyle::{Bold, CodeBlock, Italic, Spoiler};
    use crate::ir::MarkdownStyleSpan;

    fn ir(text: &str, styles: Vec<MarkdownStyleSpan>, links: Vec<MarkdownLinkSpan>) -> MarkdownIr {
        MarkdownIr {
            text: text.to_string(),
            styles,
            links,
        }
    }

    #[test]
    fn whatsapp_markers() {
        let ir = ir(
            "hello world",
            vec![MarkdownStyleSpan::new(0, 5, Bold), MarkdownStyleSpan::new(6, 11, Italic)],
            Vec::new(),
        );
        assert_eq!(format_ir(&ir, Channel::WhatsApp), "*hello* _world_");
        assert_eq!(format_ir(&ir, Channel::Plain), "hello world");
    }

    #[test]
    fn overlapping_styles_nest() {
        let ir = ir(
            "bold and italic just italic",
            vec![MarkdownStyleSpan::new(0, 15, Bold), MarkdownStyleSpan::new(5, 27, Italic)],
            Vec::new(),
        );
        assert_eq!(
            format_ir(&ir, Channel::WhatsApp),
            "*bold _and italic_*_ just italic_"
        );
    }

    #[test]
    fn links_show_their_target() {
        let ir = ir(
            "click here or www.x.test",
            Vec::new(),
            vec![
                MarkdownLinkSpan::new(6, 10, "https://example.com"),
                MarkdownLinkSpan::new(14, 24, "http://www.x.test"),
            ],
        );
        assert_eq!(
            format_ir(&ir, Channel::Plain),
            "click here (https://example.com) or www.x.test"
        );
    }

    #[test]
    fn code_block_and_spoiler() {
        let ir = ir(
            "x\ncode\n",
            vec![MarkdownStyleSpan::new(0, 1, Spoiler), MarkdownStyleSpan::new(2, 7, CodeBlock)],
            Vec::new(),
        );
        assert_eq!(format_ir(&ir, Channel::WhatsApp), "x\n```code\n```");
    }

    #[test]
    fn channel_from_str() {
        assert_eq!("WhatsApp".parse::<Channel>(), Ok(Channel::WhatsApp));
        assert!("sms".parse::<Channel>().is_err());
    }
}
