//! Token renderer
//!
//! One depth-first walk over the token stream producing flat text, closed
//! style spans and link spans. All walk state lives in a [`RenderState`]
//! created per call and threaded through the recursion.

use crate::ir::{MarkdownIr, MarkdownLinkSpan, MarkdownStyle, MarkdownStyleSpan};
use crate::options::{HeadingStyle, MarkdownParseOptions};
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Ordered,
}

#[derive(Debug)]
struct ListState {
    kind: ListKind,
    index: i64,
}

#[derive(Debug)]
struct LinkState {
    href: String,
    label_start: usize,
}

#[derive(Debug, Default)]
struct RenderEnv {
    list_stack: Vec<ListState>,
    link_stack: Vec<LinkState>,
}

#[derive(Debug)]
struct OpenStyle {
    style: MarkdownStyle,
    start: usize,
}

struct RenderState<'o> {
    text: String,
    styles: Vec<MarkdownStyleSpan>,
    open_styles: Vec<OpenStyle>,
    links: Vec<MarkdownLinkSpan>,
    env: RenderEnv,
    options: &'o MarkdownParseOptions,
}

impl<'o> RenderState<'o> {
    fn new(options: &'o MarkdownParseOptions) -> Self {
        Self {
            text: String::new(),
            styles: Vec::new(),
            open_styles: Vec::new(),
            links: Vec::new(),
            env: RenderEnv::default(),
            options,
        }
    }

    fn in_list(&self) -> bool {
        !self.env.list_stack.is_empty()
    }

    fn append_text(&mut self, value: &str) {
        self.text.push_str(value);
    }

    fn open_style(&mut self, style: MarkdownStyle) {
        self.open_styles.push(OpenStyle {
            style,
            start: self.text.len(),
        });
    }

    /// Close the most recently opened `style`, which need not be the top of
    /// the stack.
    fn close_style(&mut self, style: MarkdownStyle) {
        let Some(index) = self.open_styles.iter().rposition(|open| open.style == style) else {
            return;
        };
        let open = self.open_styles.remove(index);
        let end = self.text.len();
        if end > open.start {
            self.styles.push(MarkdownStyleSpan::new(open.start, end, style));
        }
    }

    fn close_remaining_styles(&mut self) {
        let end = self.text.len();
        while let Some(open) = self.open_styles.pop() {
            if end > open.start {
                self.styles
                    .push(MarkdownStyleSpan::new(open.start, end, open.style));
            }
        }
    }

    fn append_paragraph_separator(&mut self) {
        if self.in_list() {
            return;
        }
        self.append_text("\n\n");
    }

    fn append_list_prefix(&mut self) {
        let depth = self.env.list_stack.len();
        let Some(top) = self.env.list_stack.last_mut() else {
            return;
        };
        top.index += 1;
        let marker = match top.kind {
            ListKind::Ordered => format!("{}. ", top.index),
            ListKind::Bullet => "• ".to_string(),
        };
        let indent = "  ".repeat(depth.saturating_sub(1));
        self.append_text(&indent);
        self.append_text(&marker);
    }

    fn render_inline_code(&mut self, content: &str) {
        if content.is_empty() {
            return;
        }
        let start = self.text.len();
        self.append_text(content);
        self.styles
            .push(MarkdownStyleSpan::new(start, self.text.len(), MarkdownStyle::Code));
    }

    fn render_code_block(&mut self, content: &str) {
        let start = self.text.len();
        self.append_text(content);
        if !content.ends_with('\n') {
            self.append_text("\n");
        }
        self.styles.push(MarkdownStyleSpan::new(
            start,
            self.text.len(),
            MarkdownStyle::CodeBlock,
        ));
        if !self.in_list() {
            self.append_text("\n");
        }
    }

    fn open_link(&mut self, href: &str) {
        self.env.link_stack.push(LinkState {
            href: href.to_string(),
            label_start: self.text.len(),
        });
    }

    fn close_link(&mut self) {
        let Some(link) = self.env.link_stack.pop() else {
            return;
        };
        let href = link.href.trim();
        if href.is_empty() {
            return;
        }
        // Empty labels are kept here and dropped during normalization.
        self.links
            .push(MarkdownLinkSpan::new(link.label_start, self.text.len(), href));
    }

    fn heading_bold(&self) -> bool {
        self.options.heading_style == HeadingStyle::Bold
    }
}

/// Render tokens into an un-normalized IR.
///
/// The text may carry trailing whitespace and the span lists are in closing
/// order; [`normalize`](crate::normalize::normalize_ir) produces the final form.
pub fn render_ir(tokens: &[Token], options: &MarkdownParseOptions) -> MarkdownIr {
    let mut state = RenderState::new(options);
    render_tokens(tokens, &mut state);
    state.close_remaining_styles();
    MarkdownIr {
        text: state.text,
        styles: state.styles,
        links: state.links,
    }
}

fn render_tokens(tokens: &[Token], state: &mut RenderState<'_>) {
    for token in tokens {
        match &token.kind {
            TokenKind::Inline => render_tokens(&token.children, state),
            TokenKind::Text => state.append_text(token.content()),
            TokenKind::EmOpen => state.open_style(MarkdownStyle::Italic),
            TokenKind::EmClose => state.close_style(MarkdownStyle::Italic),
            TokenKind::StrongOpen => state.open_style(MarkdownStyle::Bold),
            TokenKind::StrongClose => state.close_style(MarkdownStyle::Bold),
            TokenKind::SOpen => state.open_style(MarkdownStyle::Strikethrough),
            TokenKind::SClose => state.close_style(MarkdownStyle::Strikethrough),
            TokenKind::CodeInline => state.render_inline_code(token.content()),
            TokenKind::SpoilerOpen => {
                if state.options.enable_spoilers {
                    state.open_style(MarkdownStyle::Spoiler);
                }
            }
            TokenKind::SpoilerClose => {
                if state.options.enable_spoilers {
                    state.close_style(MarkdownStyle::Spoiler);
                }
            }
            TokenKind::LinkOpen => state.open_link(token.attr("href").unwrap_or("")),
            TokenKind::LinkClose => state.close_link(),
            TokenKind::Image => state.append_text(token.content()),
            TokenKind::Softbreak | TokenKind::Hardbreak => state.append_text("\n"),
            TokenKind::ParagraphClose => state.append_paragraph_separator(),
            TokenKind::HeadingOpen => {
                if state.heading_bold() {
                    state.open_style(MarkdownStyle::Bold);
                }
            }
            TokenKind::HeadingClose => {
                if state.heading_bold() {
                    state.close_style(MarkdownStyle::Bold);
                }
                state.append_paragraph_separator();
            }
            TokenKind::BlockquoteOpen => {
                let options = state.options;
                if !options.blockquote_prefix.is_empty() {
                    state.append_text(&options.blockquote_prefix);
                }
            }
            TokenKind::BlockquoteClose => state.append_text("\n"),
            TokenKind::BulletListOpen => state.env.list_stack.push(ListState {
                kind: ListKind::Bullet,
                index: 0,
            }),
            TokenKind::OrderedListOpen => {
                let start = token
                    .attr("start")
                    .and_then(|value| value.trim().parse::<i64>().ok())
                    .unwrap_or(1);
                state.env.list_stack.push(ListState {
                    kind: ListKind::Ordered,
                    index: start - 1,
                });
            }
            TokenKind::BulletListClose | TokenKind::OrderedListClose => {
                state.env.list_stack.pop();
            }
            TokenKind::ListItemOpen => state.append_list_prefix(),
            TokenKind::ListItemClose => state.append_text("\n"),
            TokenKind::CodeBlock | TokenKind::Fence => state.render_code_block(token.content()),
            TokenKind::HtmlBlock => {
                // Raw HTML is not interpreted; the block reads as a paragraph.
                state.append_text(token.content().trim_end_matches('\n'));
                state.append_paragraph_separator();
            }
            TokenKind::HtmlInline => state.append_text(token.content()),
            TokenKind::TableOpen
            | TokenKind::TableClose
            | TokenKind::TheadOpen
            | TokenKind::TheadClose
            | TokenKind::TbodyOpen
            | TokenKind::TbodyClose => {}
            TokenKind::TrClose => state.append_text("\n"),
            TokenKind::ThClose | TokenKind::TdClose => state.append_text("\t"),
            TokenKind::Hr => state.append_text("\n"),
            TokenKind::ParagraphOpen
            | TokenKind::TrOpen
            | TokenKind::ThOpen
            | TokenKind::TdOpen
            | TokenKind::Other(_) => render_tokens(&token.children, state),
        }
    }
}
