//! Markdown tokenizer
//!
//! Folds `pulldown-cmark` events into a markdown-it style token stream: block
//! open/close markers at the top level, each run of inline content wrapped in
//! an [`TokenKind::Inline`] container holding the inline tokens.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, LinkType, Options, Parser, Tag};

use crate::options::MarkdownParseOptions;

/// Token kinds understood by the renderer.
///
/// Parser constructs with no dedicated kind become [`TokenKind::Other`]; the
/// renderer walks their children, so unknown vocabulary degrades to its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Inline,
    Text,
    EmOpen,
    EmClose,
    StrongOpen,
    StrongClose,
    SOpen,
    SClose,
    CodeInline,
    SpoilerOpen,
    SpoilerClose,
    LinkOpen,
    LinkClose,
    Image,
    Softbreak,
    Hardbreak,
    ParagraphOpen,
    ParagraphClose,
    HeadingOpen,
    HeadingClose,
    BlockquoteOpen,
    BlockquoteClose,
    BulletListOpen,
    BulletListClose,
    OrderedListOpen,
    OrderedListClose,
    ListItemOpen,
    ListItemClose,
    CodeBlock,
    Fence,
    HtmlBlock,
    HtmlInline,
    TableOpen,
    TableClose,
    TheadOpen,
    TheadClose,
    TbodyOpen,
    TbodyClose,
    TrOpen,
    TrClose,
    ThOpen,
    ThClose,
    TdOpen,
    TdClose,
    Hr,
    Other(String),
}

/// A parsed markup construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub content: Option<String>,
    pub children: Vec<Token>,
    pub attrs: Vec<(String, String)>,
}

impl Token {
    pub fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            content: None,
            children: Vec::new(),
            attrs: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(TokenKind::Text).with_content(content)
    }

    pub fn inline(children: Vec<Token>) -> Self {
        Self::new(TokenKind::Inline).with_children(children)
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Token>) -> Self {
        self.children = children;
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// First attribute value registered under `name`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Literal content, empty when the token carries none.
    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// Parse `markdown` into a token stream.
pub fn tokenize(markdown: &str, options: &MarkdownParseOptions) -> Vec<Token> {
    let mut parser_options = Options::empty();
    parser_options.insert(Options::ENABLE_TABLES);
    parser_options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut builder = TokenBuilder::new(markdown, options.autolink);
    for (event, range) in Parser::new_ext(markdown, parser_options).into_offset_iter() {
        builder.push_event(event, range);
    }
    builder.finish()
}

struct CodeCapture {
    fenced: bool,
    info: String,
    content: String,
}

struct TokenBuilder<'s> {
    source: &'s str,
    autolink: bool,
    tokens: Vec<Token>,
    inline: Vec<Token>,
    /// Blocks whose direct content is inline (paragraphs, headings, cells).
    inline_blocks: usize,
    code: Option<CodeCapture>,
    image_alt: Option<String>,
    image_depth: usize,
    /// One entry per open link: `true` when it is rendered as literal text.
    literal_links: Vec<bool>,
    /// Same for strikethrough: only `~~` delimits, a single `~` is text.
    literal_strikes: Vec<bool>,
    /// Source offset where the last raw HTML block line ended.
    html_block_end: Option<usize>,
    in_table_head: bool,
    tbody_open: bool,
}

impl<'s> TokenBuilder<'s> {
    fn new(source: &'s str, autolink: bool) -> Self {
        Self {
            source,
            autolink,
            tokens: Vec::new(),
            inline: Vec::new(),
            inline_blocks: 0,
            code: None,
            image_alt: None,
            image_depth: 0,
            literal_links: Vec::new(),
            literal_strikes: Vec::new(),
            html_block_end: None,
            in_table_head: false,
            tbody_open: false,
        }
    }

    fn finish(mut self) -> Vec<Token> {
        self.flush_inline();
        self.tokens
    }

    fn flush_inline(&mut self) {
        if !self.inline.is_empty() {
            let children = std::mem::take(&mut self.inline);
            self.tokens.push(Token::inline(children));
        }
    }

    fn block(&mut self, token: Token) {
        self.flush_inline();
        self.tokens.push(token);
    }

    fn push_text(&mut self, text: &str) {
        if let Some(last) = self.inline.last_mut() {
            if last.kind == TokenKind::Text {
                last.content.get_or_insert_with(String::new).push_str(text);
                return;
            }
        }
        self.inline.push(Token::text(text));
    }

    fn push_event(&mut self, event: Event<'_>, range: Range<usize>) {
        if let Some(code) = self.code.as_mut() {
            match event {
                Event::Text(text) => code.content.push_str(&text),
                Event::End(Tag::CodeBlock(_)) => self.finish_code_block(),
                _ => {}
            }
            return;
        }

        if self.image_alt.is_some() {
            self.push_alt_event(event);
            return;
        }

        match event {
            Event::Start(tag) => self.start_tag(tag, range),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => {
                if self.literal_links.last() == Some(&true) {
                    // The literal `<...>` text was emitted when the link opened.
                    return;
                }
                self.push_text(&text);
            }
            Event::Code(code) => self
                .inline
                .push(Token::new(TokenKind::CodeInline).with_content(code.to_string())),
            Event::Html(html) => {
                let is_block =
                    self.inline_blocks == 0 && self.inline.is_empty() && html.ends_with('\n');
                if is_block {
                    self.push_html_block(&html, range);
                } else {
                    self.inline
                        .push(Token::new(TokenKind::HtmlInline).with_content(html.to_string()));
                }
            }
            Event::SoftBreak => self.inline.push(Token::new(TokenKind::Softbreak)),
            Event::HardBreak => self.inline.push(Token::new(TokenKind::Hardbreak)),
            Event::Rule => self.block(Token::new(TokenKind::Hr)),
            Event::FootnoteReference(label) => self.inline.push(
                Token::new(TokenKind::Other("footnote_ref".to_string()))
                    .with_children(vec![Token::text(format!("[^{}]", &*label))]),
            ),
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.inline.push(
                    Token::new(TokenKind::Other("task_list_marker".to_string()))
                        .with_children(vec![Token::text(marker)]),
                );
            }
        }
    }

    fn push_alt_event(&mut self, event: Event<'_>) {
        let Some(alt) = self.image_alt.as_mut() else {
            return;
        };
        match event {
            Event::Text(text) | Event::Code(text) => alt.push_str(&text),
            Event::SoftBreak | Event::HardBreak => alt.push(' '),
            Event::Start(Tag::Image(..)) => self.image_depth += 1,
            Event::End(Tag::Image(_, src, title)) => {
                self.image_depth -= 1;
                if self.image_depth == 0 {
                    let alt = self.image_alt.take().unwrap_or_default();
                    let mut token = Token::new(TokenKind::Image)
                        .with_content(alt)
                        .with_attr("src", src.to_string());
                    if !title.is_empty() {
                        token = token.with_attr("title", title.to_string());
                    }
                    self.inline.push(token);
                }
            }
            _ => {}
        }
    }

    /// Consecutive lines of one raw HTML block become a single token.
    fn push_html_block(&mut self, html: &str, range: Range<usize>) {
        let continues = self.inline.is_empty()
            && self.html_block_end == Some(range.start)
            && self
                .tokens
                .last()
                .is_some_and(|last| last.kind == TokenKind::HtmlBlock);
        if continues {
            if let Some(last) = self.tokens.last_mut() {
                last.content.get_or_insert_with(String::new).push_str(html);
            }
        } else {
            self.block(Token::new(TokenKind::HtmlBlock).with_content(html));
        }
        self.html_block_end = Some(range.end);
    }

    fn start_tag(&mut self, tag: Tag<'_>, range: Range<usize>) {
        match tag {
            Tag::Paragraph => {
                self.block(Token::new(TokenKind::ParagraphOpen));
                self.inline_blocks += 1;
            }
            Tag::Heading(level, _, _) => {
                self.block(
                    Token::new(TokenKind::HeadingOpen)
                        .with_attr("level", (level as usize).to_string()),
                );
                self.inline_blocks += 1;
            }
            Tag::BlockQuote => self.block(Token::new(TokenKind::BlockquoteOpen)),
            Tag::CodeBlock(kind) => {
                self.flush_inline();
                let (fenced, info) = match kind {
                    CodeBlockKind::Fenced(info) => (true, info.to_string()),
                    CodeBlockKind::Indented => (false, String::new()),
                };
                self.code = Some(CodeCapture {
                    fenced,
                    info,
                    content: String::new(),
                });
            }
            Tag::List(Some(start)) => self.block(
                Token::new(TokenKind::OrderedListOpen).with_attr("start", start.to_string()),
            ),
            Tag::List(None) => self.block(Token::new(TokenKind::BulletListOpen)),
            Tag::Item => self.block(Token::new(TokenKind::ListItemOpen)),
            Tag::FootnoteDefinition(label) => self.block(
                Token::new(TokenKind::Other("footnote_open".to_string()))
                    .with_attr("label", label.to_string()),
            ),
            Tag::Table(_) => {
                self.tbody_open = false;
                self.block(Token::new(TokenKind::TableOpen));
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.block(Token::new(TokenKind::TheadOpen));
                self.tokens.push(Token::new(TokenKind::TrOpen));
            }
            Tag::TableRow => {
                if !self.tbody_open {
                    self.tbody_open = true;
                    self.block(Token::new(TokenKind::TbodyOpen));
                }
                self.block(Token::new(TokenKind::TrOpen));
            }
            Tag::TableCell => {
                let kind = if self.in_table_head {
                    TokenKind::ThOpen
                } else {
                    TokenKind::TdOpen
                };
                self.block(Token::new(kind));
                self.inline_blocks += 1;
            }
            Tag::Emphasis => self.inline.push(Token::new(TokenKind::EmOpen)),
            Tag::Strong => self.inline.push(Token::new(TokenKind::StrongOpen)),
            Tag::Strikethrough => {
                let delimiter = self.source.get(range).unwrap_or("");
                let literal = !delimiter.starts_with("~~");
                self.literal_strikes.push(literal);
                if literal {
                    self.push_text("~");
                } else {
                    self.inline.push(Token::new(TokenKind::SOpen));
                }
            }
            Tag::Link(link_type, dest, title) => {
                let is_autolink = matches!(link_type, LinkType::Autolink | LinkType::Email);
                if is_autolink && !self.autolink {
                    self.literal_links.push(true);
                    self.push_text(&format!("<{}>", &*dest));
                    return;
                }
                self.literal_links.push(false);
                let href = if link_type == LinkType::Email {
                    format!("mailto:{dest}")
                } else {
                    dest.to_string()
                };
                let mut token = Token::new(TokenKind::LinkOpen).with_attr("href", href);
                if !title.is_empty() {
                    token = token.with_attr("title", title.to_string());
                }
                self.inline.push(token);
            }
            Tag::Image(..) => {
                self.image_alt = Some(String::new());
                self.image_depth = 1;
            }
        }
    }

    fn end_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.inline_blocks = self.inline_blocks.saturating_sub(1);
                self.block(Token::new(TokenKind::ParagraphClose));
            }
            Tag::Heading(..) => {
                self.inline_blocks = self.inline_blocks.saturating_sub(1);
                self.block(Token::new(TokenKind::HeadingClose));
            }
            Tag::BlockQuote => self.block(Token::new(TokenKind::BlockquoteClose)),
            Tag::CodeBlock(_) => {}
            Tag::List(Some(_)) => self.block(Token::new(TokenKind::OrderedListClose)),
            Tag::List(None) => self.block(Token::new(TokenKind::BulletListClose)),
            Tag::Item => self.block(Token::new(TokenKind::ListItemClose)),
            Tag::FootnoteDefinition(_) => {
                self.block(Token::new(TokenKind::Other("footnote_close".to_string())))
            }
            Tag::Table(_) => {
                if self.tbody_open {
                    self.block(Token::new(TokenKind::TbodyClose));
                    self.tbody_open = false;
                }
                self.block(Token::new(TokenKind::TableClose));
            }
            Tag::TableHead => {
                self.block(Token::new(TokenKind::TrClose));
                self.tokens.push(Token::new(TokenKind::TheadClose));
                self.in_table_head = false;
            }
            Tag::TableRow => self.block(Token::new(TokenKind::TrClose)),
            Tag::TableCell => {
                self.inline_blocks = self.inline_blocks.saturating_sub(1);
                let kind = if self.in_table_head {
                    TokenKind::ThClose
                } else {
                    TokenKind::TdClose
                };
                self.block(Token::new(kind));
            }
            Tag::Emphasis => self.inline.push(Token::new(TokenKind::EmClose)),
            Tag::Strong => self.inline.push(Token::new(TokenKind::StrongClose)),
            Tag::Strikethrough => {
                if self.literal_strikes.pop() == Some(true) {
                    self.push_text("~");
                } else {
                    self.inline.push(Token::new(TokenKind::SClose));
                }
            }
            Tag::Link(..) => {
                if self.literal_links.pop() == Some(false) {
                    self.inline.push(Token::new(TokenKind::LinkClose));
                }
            }
            Tag::Image(..) => {}
        }
    }

    fn finish_code_block(&mut self) {
        let Some(code) = self.code.take() else {
            return;
        };
        let kind = if code.fenced {
            TokenKind::Fence
        } else {
            TokenKind::CodeBlock
        };
        let mut token = Token::new(kind).with_content(code.content);
        if !code.info.is_empty() {
            token = token.with_attr("info", code.info);
        }
        self.tokens.push(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind.clone()).collect()
    }

    #[test]
    fn paragraph_wraps_inline_group() {
        let tokens = tokenize("**hi** there", &MarkdownParseOptions::default());
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::ParagraphOpen, TokenKind::Inline, TokenKind::ParagraphClose]
        );
        assert_eq!(
            kinds(&tokens[1].children),
            vec![
                TokenKind::StrongOpen,
                TokenKind::Text,
                TokenKind::StrongClose,
                TokenKind::Text
            ]
        );
        assert_eq!(tokens[1].children[3].content(), " there");
    }

    #[test]
    fn coalesces_adjacent_text() {
        let tokens = tokenize("a ||b|| c [x", &MarkdownParseOptions::default());
        let children = &tokens[1].children;
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].content(), "a ||b|| c [x");
    }

    #[test]
    fn ordered_list_carries_start() {
        let tokens = tokenize("5. one\n6. two\n", &MarkdownParseOptions::default());
        assert_eq!(tokens[0].kind, TokenKind::OrderedListOpen);
        assert_eq!(tokens[0].attr("start"), Some("5"));
        assert_eq!(tokens[1].kind, TokenKind::ListItemOpen);
        // Tight items hold their inline content directly.
        assert_eq!(tokens[2].kind, TokenKind::Inline);
        assert_eq!(tokens[2].children[0].content(), "one");
    }

    #[test]
    fn fence_keeps_content_and_info() {
        let tokens = tokenize("```rust\nlet x = 1;\n```\n", &MarkdownParseOptions::default());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Fence);
        assert_eq!(tokens[0].content(), "let x = 1;\n");
        assert_eq!(tokens[0].attr("info"), Some("rust"));
    }

    #[test]
    fn table_rows_and_cells() {
        let tokens = tokenize("| a | b |\n|---|---|\n| 1 | 2 |\n", &MarkdownParseOptions::default());
        let kinds = kinds(&tokens);
        assert_eq!(kinds.first(), Some(&TokenKind::TableOpen));
        assert_eq!(kinds.last(), Some(&TokenKind::TableClose));
        assert_eq!(kinds.iter().filter(|k| **k == TokenKind::TrClose).count(), 2);
        assert_eq!(kinds.iter().filter(|k| **k == TokenKind::ThClose).count(), 2);
        assert_eq!(kinds.iter().filter(|k| **k == TokenKind::TdClose).count(), 2);
        assert!(kinds.contains(&TokenKind::TbodyOpen));
    }

    #[test]
    fn image_becomes_alt_text() {
        let tokens = tokenize("![a *cat*](cat.png)", &MarkdownParseOptions::default());
        let image = &tokens[1].children[0];
        assert_eq!(image.kind, TokenKind::Image);
        assert_eq!(image.content(), "a cat");
        assert_eq!(image.attr("src"), Some("cat.png"));
    }

    #[test]
    fn email_autolink_gets_mailto() {
        let tokens = tokenize("<me@x.test>", &MarkdownParseOptions::default());
        let link = &tokens[1].children[0];
        assert_eq!(link.kind, TokenKind::LinkOpen);
        assert_eq!(link.attr("href"), Some("mailto:me@x.test"));
    }

    #[test]
    fn single_tilde_is_text() {
        let tokens = tokenize("about ~5 min~ left, ~~gone~~", &MarkdownParseOptions::default());
        assert_eq!(
            kinds(&tokens[1].children),
            vec![
                TokenKind::Text,
                TokenKind::SOpen,
                TokenKind::Text,
                TokenKind::SClose
            ]
        );
        assert_eq!(tokens[1].children[0].content(), "about ~5 min~ left, ");
    }

    #[test]
    fn html_block_lines_are_grouped() {
        let tokens = tokenize("<div>\nhi\n</div>\n\npara", &MarkdownParseOptions::default());
        assert_eq!(tokens[0].kind, TokenKind::HtmlBlock);
        assert_eq!(tokens[0].content(), "<div>\nhi\n</div>\n");
        assert_eq!(tokens[1].kind, TokenKind::ParagraphOpen);
    }

    #[test]
    fn disabled_autolink_stays_literal() {
        let options = MarkdownParseOptions {
            autolink: false,
            ..Default::default()
        };
        let tokens = tokenize("see <http://x.test> now", &options);
        let children = &tokens[1].children;
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].content(), "see <http://x.test> now");
    }
}
