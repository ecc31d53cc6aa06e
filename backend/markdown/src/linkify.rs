//! Bare URL detection
//!
//! Rewrites URLs, bare domains and e-mail addresses found in plain text runs into
//! `link_open` / `text` / `link_close` triples. Text already inside a link is
//! left alone.

use regex::Regex;
use std::sync::LazyLock;

use crate::token::{Token, TokenKind};

static BARE_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:https?://|www\.)[^\s<>]+|\b[a-z0-9._%+-]+@[a-z0-9-]+(?:\.[a-z0-9-]+)*\.[a-z]{2,}\b|\b(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z]{2,}\b(?:[/?#][^\s<>]*)?",
    )
    .expect("bare link pattern is valid")
});

/// Linkify every inline group in `tokens`.
pub fn linkify_tokens(tokens: &mut [Token]) {
    for token in tokens.iter_mut() {
        if token.children.is_empty() {
            continue;
        }
        if token.kind == TokenKind::Inline {
            let children = std::mem::take(&mut token.children);
            token.children = linkify_inline(children);
        } else {
            linkify_tokens(&mut token.children);
        }
    }
}

fn linkify_inline(tokens: Vec<Token>) -> Vec<Token> {
    let mut result = Vec::with_capacity(tokens.len());
    let mut link_depth = 0usize;

    for token in tokens {
        match token.kind {
            TokenKind::LinkOpen => link_depth += 1,
            TokenKind::LinkClose => link_depth = link_depth.saturating_sub(1),
            _ => {}
        }
        if token.kind != TokenKind::Text || link_depth > 0 {
            result.push(token);
            continue;
        }
        split_links(token.content(), &mut result);
    }

    result
}

fn split_links(content: &str, out: &mut Vec<Token>) {
    let mut index = 0;
    for found in BARE_LINK_RE.find_iter(content) {
        let url = trim_trailing_punctuation(found.as_str());
        // `@host.tld` left over from an address the e-mail branch rejected.
        if !has_body(url) || content[..found.start()].ends_with('@') {
            continue;
        }
        if found.start() > index {
            out.push(Token::text(&content[index..found.start()]));
        }
        out.push(Token::new(TokenKind::LinkOpen).with_attr("href", href_for(url)));
        out.push(Token::text(url));
        out.push(Token::new(TokenKind::LinkClose));
        index = found.start() + url.len();
    }
    if index < content.len() {
        out.push(Token::text(&content[index..]));
    }
}

fn trim_trailing_punctuation(url: &str) -> &str {
    let mut url = url;
    loop {
        let Some(last) = url.chars().last() else {
            return url;
        };
        let strip = match last {
            '.' | ',' | ':' | ';' | '!' | '?' | '\'' | '"' | '|' | '*' | '_' | '~' => true,
            ')' => url.matches('(').count() < url.matches(')').count(),
            ']' => url.matches('[').count() < url.matches(']').count(),
            _ => false,
        };
        if !strip {
            return url;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
}

fn has_body(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    let body = ["https://", "http://", "www."]
        .iter()
        .find_map(|prefix| lower.strip_prefix(prefix))
        .unwrap_or(&lower);
    !body.is_empty()
}

fn href_for(url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else if url.contains('@') {
        format!("mailto:{url}")
    } else {
        format!("http://{url}")
    }
}
