//! Spoiler markers
//!
//! The parser has no notion of `||spoiler||`, so text runs are split on the
//! delimiter and synthetic `spoiler_open` / `spoiler_close` tokens are spliced
//! in. Pairing is scoped to one inline group: a delimiter never pairs with one
//! in another paragraph, heading or table cell.

use crate::token::{Token, TokenKind};

const DELIMITER: &str = "||";

pub fn apply_spoiler_tokens(tokens: &mut [Token]) {
    for token in tokens.iter_mut() {
        if token.children.is_empty() {
            continue;
        }
        if token.kind == TokenKind::Inline {
            let children = std::mem::take(&mut token.children);
            token.children = inject_spoilers_into_inline(children);
        } else {
            apply_spoiler_tokens(&mut token.children);
        }
    }
}

fn inject_spoilers_into_inline(tokens: Vec<Token>) -> Vec<Token> {
    let mut result = Vec::with_capacity(tokens.len());
    let mut spoiler_open = false;

    for token in tokens {
        if token.kind != TokenKind::Text || !token.content().contains(DELIMITER) {
            result.push(token);
            continue;
        }

        let content = token.content();
        let mut index = 0;
        while let Some(offset) = content[index..].find(DELIMITER) {
            let next = index + offset;
            if next > index {
                result.push(Token::text(&content[index..next]));
            }
            spoiler_open = !spoiler_open;
            result.push(Token::new(if spoiler_open {
                TokenKind::SpoilerOpen
            } else {
                TokenKind::SpoilerClose
            }));
            index = next + DELIMITER.len();
        }
        if index < content.len() {
            result.push(Token::text(&content[index..]));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind.clone()).collect()
    }

    #[test]
    fn splits_paired_delimiters() {
        let mut tokens = vec![Token::inline(vec![Token::text("a ||b|| c")])];
        apply_spoiler_tokens(&mut tokens);
        let children = &tokens[0].children;
        assert_eq!(
            kinds(children),
            vec![
                TokenKind::Text,
                TokenKind::SpoilerOpen,
                TokenKind::Text,
                TokenKind::SpoilerClose,
                TokenKind::Text
            ]
        );
        assert_eq!(children[0].content(), "a ");
        assert_eq!(children[2].content(), "b");
        assert_eq!(children[4].content(), " c");
    }

    #[test]
    fn pairs_across_text_runs_in_one_group() {
        let mut tokens = vec![Token::inline(vec![
            Token::text("||a "),
            Token::new(TokenKind::EmOpen),
            Token::text("b"),
            Token::new(TokenKind::EmClose),
            Token::text(" c||"),
        ])];
        apply_spoiler_tokens(&mut tokens);
        let kinds = kinds(&tokens[0].children);
        assert_eq!(kinds.first(), Some(&TokenKind::SpoilerOpen));
        assert_eq!(kinds.last(), Some(&TokenKind::SpoilerClose));
    }

    #[test]
    fn state_resets_per_inline_group() {
        let mut tokens = vec![
            Token::inline(vec![Token::text("x ||y")]),
            Token::new(TokenKind::ParagraphClose),
            Token::inline(vec![Token::text("z|| w")]),
        ];
        apply_spoiler_tokens(&mut tokens);
        assert_eq!(tokens[0].children[1].kind, TokenKind::SpoilerOpen);
        // The second group starts closed again, so its delimiter opens.
        assert_eq!(tokens[2].children[1].kind, TokenKind::SpoilerOpen);
    }

    #[test]
    fn leaves_code_untouched() {
        let mut tokens = vec![Token::inline(vec![
            Token::new(TokenKind::CodeInline).with_content("a || b"),
        ])];
        apply_spoiler_tokens(&mut tokens);
        assert_eq!(tokens[0].children.len(), 1);
        assert_eq!(tokens[0].children[0].kind, TokenKind::CodeInline);
    }
}
