//! Log Redaction
//!
//! Scrubs phone numbers and Twilio credentials from message text before it is
//! logged.

use std::sync::LazyLock;

use regex::Regex;

static TELEPHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}")
        .expect("telephone pattern")
});
// Account / message SIDs (`AC…`, `SM…`, `MM…`) and bare 32-hex auth tokens.
static TWILIO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:(?:AC|SM|MM|MG)[0-9a-fA-F]{32}|[0-9a-fA-F]{32})\b").expect("twilio pattern")
});

/// Redacts phone numbers and credentials in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = TWILIO_RE.replace_all(input, "[REDACTED_TOKEN]");
    TELEPHONE_RE
        .replace_all(&redacted, "[REDACTED_PHONE]")
        .into_owned()
}

/// Redacted preview of at most `max_chars` characters, with `…` appended when
/// the text was cut.
pub fn redact_preview(input: &str, max_chars: usize) -> String {
    let redacted = redact_sensitive_data(input);
    match redacted.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &redacted[..cut]),
        None => redacted,
    }
}
