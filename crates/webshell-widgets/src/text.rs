#![forbid(unsafe_code)]

//! Escaping helpers.
//!
//! Two unrelated escaping rules live here:
//!
//! - [`escape_html`] entity-escapes `&`, `<` and `>` for text inserted into
//!   markup.
//! - [`escape_string`] backslash-escapes `\`, `"` and `'` and writes NUL as
//!   `\0` for string tokens shown inside the JSON tree.

use std::borrow::Cow;

/// Entity-escape `&`, `<` and `>`.
///
/// Quotes are left alone: the result is only ever used as element content.
#[must_use]
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 16);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Backslash-escape a string token for display.
#[must_use]
pub fn escape_string(s: &str) -> Cow<'_, str> {
    if !s.contains(['\\', '"', '\'', '\0']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '\\' | '"' | '\'' => {
                out.push('\\');
                out.push(ch);
            }
            '\0' => out.push_str("\\0"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Inverse of [`escape_string`].
///
/// A trailing lone backslash is kept as-is.
#[must_use]
pub fn unescape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('\0'),
            Some(next) => out.push(next),
            None => out.push('\\'),
        }
    }
    out
}
