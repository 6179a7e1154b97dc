//! The optional `to` recipient name from the page URL.

use super::config::Texts;

/// Longest recipient name kept, in characters.
pub const MAX_NAME_CHARS: usize = 40;

/// Trim, collapse internal whitespace runs to one space, cap the length.
pub fn sanitize_name(input: Option<&str>) -> String {
    let Some(raw) = input else {
        return String::new();
    };
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_NAME_CHARS)
        .collect()
}

/// Ask-screen headline for an optional raw recipient name.
pub fn ask_headline(texts: &Texts, recipient: Option<&str>) -> String {
    let name = sanitize_name(recipient);
    if name.is_empty() {
        texts.ask_headline.clone()
    } else {
        texts.ask_headline_named.replace("{name}", &name)
    }
}
