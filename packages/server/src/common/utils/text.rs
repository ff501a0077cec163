/// Pure string helpers shared by the scraper, ingestion and error reporting.
///
/// All lengths are counted in characters, not bytes: most content is Cyrillic.
use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("static regex");
}

/// Collapse every whitespace run (including newlines) to one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// First `max_chars` characters of `text`.
pub fn take_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Truncate to `max_chars` characters and mark the cut with an ellipsis.
///
/// Text that already fits is returned unchanged.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}…", take_chars(text, max_chars))
    } else {
        text.to_string()
    }
}

/// Absolute `http`/`https` URL. Anything else (`javascript:`, `data:`,
/// relative paths) must not be stored or rendered as a link.
pub fn is_web_url(raw: &str) -> bool {
    Url::parse(raw.trim())
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
        .unwrap_or(false)
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
