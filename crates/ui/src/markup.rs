//! Small markup helpers shared by the views.

use once_cell::sync::Lazy;
use regex::Regex;

static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").unwrap());

/// Escape text for use in element content and quoted attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Minimal markdown: `**bold**`, `*italic*`, blank line as paragraph break,
/// single newline as `<br>`. Input is escaped first.
#[must_use]
pub fn markdown_to_html(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let html = escape_html(markdown);
    let html = BOLD_RE.replace_all(&html, "<strong>$1</strong>");
    let html = ITALIC_RE.replace_all(&html, "<em>$1</em>");
    html.replace("\n\n", "</p><p>").replace('\n', "<br>")
}

/// Czech plural form for `count`: `one` for 1, `few` for 2–4, `many` otherwise.
#[must_use]
pub fn czech_plural<'a>(count: usize, one: &'a str, few: &'a str, many: &'a str) -> &'a str {
    match count {
        1 => one,
        2..=4 => few,
        _ => many,
    }
}
