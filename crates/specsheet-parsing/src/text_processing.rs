use once_cell::sync::Lazy;
use regex::Regex;

static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static PAGE_FOOTER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Page \d+ of \d+").unwrap());
static NUMERIC_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\d+\s*$").unwrap());
static BLANK_LINES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n\s*\n+").unwrap());
static LEADING_BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-•·]+\s*").unwrap());
static TRAILING_BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*[-•·]+$").unwrap());

/// Normalize extracted page or document text.
///
/// - whitespace runs collapse to one space
/// - `Page N of M` footers and digit-only lines are removed
/// - `I` becomes `1` and `O` becomes `0` everywhere, including ordinary words
///   ("INFO" comes out as "1NF0")
/// - runs of blank lines collapse to one, and the result is trimmed
///
/// The rules are re-applied until the text stops changing, so
/// `clean_text(clean_text(s)) == clean_text(s)`.
pub fn clean_text(text: &str) -> String {
    let mut current = clean_pass(text);
    loop {
        let next = clean_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_pass(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = WS_RE.replace_all(text, " ");
    let text = PAGE_FOOTER_RE.replace_all(&text, "");
    let text = NUMERIC_LINE_RE.replace_all(&text, "");

    // OCR confusions
    let text = text.replace('I', "1").replace('O', "0");

    let text = BLANK_LINES_RE.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Normalize a single table cell: collapse whitespace, trim, and strip
/// leading/trailing bullet markers (`-`, `•`, `·`).
///
/// Unlike [`clean_text`], no character substitutions are made.
pub fn clean_cell(cell: &str) -> String {
    if cell.is_empty() {
        return String::new();
    }

    let cell = WS_RE.replace_all(cell.trim(), " ");
    let cell = LEADING_BULLET_RE.replace(&cell, "");
    let cell = TRAILING_BULLET_RE.replace(&cell, "");
    cell.into_owned()
}
