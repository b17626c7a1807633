//! Marked text: prose lines mixed with `-` bullet lines.
//!
//! Renderers call [`parse_marked_text`] to turn a field into paragraph-sized lines and
//! [`is_simple_one_liner`] to decide whether a value can share a line with its label.
//! [`normalize_bullets`] promotes bullets that were typed mid-sentence (common in
//! LLM output) onto their own lines.

use once_cell::sync::Lazy;
use regex::Regex;

/// Glyph prefixed to every rendered bullet line.
pub const BULLET_GLYPH: &str = "• ";

/// `Sentence. - Bullet` → `Sentence.\n- Bullet`
static INLINE_BULLET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([.!?:])\s+-\s+").expect("inline bullet pattern is valid")
});

/// One rendered line of a marked-text value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkedLine {
    /// Bullet item with the leading `-` and surrounding whitespace removed.
    Bullet(String),
    /// Prose line, trimmed.
    Plain(String),
}

impl MarkedLine {
    /// Text as it appears in the document.
    pub fn display(&self) -> String {
        match self {
            MarkedLine::Bullet(text) => format!("{}{}", BULLET_GLYPH, text),
            MarkedLine::Plain(text) => text.clone(),
        }
    }
}

/// `\r\n` → `\n`.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Move inline `- ` bullets that follow sentence punctuation onto their own line.
///
/// Idempotent: the rewritten form `P\n- ` matches the pattern again and maps to itself.
pub fn normalize_bullets(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = normalize_newlines(text);
    INLINE_BULLET.replace_all(&text, "$1\n- ").into_owned()
}

/// Split a marked-text value into lines. Blank input yields a single `N/A` line.
pub fn parse_marked_text(text: &str) -> Vec<MarkedLine> {
    let text = normalize_newlines(text);
    let text = text.trim_matches('\n');
    if text.trim().is_empty() {
        return vec![MarkedLine::Plain(crate::record::NOT_AVAILABLE.to_string())];
    }
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let stripped = line.trim_start();
            match stripped.strip_prefix('-') {
                Some(rest) => MarkedLine::Bullet(rest.trim().to_string()),
                None => MarkedLine::Plain(line.trim().to_string()),
            }
        })
        .collect()
}

/// True when `value` fits on its label's line: no embedded newline and not a bullet.
pub fn is_simple_one_liner(value: &str) -> bool {
    !value.contains('\n') && !value.trim_start().starts_with('-')
}
