//! Line-level word and comment extraction
//!
//! Extraction is pattern based rather than a full tokenizer. Word values
//! never contain parentheses or semicolons, so comments can be located and
//! stripped before any word is read.

use regex::Regex;
use std::sync::OnceLock;

/// Words read from the code body of one line
///
/// A letter that appears more than once keeps its first value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineWords {
    pub g_code: Option<u32>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub f: Option<f64>,
    pub i: Option<f64>,
    pub j: Option<f64>,
    pub k: Option<f64>,
}

impl LineWords {
    /// True if any of X/Y/Z is present
    pub fn has_axis_words(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.z.is_some()
    }
}

/// A trimmed, non-empty source line split into comment and words
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    /// Trimmed line text including any comment
    pub raw_text: String,
    /// First comment on the line, without delimiters
    pub comment: Option<String>,
    /// `None` when nothing but comments remain on the line
    pub words: Option<LineWords>,
}

fn comment_regex() -> &'static Regex {
    static COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    COMMENT_REGEX.get_or_init(|| Regex::new(r"\(([^)]*)\)|;(.*)$").expect("invalid regex pattern"))
}

fn paren_comment_regex() -> &'static Regex {
    static PAREN_REGEX: OnceLock<Regex> = OnceLock::new();
    PAREN_REGEX.get_or_init(|| Regex::new(r"\([^)]*\)").expect("invalid regex pattern"))
}

fn semicolon_comment_regex() -> &'static Regex {
    static SEMICOLON_REGEX: OnceLock<Regex> = OnceLock::new();
    SEMICOLON_REGEX.get_or_init(|| Regex::new(r";.*$").expect("invalid regex pattern"))
}

fn g_word_regex() -> &'static Regex {
    static G_REGEX: OnceLock<Regex> = OnceLock::new();
    G_REGEX.get_or_init(|| Regex::new(r"(?i)G(\d+)").expect("invalid regex pattern"))
}

fn value_word_regex() -> &'static Regex {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    WORD_REGEX.get_or_init(|| {
        Regex::new(r"(?i)([XYZFIJK])(-?(?:\d+\.?\d*|\.\d+))").expect("invalid regex pattern")
    })
}

/// Extract the first comment, either `(...)` or `;...` to end of line
pub fn extract_comment(line: &str) -> Option<String> {
    let caps = comment_regex().captures(line)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Remove every parenthesized comment and any semicolon tail
pub fn strip_comments(line: &str) -> String {
    let without_parens = paren_comment_regex().replace_all(line, "");
    semicolon_comment_regex()
        .replace(&without_parens, "")
        .trim()
        .to_string()
}

/// First integer following a `G` marker (case-insensitive)
pub fn extract_g_number(code: &str) -> Option<u32> {
    g_word_regex()
        .captures(code)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

/// Read G and the X/Y/Z/F/I/J/K value words from a comment-free code body
pub fn parse_words(code: &str) -> LineWords {
    let mut words = LineWords {
        g_code: extract_g_number(code),
        ..LineWords::default()
    };

    for caps in value_word_regex().captures_iter(code) {
        let (Some(letter), Some(number)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let Ok(value) = number.as_str().parse::<f64>() else {
            continue;
        };
        let slot = match letter.as_str().to_ascii_uppercase().as_str() {
            "X" => &mut words.x,
            "Y" => &mut words.y,
            "Z" => &mut words.z,
            "F" => &mut words.f,
            "I" => &mut words.i,
            "J" => &mut words.j,
            "K" => &mut words.k,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    words
}

/// Split one source line into comment and words
///
/// Returns `None` for blank lines.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let comment = extract_comment(trimmed);
    let code = strip_comments(trimmed);
    let words = if code.is_empty() {
        None
    } else {
        Some(parse_words(&code))
    };

    Some(ParsedLine {
        raw_text: trimmed.to_string(),
        comment,
        words,
    })
}
