//! G-Code syntax validator
//!
//! A line-oriented lint pass that runs independently of the toolpath
//! compiler. It reports unsupported codes, cutting moves without a feed
//! rate, rapid plunges below zero and malformed lines.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

use super::strip_comments;

const SUPPORTED_GCODES: &[&str] = &[
    "G0", "G00", "G1", "G01", "G2", "G02", "G3", "G03", "G17", "G20", "G21", "G90", "G91",
];
const SUPPORTED_MCODES: &[&str] = &[
    "M0", "M1", "M2", "M3", "M4", "M5", "M6", "M8", "M9", "M30",
];
const CUTTING_GCODES: &[&str] = &["G1", "G01", "G2", "G02", "G3", "G03"];
const RAPID_GCODES: &[&str] = &["G0", "G00"];

/// Issue severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
}

impl std::fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validator finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// 1-based line number
    pub line: usize,
    pub severity: ValidationSeverity,
    pub message: String,
    /// Machine-readable code (the offending word or a rule id)
    pub code: String,
}

impl ValidationIssue {
    fn warning(line: usize, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            line,
            severity: ValidationSeverity::Warning,
            message: message.into(),
            code: code.into(),
        }
    }

    fn error(line: usize, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            line,
            severity: ValidationSeverity::Error,
            message: message.into(),
            code: code.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: {} [{}] {}",
            self.line, self.severity, self.code, self.message
        )
    }
}

/// Outcome of validating a whole program
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
    pub error_count: usize,
    pub warning_count: usize,
}

impl ValidationResult {
    /// True if no errors were found (warnings allowed)
    pub fn is_valid(&self) -> bool {
        self.error_count == 0
    }
}

fn g_words_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?i)G\d+").expect("invalid regex pattern"))
}

fn m_words_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?i)M\d+").expect("invalid regex pattern"))
}

fn feed_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?i)F(\d*\.?\d+)").expect("invalid regex pattern"))
}

fn movement_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?i)[XYZ][\-\d.]+").expect("invalid regex pattern"))
}

fn rapid_word_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?i)G0?0?\s").expect("invalid regex pattern"))
}

fn z_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?i)Z(-?(?:\d+\.?\d*|\.\d+))").expect("invalid regex pattern")
    })
}

fn charset_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?i)^[GMXYZIJKFSPRT%\d\s.\-]+$").expect("invalid regex pattern"))
}

/// Lint program text
pub fn validate(text: &str) -> ValidationResult {
    let mut issues = Vec::new();
    let mut feed_rate: Option<f64> = None;
    let mut last_z: Option<f64> = None;
    let mut in_cutting_mode = false;

    for (index, raw_line) in text.split('\n').enumerate() {
        let line_num = index + 1;
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with('(') || line.starts_with(';') || line.starts_with('%')
        {
            continue;
        }

        let code = strip_comments(line);
        if code.is_empty() {
            continue;
        }

        let g_words: Vec<String> = g_words_regex()
            .find_iter(&code)
            .map(|m| m.as_str().to_uppercase())
            .collect();

        for word in &g_words {
            if !SUPPORTED_GCODES.contains(&word.as_str()) {
                issues.push(ValidationIssue::warning(
                    line_num,
                    format!("Unsupported G-code: {}", word),
                    word.clone(),
                ));
            }

            if CUTTING_GCODES.contains(&word.as_str()) {
                in_cutting_mode = true;
            } else if RAPID_GCODES.contains(&word.as_str()) {
                in_cutting_mode = false;
            }
        }

        for m in m_words_regex().find_iter(&code) {
            let word = m.as_str().to_uppercase();
            if !SUPPORTED_MCODES.contains(&word.as_str()) {
                issues.push(ValidationIssue::warning(
                    line_num,
                    format!("Unsupported M-code: {}", word),
                    word,
                ));
            }
        }

        if let Some(value) = feed_regex()
            .captures(&code)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
        {
            feed_rate = Some(value);
        }

        if in_cutting_mode && feed_rate.is_none() && movement_regex().is_match(&code) {
            issues.push(ValidationIssue::warning(
                line_num,
                "Cutting move without feed rate specified",
                "MISSING_FEED",
            ));
        }

        let is_rapid =
            rapid_word_regex().is_match(&code) || (g_words.is_empty() && !in_cutting_mode);
        if let Some(new_z) = z_regex()
            .captures(&code)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
        {
            if is_rapid && new_z < 0.0 && last_z.is_some_and(|z| new_z < z) {
                issues.push(ValidationIssue::warning(
                    line_num,
                    format!("Rapid plunge detected: Z{} (consider using G1)", new_z),
                    "RAPID_PLUNGE",
                ));
            }
            last_z = Some(new_z);
        }

        if !charset_regex().is_match(&code) {
            issues.push(ValidationIssue::error(
                line_num,
                "Malformed command syntax",
                "SYNTAX_ERROR",
            ));
        }
    }

    let error_count = issues
        .iter()
        .filter(|i| i.severity == ValidationSeverity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    debug!(
        "Validation complete: {} errors, {} warnings",
        error_count, warning_count
    );

    ValidationResult {
        issues,
        error_count,
        warning_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(result: &ValidationResult) -> Vec<&str> {
        result.issues.iter().map(|i| i.code.as_str()).collect()
    }

    #[test]
    fn test_clean_program() {
        let result = validate("G21\nG90\nG0 Z5\nG1 X10 F300\nG1 Y10\nM5\nM30");
        assert!(result.issues.is_empty(), "{:?}", result.issues);
        assert!(result.is_valid());
    }

    #[test]
    fn test_unsupported_codes() {
        let result = validate("G54\nm7\nG4 P1");
        assert_eq!(codes(&result), vec!["G54", "M7", "G4"]);
        assert_eq!(result.warning_count, 3);
        assert_eq!(result.issues[0].line, 1);
        assert_eq!(result.issues[1].message, "Unsupported M-code: M7");
    }

    #[test]
    fn test_missing_feed() {
        let result = validate("G1 X10\nG1 X20 F100\nG1 X30");
        assert_eq!(codes(&result), vec!["MISSING_FEED"]);
        assert_eq!(result.issues[0].line, 1);
    }

    #[test]
    fn test_rapid_plunge() {
        let result = validate("G0 Z5\nG0 Z-1");
        assert_eq!(codes(&result), vec!["RAPID_PLUNGE"]);
        assert_eq!(result.issues[0].line, 2);
        assert_eq!(
            result.issues[0].message,
            "Rapid plunge detected: Z-1 (consider using G1)"
        );

        // feed plunge is fine
        let result = validate("G0 Z5\nG1 Z-1 F100");
        assert!(result.issues.is_empty());

        // first Z has nothing to compare against
        let result = validate("G0 Z-1");
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_syntax_error() {
        let result = validate("G1 X10 F100\nHELLO WORLD");
        assert_eq!(result.error_count, 1);
        assert!(!result.is_valid());
        let issue = result.issues.last().unwrap();
        assert_eq!(issue.code, "SYNTAX_ERROR");
        assert_eq!(issue.line, 2);
        assert_eq!(issue.severity, ValidationSeverity::Error);
    }

    #[test]
    fn test_skips_comments_and_percent() {
        let result = validate("%\n(header)\n; note\nG1 X1 F10 (inline ?)");
        assert!(result.issues.is_empty(), "{:?}", result.issues);
    }
}
