//! Matching of survey headers and extraction of course names.
//!
//! Survey exports are not consistent from one revision to the next (extra spaces,
//! mixed case, punctuation), so everything here works on substrings rather than
//! on an exact schema. All the functions are pure.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static MOST_BENEFICIAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)most beneficial").unwrap());
static RANK_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*-\s*rank\s*$").unwrap());

/// Terms that must all be present in a normalized header for the column to be selected.
pub const MATCH_TERMS: [&str; 3] = ["macc", "core", "most beneficial"];

// Matched as-is, at the start of the label only. Longest first.
const LEADING_PREFIXES: [&str; 4] = ["MAcc CORE", "MAcc Core", "CORE", "Core"];

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '-' | ':' | '|' | '/' | '\u{2013}' | '\u{2014}')
}

/// Collapses all the runs of whitespace into single spaces and trims both ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Lowercased and whitespace-collapsed version of a header. Only used for matching.
pub fn normalize_header(text: &str) -> String {
    collapse_whitespace(text).to_lowercase()
}

/// True if the header asks which core course was the most beneficial.
pub fn is_core_most_beneficial(header: &str) -> bool {
    let normalized = normalize_header(header);
    MATCH_TERMS.iter().all(|term| normalized.contains(term))
}

fn strip_known_prefix(label: &str) -> &str {
    for prefix in LEADING_PREFIXES.iter() {
        if let Some(rest) = label.strip_prefix(prefix) {
            return rest.trim_start_matches(is_separator);
        }
    }
    label
}

/// Best-effort extraction of the course name from a survey header.
///
/// The header is cut before "most beneficial", the leading "MAcc CORE" / "CORE"
/// markers and any trailing "- rank" are removed. If nothing is left, the raw header
/// is returned unchanged so that a label is never blank.
pub fn course_label(header: &str) -> String {
    let cleaned = collapse_whitespace(header);
    let truncated = match MOST_BENEFICIAL.find(&cleaned) {
        Some(m) => cleaned[..m.start()].trim_end_matches(is_separator),
        None => cleaned.as_str(),
    };
    let without_prefix = strip_known_prefix(truncated);
    let without_suffix = RANK_SUFFIX.replace(without_prefix, "");
    let label = without_suffix.trim();
    if label.is_empty() {
        header.to_string()
    } else {
        label.to_string()
    }
}
