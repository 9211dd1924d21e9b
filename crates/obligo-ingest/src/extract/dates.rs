//! Date-shaped substring matching.
//!
//! A single case-insensitive alternation over the supported shapes,
//! scanned left to right. This is a shape matcher, not a calendar: "Feb 31,
//! 2025" is returned like any other match.

use once_cell::sync::Lazy;
use regex::Regex;

const MONTH_ABBR: &str = "(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)";
const MONTH_FULL: &str =
    "(?:january|february|march|april|may|june|july|august|september|october|november|december)";
const ORDINAL: &str = "(?:st|nd|rd|th)?";

/// Alternatives in priority order; earlier shapes win at the same start offset.
static DATE_SHAPES: Lazy<Vec<String>> = Lazy::new(|| {
    vec![
        // 2025-08-02
        r"\b\d{4}-\d{2}-\d{2}\b".to_string(),
        // 02/08/2025
        r"\b\d{2}/\d{2}/\d{4}\b".to_string(),
        // 2-8-25, 2.8.2025
        r"\b\d{1,2}[./-]\d{1,2}[./-]\d{2,4}\b".to_string(),
        // Aug 2 2025, Aug. 2nd, 2025, August 2nd, 2025
        format!(r"\b{MONTH_ABBR}[a-z]*\.?[ .-]+\d{{1,2}}{ORDINAL}[, ]+\d{{2,4}}\b"),
        format!(r"\b{MONTH_FULL}[ .-]+\d{{1,2}}{ORDINAL}[, ]+\d{{4}}\b"),
        // 2 Aug 25
        format!(r"\b\d{{1,2}}{ORDINAL}[ .-]+{MONTH_ABBR}[a-z]*[ .-]+\d{{2,4}}\b"),
        // 2nd August, 2025
        format!(r"\b\d{{1,2}}{ORDINAL}[ .-]+{MONTH_FULL}[ ,.-]+\d{{4}}\b"),
        // 2025W32
        r"\b\d{4}W\d{2}\b".to_string(),
        // 2025-214
        r"\b\d{4}-\d{3}\b".to_string(),
        // Q3 2025
        r"\bQ[1-4]\s*\d{4}\b".to_string(),
    ]
});

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("(?i){}", DATE_SHAPES.join("|"))).unwrap());

/// Every date-shaped substring of `sentence`, in order of appearance.
pub fn find_dates(sentence: &str) -> Vec<String> {
    DATE_RE
        .find_iter(sentence)
        .map(|m| m.as_str().to_string())
        .collect()
}
