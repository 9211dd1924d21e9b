//! Text normalization for PDF-extracted text.
//!
//! Strips running headers and footers, repairs line-wrapped hyphenation,
//! removes table-of-contents dot leaders and dash characters, normalizes
//! bullet markers, and collapses whitespace. The output is a fixed point:
//! cleaning it again changes nothing.

use std::path::Path;

use obligo_core::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

/// "Revised 08/02/25" and "Page 4 of 10" lines.
static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[ \t]*(?:Revised\s+\d{1,2}/\d{1,2}/\d{2,4}|Page\s+\d+\s+of\s+\d+).*$").unwrap()
});
static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t]*[-–—]{5,}[ \t]*$").unwrap());
static HYPHEN_WRAP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+)-\n(\w+)").unwrap());
// Dashes between leader dots are removed in the next step, so they belong to the run.
static DOT_LEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.(?:[-–—]*\.)+").unwrap());
static DASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-–—]").unwrap());
static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*[-–—•☐▪](?:[ \t]*[-–—•☐▪])*[ \t]*").unwrap());
static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").unwrap());
static HSPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static LINE_INDENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]+").unwrap());

/// Upper bound on repeated passes; real text settles in two or three.
const MAX_PASSES: usize = 16;

/// Clean raw extracted text.
///
/// A single pass can expose new work for itself: a header line that only
/// exists once a wrapped hyphen is rejoined, or once a stray dash or dot
/// leader is removed. Passes repeat until the text stops changing.
pub fn clean(text: &str) -> String {
    let mut current = clean_pass(text);
    for _ in 0..MAX_PASSES {
        let next = clean_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn clean_pass(text: &str) -> String {
    let kept: Vec<&str> = text
        .lines()
        .filter(|line| !HEADER_RE.is_match(line))
        .filter(|line| !SEPARATOR_RE.is_match(line))
        .collect();
    let mut txt = kept.join("\n");

    // A rejoined word can end in another wrapped hyphen.
    while HYPHEN_WRAP_RE.is_match(&txt) {
        txt = HYPHEN_WRAP_RE.replace_all(&txt, "${1}${2}").into_owned();
    }

    let txt = DOT_LEADER_RE.replace_all(&txt, "");

    let txt = txt
        .split('\n')
        .map(strip_dashes_and_normalize_bullet)
        .collect::<Vec<_>>()
        .join("\n");

    let txt = BLANK_RUN_RE.replace_all(&txt, "\n\n");
    let txt = HSPACE_RE.replace_all(&txt, " ");
    let txt = LINE_INDENT_RE.replace_all(&txt, "\n");

    txt.trim().to_string()
}

/// Remove dash characters from a line, keeping a leading bullet marker as `"- "`.
fn strip_dashes_and_normalize_bullet(line: &str) -> String {
    match BULLET_RE.find(line) {
        Some(marker) => {
            let rest = DASH_RE.replace_all(&line[marker.end()..], "");
            format!("- {rest}")
        }
        None => DASH_RE.replace_all(line, "").into_owned(),
    }
}

/// Clean every `*.{extension}` file in `dir` in place.
///
/// Files that cannot be read or written are logged and skipped.
/// Returns the number of files rewritten.
pub fn clean_folder(dir: &Path, extension: &str) -> Result<usize> {
    let mut cleaned = 0;

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }

        let raw = match std::fs::read(&path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!("Skipping unreadable file {}: {}", path.display(), e);
                continue;
            }
        };

        let text = clean(&raw);
        if let Err(e) = std::fs::write(&path, &text) {
            warn!("Failed to write cleaned text to {}: {}", path.display(), e);
            continue;
        }
        debug!("Cleaned {} ({} -> {} bytes)", path.display(), raw.len(), text.len());
        cleaned += 1;
    }

    info!("Cleaned {} files in {}", cleaned, dir.display());
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_hyphenation() {
        let input = "This is a hy-\nphenated word.\n\n\n\nPage 4 of 10";
        assert_eq!(clean(input), "This is a hyphenated word.");
    }

    #[test]
    fn test_revised_header_case_insensitive() {
        let input = "REVISED 8/2/25 draft\nThe lessee shall maintain the premises.";
        assert_eq!(clean(input), "The lessee shall maintain the premises.");
    }

    #[test]
    fn test_multi_pass_hyphenation() {
        assert_eq!(clean("anti-\ndis-\nestablishment"), "antidisestablishment");
    }

    #[test]
    fn test_separator_lines_dropped() {
        assert_eq!(clean("above\n———————\nbelow"), "above\nbelow");
    }

    #[test]
    fn test_dot_leaders_removed() {
        assert_eq!(clean("Section 4 Payments........12"), "Section 4 Payments12");
    }

    #[test]
    fn test_inline_dashes_removed() {
        assert_eq!(clean("a well-known long–term deal"), "a wellknown longterm deal");
    }

    #[test]
    fn test_bullets_normalized() {
        let input = "Duties:\n  •   submit reports\n☐ pay fees\n▪ keep records";
        assert_eq!(
            clean(input),
            "Duties:\n- submit reports\n- pay fees\n- keep records"
        );
    }

    #[test]
    fn test_whitespace_collapsed() {
        let input = "  one\t\ttwo   three\n\t four";
        assert_eq!(clean(input), "one two three\nfour");
    }

    #[test]
    fn test_blank_runs_collapsed() {
        assert_eq!(clean("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(clean("a\n \n\t\n\nb"), "a\n\nb");
        assert_eq!(clean("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_idempotent() {
        let input = "Revised 01/02/2024\n  • The Con-\ntractor shall sub-\nmit all in-\nvoices.....3\n\n\n\n\
                     -----\n – a dash—line  here\n\t\tPage 2 of 9\n.-.\nlast  line -";
        let once = clean(input);
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn test_header_exposed_by_repairs_is_dropped() {
        let inputs = [
            "Pa-\nge 4 of 10\nThe tenant shall pay rent",
            "Pa-ge 4 of 10\nThe tenant shall pay rent",
            "Pa..ge 4 of 10\nThe tenant shall pay rent",
            "Re-\nvised 01/02/2025 draft\nThe tenant shall pay rent",
        ];
        for input in inputs {
            let once = clean(input);
            assert_eq!(once, "The tenant shall pay rent", "{input:?}");
            assert_eq!(clean(&once), once, "{input:?}");
        }
    }

    #[test]
    fn test_empty() {
        assert_eq!(clean(""), "");
    }

    #[test]
    fn test_clean_folder_rewrites_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "Page 1 of 2\nfoo   bar").unwrap();
        std::fs::write(dir.path().join("b.md"), "Page 1 of 2\nleave me").unwrap();

        let count = clean_folder(dir.path(), "txt").unwrap();
        assert_eq!(count, 1);
        assert_eq!(std::fs::read_to_string(dir.path().join("a.txt")).unwrap(), "foo bar");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("b.md")).unwrap(),
            "Page 1 of 2\nleave me"
        );
    }
}
