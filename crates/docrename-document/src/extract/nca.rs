// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Notice of Cash Allocation numbers.
//
// On the NCA form the number sits on the line directly above the one carrying
// the "2067" account code, so only that line is searched. Full-text search
// picks up reference numbers from the body instead.

use std::sync::LazyLock;

use docrename_core::SuggestionList;
use regex::Regex;

use super::Extraction;

const ANCHOR: &str = "2067";

/// Tried in order against the candidate line.
static PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        r"NCA-[A-Z]{2,5}-[A-Z]-\d{2,4}-\d{7}",
        r"NCA-[A-Z]{2,5}-[A-Z]-\d{2,4}-\d{6}",
        r"\d{5,7}[-–]\d{1,3}",
    ]
    .map(|pattern| Regex::new(pattern).expect("NCA pattern is valid"))
});

/// Look for the number above each anchor line, top to bottom.
pub fn find_number(text: &str) -> Option<String> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    lines
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| line.contains(ANCHOR))
        .find_map(|(index, _)| {
            let candidate = lines[index - 1];
            PATTERNS
                .iter()
                .find_map(|pattern| pattern.find(candidate))
                .map(|m| m.as_str().to_string())
        })
}

/// NCA review never offers suggestions; the reviewer reads the full page.
pub fn extract(text: &str) -> Extraction {
    match find_number(text) {
        Some(number) => Extraction::Confident(number),
        None => Extraction::Inconclusive(SuggestionList::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_line_above_anchor() {
        let text = "Header\nNCA-BMB-A-24-1234567\n2067 Fund\n";
        assert_eq!(find_number(text).as_deref(), Some("NCA-BMB-A-24-1234567"));
    }

    #[test]
    fn blank_lines_do_not_break_adjacency() {
        let text = "NCA-BMB-A-24-1234567\n\n   \n  2067 Fund";
        assert_eq!(find_number(text).as_deref(), Some("NCA-BMB-A-24-1234567"));
    }

    #[test]
    fn six_digit_and_short_forms() {
        assert_eq!(
            find_number("NCA-RO-B-2024-123456\n2067").as_deref(),
            Some("NCA-RO-B-2024-123456")
        );
        assert_eq!(find_number("No. 123456-12\n2067").as_deref(), Some("123456-12"));
        assert_eq!(find_number("No. 1234567–1\n2067").as_deref(), Some("1234567–1"));
    }

    #[test]
    fn seven_digit_form_preferred() {
        // Both long patterns could match; the seven-digit one is tried first.
        let text = "NCA-BMB-A-24-1234567 NCA-BMB-A-24-123456\n2067";
        assert_eq!(find_number(text).as_deref(), Some("NCA-BMB-A-24-1234567"));
    }

    #[test]
    fn anchor_on_first_line_is_ignored() {
        assert_eq!(find_number("2067 NCA-BMB-A-24-1234567\nmore"), None);
    }

    #[test]
    fn later_anchor_used_when_first_has_no_number() {
        let text = "nothing\n2067\nNCA-BMB-A-24-7654321\n2067 again";
        assert_eq!(find_number(text).as_deref(), Some("NCA-BMB-A-24-7654321"));
    }

    #[test]
    fn no_anchor_is_inconclusive_without_suggestions() {
        let result = extract("NCA-BMB-A-24-1234567\nno anchor here");
        assert_eq!(result, Extraction::Inconclusive(SuggestionList::new()));
    }

    #[test]
    fn number_elsewhere_is_ignored() {
        let text = "NCA-BMB-A-24-1234567\nbody\n2067";
        assert_eq!(find_number(text), None);
    }
}
