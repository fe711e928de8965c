// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Special Allotment Release Order numbers.
//
// The number is printed in the bottom-right corner, so a second OCR pass over
// a grayscale crop of that corner is what the strict patterns run against.
// Full-page text only feeds the reviewer's suggestions.

use std::sync::LazyLock;

use docrename_core::error::DocrenameError;
use docrename_core::{DocumentType, PageRegion, PageSegMode, SuggestionList};
use image::DynamicImage;
use regex::Regex;
use tracing::debug;

use super::Extraction;
use crate::image::ImageProcessor;
use crate::ocr::TextRecognizer;

/// Bottom-right corner read by the focused OCR pass.
pub const FOCUS_REGION: PageRegion = PageRegion::new(0.5, 0.75, 1.0, 1.0);

/// `SARO-BMB-A-08-0016104`, tolerating spaces or missing hyphens from OCR.
/// Each part is captured so the number can be rebuilt with hyphens.
static SARO_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(SARO)[-\s]?([A-Z]{3})[-\s]?([A-Z])?[-\s]?(\d{2})[-\s]?(\d{7})")
        .expect("SARO number pattern is valid")
});

/// Short form `A-01-05818`.
static LETTER_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z]-\d{2}-\d{5})\b").expect("SARO letter pattern is valid")
});

/// Whatever follows a "SARO No." label, however badly recognised.
static LABELLED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)SARO\s*No\.?\s*[:\-~]?\s*([A-Z0-9\-~–]+)").expect("SARO label pattern is valid")
});

/// OCR the bottom-right corner of `page` in grayscale.
pub fn focused_text(page: &DynamicImage, ocr: &dyn TextRecognizer) -> Result<String, DocrenameError> {
    let corner = ImageProcessor::from_dynamic(page.clone())
        .crop_region(FOCUS_REGION)
        .grayscale();
    let text = ocr.recognize_text(corner.as_dynamic(), PageSegMode::Auto)?;
    debug!(chars = text.len(), "focused SARO OCR complete");
    Ok(text)
}

/// Rejoin the parts of a [`SARO_NUMBER`] match with single hyphens, so OCR
/// spacing never leaks into the filename and the `SARO-` prefix survives.
fn hyphenated(caps: &regex::Captures<'_>) -> String {
    caps.iter()
        .skip(1)
        .flatten()
        .map(|part| part.as_str())
        .collect::<Vec<_>>()
        .join("-")
}

/// Strict match against the focused text: full SARO form first, then the
/// letter form.
pub fn find_number(focused: &str) -> Option<String> {
    if let Some(caps) = SARO_NUMBER.captures(focused) {
        return Some(hyphenated(&caps));
    }
    LETTER_NUMBER.captures(focused).map(|caps| caps[1].to_string())
}

/// Clean up a value read after a "SARO No." label.
fn normalize_labelled(raw: &str) -> String {
    let dashed = raw.replace(['~', '–'], "-");
    DocumentType::Saro.normalize_identifier(&dashed)
}

/// Candidates for the reviewer, gathered from each text in turn.
///
/// For every text, the labelled value comes first, then any line-level
/// strict matches. Collection stops once the list is full.
pub fn suggestions(texts: &[&str]) -> SuggestionList {
    let mut list = SuggestionList::new();
    for text in texts {
        if let Some(caps) = LABELLED.captures(text) {
            list.push(normalize_labelled(&caps[1]));
        }
        for line in text.lines() {
            if let Some(caps) = LETTER_NUMBER.captures(line) {
                list.push(&caps[1]);
            }
            if let Some(caps) = SARO_NUMBER.captures(line) {
                list.push(hyphenated(&caps));
            }
            if list.is_full() {
                return list;
            }
        }
    }
    list
}

pub fn extract(focused: &str, full: &str) -> Extraction {
    match find_number(focused) {
        Some(number) => Extraction::Confident(number),
        None => Extraction::Inconclusive(suggestions(&[focused, full])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_full_form() {
        assert_eq!(
            find_number("SARO No. SARO-BMB-A-08-0016104").as_deref(),
            Some("SARO-BMB-A-08-0016104")
        );
    }

    #[test]
    fn strict_form_rebuilds_hyphens() {
        for noisy in ["SARO BMB A 08 0016104", "SAROBMBA080016104", "SARO-BMB A-08 0016104"] {
            assert_eq!(
                find_number(noisy).as_deref(),
                Some("SARO-BMB-A-08-0016104"),
                "{noisy:?}"
            );
        }
        assert_eq!(find_number("SARO BMB 08 0016104").as_deref(), Some("SARO-BMB-08-0016104"));
        // Already prefixed, so the filename keeps it as is.
        assert_eq!(
            DocumentType::Saro.normalize_identifier(&find_number("SARO BMB A 08 0016104").unwrap()),
            "SARO-BMB-A-08-0016104"
        );
    }

    #[test]
    fn strict_letter_form() {
        assert_eq!(find_number("ref A-01-05818 end").as_deref(), Some("A-01-05818"));
        assert_eq!(find_number("XA-01-05818"), None);
    }

    #[test]
    fn labelled_value_is_normalized() {
        let list = suggestions(&["SARO No.: A~01~05818"]);
        assert_eq!(list.as_slice(), &["A-01-05818"]);

        let list = suggestions(&["saro no ~ 01–05818"]);
        assert_eq!(list.as_slice(), &["A-01-05818"]);
    }

    #[test]
    fn labelled_value_keeps_existing_prefix() {
        let list = suggestions(&["SARO No: SARO-BMB-A-08-001"]);
        assert_eq!(list.as_slice(), &["SARO-BMB-A-08-001"]);
    }

    #[test]
    fn short_form_label_suggests_identifier() {
        // The letter form is also a strict match, so extraction is confident.
        let text = "SARO No: A-01-05818";
        assert_eq!(suggestions(&[text]).as_slice(), &["A-01-05818"]);
        assert_eq!(extract(text, ""), Extraction::Confident("A-01-05818".into()));
    }

    #[test]
    fn focused_text_comes_before_full_text() {
        let list = suggestions(&["SARO No. 02-11111", "SARO No. 03-22222"]);
        assert_eq!(list.as_slice(), &["A-02-11111", "A-03-22222"]);
    }

    #[test]
    fn suggestions_capped_at_three() {
        let full = "B-01-00001\nC-01-00002\nD-01-00003\nE-01-00004";
        let list = suggestions(&["", full]);
        assert_eq!(list.len(), SuggestionList::MAX);
        assert_eq!(list.as_slice(), &["B-01-00001", "C-01-00002", "D-01-00003"]);
    }

    #[test]
    fn extract_inconclusive_uses_both_texts() {
        let result = extract("illegible corner", "SARO No. 7-33333\nA-09-12345");
        assert_eq!(
            result,
            Extraction::Inconclusive(SuggestionList::from_iter(["A-7-33333", "A-09-12345"]))
        );
    }

    #[test]
    fn nothing_found() {
        assert_eq!(
            extract("", "no identifiers"),
            Extraction::Inconclusive(SuggestionList::new())
        );
    }
}
