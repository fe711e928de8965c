// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Obligation Request serials: a fund-class prefix followed by the serial.

use std::sync::LazyLock;

use docrename_core::SuggestionList;
use regex::Regex;

use super::Extraction;

/// Fund-class prefixes an OBR serial starts with. `CA-MOOE` comes first so
/// the longer prefix wins at the same position.
const PREFIXES: [&str; 4] = ["CA-MOOE", "MOOE", "PGF", "PS"];

static SERIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(CA-MOOE\S+|MOOE\S+|PGF\S+|PS\S+)").expect("OBR serial pattern is valid")
});

/// First serial-shaped token anywhere in the text.
pub fn find_serial(text: &str) -> Option<String> {
    SERIAL
        .find(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|serial| !serial.is_empty())
}

/// Whole lines mentioning any prefix (case-insensitive), trimmed, in order.
pub fn suggestions(text: &str) -> SuggestionList {
    text.lines()
        .filter(|line| {
            let upper = line.to_uppercase();
            PREFIXES.iter().any(|prefix| upper.contains(prefix))
        })
        .collect()
}

pub fn extract(text: &str) -> Extraction {
    match find_serial(text) {
        Some(serial) => Extraction::Confident(serial),
        None => Extraction::Inconclusive(suggestions(text)),
    }
}
