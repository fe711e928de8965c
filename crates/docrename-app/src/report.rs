// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-of-batch report for the terminal.

use std::fmt::Write;

use docrename_core::BatchResult;

/// How many not-renamed lines the headline section lists before eliding.
const PREVIEW_LINES: usize = 10;

pub fn render(result: &BatchResult) -> String {
    let mut out = String::new();
    let not_renamed: Vec<&str> = result.not_renamed().collect();

    let _ = writeln!(
        out,
        "\n{} batch {}. Renamed {} of {} file(s).",
        result.document_type,
        if result.canceled { "canceled" } else { "finished" },
        result.renamed,
        result.total
    );
    if result.canceled {
        let _ = writeln!(out, "{} file(s) were not processed.", result.total - result.processed());
    }

    if !not_renamed.is_empty() {
        let _ = writeln!(out, "\nNot renamed ({}):", not_renamed.len());
        for line in not_renamed.iter().take(PREVIEW_LINES) {
            let _ = writeln!(out, "  {line}");
        }
        if not_renamed.len() > PREVIEW_LINES {
            let _ = writeln!(out, "  ...");
            let _ = writeln!(out, "\nAll not renamed:");
            for line in &not_renamed {
                let _ = writeln!(out, "  {line}");
            }
        }
    }

    if !result.summary.is_empty() {
        let _ = writeln!(out, "\nRenamed:");
        for line in &result.summary {
            let _ = writeln!(out, "  {line}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use docrename_core::{BatchId, DocumentType};

    use super::*;

    fn result(skipped: usize, canceled: bool) -> BatchResult {
        BatchResult {
            batch_id: BatchId::new(),
            document_type: DocumentType::Obr,
            renamed: 1,
            skipped: (0..skipped).map(|i| format!("s{i}.pdf (OBR number not found)")).collect(),
            errors: vec!["e.pdf (error: page rendering failed: bad)".into()],
            summary: vec!["a.pdf ➔ MOOE-1.pdf".into()],
            total: skipped + 4,
            canceled,
            started_at: Utc::now(),
            finished_at: Utc::now(),
        }
    }

    #[test]
    fn short_report_lists_everything_once() {
        let text = render(&result(2, false));
        assert!(text.contains("OBR batch finished. Renamed 1 of 6 file(s)."));
        assert!(text.contains("Not renamed (3):"));
        assert!(text.contains("  e.pdf (error: page rendering failed: bad)"));
        assert!(text.contains("  a.pdf ➔ MOOE-1.pdf"));
        assert!(!text.contains("..."));
        assert_eq!(text.matches("s0.pdf").count(), 1);
    }

    #[test]
    fn long_report_elides_then_lists_all() {
        let text = render(&result(12, false));
        assert!(text.contains("  ...\n"));
        assert!(text.contains("All not renamed:"));
        // s11 and the error line only appear in the full list.
        assert_eq!(text.matches("s11.pdf").count(), 1);
        assert_eq!(text.matches("s0.pdf").count(), 2);
    }

    #[test]
    fn canceled_report_counts_unprocessed() {
        let text = render(&result(1, true));
        assert!(text.contains("batch canceled"));
        // total 5, processed 1 + 1 + 1.
        assert!(text.contains("2 file(s) were not processed."));
    }
}
