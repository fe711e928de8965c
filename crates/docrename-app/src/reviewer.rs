// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interactive terminal reviewer.
//
// A review request is shown as a prompt plus a preview PNG written to a
// scratch directory. Answers come from a stdin reader thread, so the async
// event loop keeps listening for Ctrl-C while the operator types.

use std::io::BufRead;
use std::path::PathBuf;

use docrename_core::ReviewRequest;
use docrename_core::error::Result;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Lines typed on stdin. The channel closes at end of input.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    // A plain thread rather than a blocking task: a read blocked on stdin must
    // not hold up runtime shutdown.
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!(error = %err, "stdin read failed");
                    break;
                }
            }
        }
        debug!("stdin reader finished");
    });
    rx
}

pub struct TerminalReviewer {
    previews: TempDir,
}

impl TerminalReviewer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            previews: tempfile::Builder::new().prefix("docrename-review").tempdir()?,
        })
    }

    /// Save the preview and build the prompt for `request`. A preview that
    /// cannot be written is reported in the prompt; the review still happens.
    pub fn present(&self, request: &ReviewRequest) -> String {
        let preview = self.preview_path(request);
        let location = match std::fs::write(&preview, &request.preview_png) {
            Ok(()) => preview.display().to_string(),
            Err(err) => {
                warn!(error = %err, path = %preview.display(), "could not write review preview");
                "unavailable".to_string()
            }
        };
        prompt(request, &location)
    }

    fn preview_path(&self, request: &ReviewRequest) -> PathBuf {
        let stem = request
            .file_name
            .rsplit_once('.')
            .map_or(request.file_name.as_str(), |(stem, _)| stem);
        self.previews.path().join(format!("{}-{}.png", request.id, stem))
    }
}

fn prompt(request: &ReviewRequest, preview: &str) -> String {
    let label = request.document_type.label();
    let mut text = format!(
        "\n{label} number not found in {}.\n  Preview: {}\n",
        request.file_name, preview
    );
    if request.suggestions.is_empty() {
        text.push_str("  No suggestions.\n");
    } else {
        text.push_str("  Suggestions:\n");
        for (n, suggestion) in request.suggestions.iter().enumerate() {
            text.push_str(&format!("    [{}] {}\n", n + 1, suggestion));
        }
    }
    text.push_str(&format!(
        "Enter the {label} number, a suggestion number, or nothing to skip: "
    ));
    text
}

/// Turn a typed line into the answer: a suggestion index picks that
/// suggestion, anything else is taken as typed.
pub fn interpret(request: &ReviewRequest, line: &str) -> String {
    let typed = line.trim();
    typed
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=request.suggestions.len()).contains(n))
        .map(|n| request.suggestions[n - 1].clone())
        .unwrap_or_else(|| typed.to_string())
}

#[cfg(test)]
mod tests {
    use docrename_core::{DocumentType, ReviewId};

    use super::*;

    fn request(suggestions: &[&str]) -> ReviewRequest {
        ReviewRequest {
            id: ReviewId(4),
            document_type: DocumentType::Saro,
            file_name: "scan 7.pdf".into(),
            source_path: PathBuf::from("/scans/scan 7.pdf"),
            preview_png: vec![0x89, b'P', b'N', b'G'],
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn number_picks_suggestion() {
        let req = request(&["A-01-05818", "A-02-00001"]);
        assert_eq!(interpret(&req, " 2\n"), "A-02-00001");
        assert_eq!(interpret(&req, "1"), "A-01-05818");
    }

    #[test]
    fn out_of_range_number_is_literal() {
        // NCA short codes are all digits, so they must pass through.
        let req = request(&["A-01-05818"]);
        assert_eq!(interpret(&req, "3"), "3");
        assert_eq!(interpret(&request(&[]), "1234567"), "1234567");
    }

    #[test]
    fn blank_means_skip() {
        assert_eq!(interpret(&request(&["x"]), "   "), "");
    }

    #[test]
    fn present_writes_preview() {
        let reviewer = TerminalReviewer::new().unwrap();
        let req = request(&["A-01-05818"]);
        let text = reviewer.present(&req);

        let preview = reviewer.previews.path().join("review-4-scan 7.png");
        assert_eq!(std::fs::read(&preview).unwrap(), req.preview_png);
        assert!(text.contains("SARO number not found in scan 7.pdf"));
        assert!(text.contains("[1] A-01-05818"));
    }
}
