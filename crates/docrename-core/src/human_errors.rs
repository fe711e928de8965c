// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain-language error messages for the operator running a batch.
//
// Every technical error is mapped to a short message plus what to do next.

use crate::error::DocrenameError;

/// Who has to act on an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Affects one file only; the batch carries on.
    PerFile,
    /// The operator must fix the setup (install a tool, correct a path).
    SetupRequired,
    /// A bug or an unexpected state; report it.
    Internal,
}

/// A human-readable error with an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    pub message: String,
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a `DocrenameError` into text an office user can act on.
pub fn humanize_error(err: &DocrenameError) -> HumanError {
    match err {
        DocrenameError::ToolNotFound { tool, hint } => HumanError {
            message: format!("{tool} could not be found."),
            suggestion: hint.clone(),
            severity: Severity::SetupRequired,
        },

        DocrenameError::Config(detail) => HumanError {
            message: "The tool settings are not usable.".into(),
            suggestion: format!(
                "Fix the path with `docrename config set-tesseract` or `docrename config set-poppler`. ({detail})"
            ),
            severity: Severity::SetupRequired,
        },

        DocrenameError::Render(_) | DocrenameError::PdfError(_) => HumanError {
            message: "This PDF could not be opened as an image.".into(),
            suggestion: "The file may be damaged or password-protected. Open it in a viewer to check.".into(),
            severity: Severity::PerFile,
        },

        DocrenameError::Ocr(_) | DocrenameError::ImageError(_) => HumanError {
            message: "Text recognition failed on this scan.".into(),
            suggestion: "Rescan the first page at a higher resolution and try again.".into(),
            severity: Severity::PerFile,
        },

        DocrenameError::InvalidIdentifier { identifier, .. } => HumanError {
            message: format!("{identifier:?} cannot be used as a filename."),
            suggestion: "Enter the number without slashes or other path characters.".into(),
            severity: Severity::PerFile,
        },

        DocrenameError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "The file or folder could not be found.".into(),
                suggestion: "It may have been moved or deleted while the batch was running.".into(),
                severity: Severity::PerFile,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "Permission denied while renaming.".into(),
                suggestion: "Close any program that has the PDF open and check folder permissions.".into(),
                severity: Severity::PerFile,
            },
            _ => HumanError {
                message: "A file could not be read or written.".into(),
                suggestion: "Check that the disk is not full and try again.".into(),
                severity: Severity::PerFile,
            },
        },

        DocrenameError::Review(_) | DocrenameError::BatchState(_) | DocrenameError::Serialization(_) => {
            HumanError {
                message: "docrename hit an unexpected internal state.".into(),
                suggestion: "Run again with --verbose and report the log.".into(),
                severity: Severity::Internal,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tool_needs_setup() {
        let err = DocrenameError::ToolNotFound {
            tool: "tesseract".into(),
            hint: "apt install tesseract-ocr".into(),
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::SetupRequired);
        assert!(human.suggestion.contains("apt install"));
    }

    #[test]
    fn render_failure_is_per_file() {
        let human = humanize_error(&DocrenameError::Render("exit status 1".into()));
        assert_eq!(human.severity, Severity::PerFile);
    }

    #[test]
    fn permission_denied_is_per_file() {
        let err = DocrenameError::Io(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert!(humanize_error(&err).message.contains("Permission"));
    }
}
