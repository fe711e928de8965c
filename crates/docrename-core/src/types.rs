// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the docrename batch renamer.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DocrenameError;

/// Unique identifier for a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId(pub Uuid);

impl BatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three supported document families. Each has its own identifier format
/// and typical on-page location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// Obligation Request (serials like `MOOE-2024-000123`, `PGF...`, `PS...`).
    Obr,
    /// Notice of Cash Allocation (`NCA-BMB-A-24-1234567`).
    Nca,
    /// Special Allotment Release Order (`SARO-BMB-A-08-0016104`, `A-01-05818`).
    Saro,
}

impl DocumentType {
    /// Upper-case label used in progress text and skip reasons.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Obr => "OBR",
            Self::Nca => "NCA",
            Self::Saro => "SARO",
        }
    }

    /// Tesseract page-segmentation mode used for the full-page OCR pass.
    ///
    /// NCA forms are read as one uniform block so that the line above the
    /// "2067" anchor stays adjacent in the output.
    pub fn page_segmentation(&self) -> PageSegMode {
        match self {
            Self::Nca => PageSegMode::SingleBlock,
            Self::Obr | Self::Saro => PageSegMode::Auto,
        }
    }

    /// Region of page 1 shown to the reviewer when extraction is inconclusive.
    pub fn preview_region(&self) -> PageRegion {
        match self {
            Self::Obr => PageRegion::new(0.5, 0.0, 1.0, 0.3),
            Self::Nca => PageRegion::FULL,
            Self::Saro => PageRegion::new(0.5, 0.7, 1.0, 1.0),
        }
    }

    /// Turn an accepted identifier into the stem of the new filename.
    ///
    /// SARO identifiers must start with `SARO-` or `A-` (case-insensitive);
    /// anything else gets `A-` prepended. OBR and NCA are used verbatim.
    pub fn normalize_identifier(&self, identifier: &str) -> String {
        let trimmed = identifier.trim();
        match self {
            Self::Saro => {
                let upper = trimmed.to_ascii_uppercase();
                if upper.starts_with("SARO-") || upper.starts_with("A-") {
                    trimmed.to_string()
                } else {
                    format!("A-{trimmed}")
                }
            }
            Self::Obr | Self::Nca => trimmed.to_string(),
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocumentType {
    type Err = DocrenameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "obr" => Ok(Self::Obr),
            "nca" => Ok(Self::Nca),
            "saro" => Ok(Self::Saro),
            other => Err(DocrenameError::Config(format!(
                "unknown document type {other:?} (expected obr, nca or saro)"
            ))),
        }
    }
}

/// Tesseract page-segmentation modes the pipeline uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSegMode {
    /// Fully automatic page segmentation (`--psm 3`).
    Auto,
    /// Assume a single uniform block of text (`--psm 6`).
    SingleBlock,
}

impl PageSegMode {
    pub fn tesseract_value(&self) -> u8 {
        match self {
            Self::Auto => 3,
            Self::SingleBlock => 6,
        }
    }
}

/// A rectangle on the page expressed as fractions of width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageRegion {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PageRegion {
    pub const FULL: Self = Self {
        left: 0.0,
        top: 0.0,
        right: 1.0,
        bottom: 1.0,
    };

    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Pixel rectangle `(x, y, width, height)` for an image of the given size.
    ///
    /// Edges are truncated toward zero, matching integer cropping of
    /// `width * fraction`. The result never exceeds the image bounds.
    pub fn to_pixels(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let scale = |fraction: f64, extent: u32| -> u32 {
            (f64::from(extent) * fraction.clamp(0.0, 1.0)) as u32
        };
        let x0 = scale(self.left, width);
        let y0 = scale(self.top, height);
        let x1 = scale(self.right, width).max(x0);
        let y1 = scale(self.bottom, height).max(y0);
        (x0, y0, x1 - x0, y1 - y0)
    }
}

/// Lifecycle of a single file within a batch.
///
/// Status only ever moves forward; `Renamed`, `Skipped` and `Errored` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileStatus {
    /// Not started yet.
    Pending,
    /// Page 1 is being rasterised.
    Rendering,
    /// OCR and pattern matching.
    Extracting,
    /// Waiting on the human reviewer.
    AwaitingReview,
    /// Renamed in place.
    Renamed,
    /// Left untouched (collision, no identifier, canceled).
    Skipped,
    /// Render/OCR or filesystem failure.
    Errored,
}

impl FileStatus {
    fn rank(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Rendering => 1,
            Self::Extracting => 2,
            Self::AwaitingReview => 3,
            Self::Renamed | Self::Skipped | Self::Errored => 4,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.rank() == 4
    }

    /// Whether `next` is a legal forward transition from `self`.
    pub fn precedes(&self, next: FileStatus) -> bool {
        next.rank() > self.rank()
    }
}

/// Ordered, de-duplicated list of at most [`SuggestionList::MAX`] candidate
/// identifiers offered to the reviewer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionList {
    items: Vec<String>,
}

impl SuggestionList {
    pub const MAX: usize = 3;

    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate. Blank, duplicate and over-capacity values are ignored.
    /// Returns `true` if the value was stored.
    pub fn push(&mut self, candidate: impl Into<String>) -> bool {
        let candidate = candidate.into();
        let candidate = candidate.trim();
        if candidate.is_empty() || self.is_full() || self.items.iter().any(|s| s == candidate) {
            return false;
        }
        self.items.push(candidate.to_string());
        true
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= Self::MAX
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }
}

impl<S: Into<String>> FromIterator<S> for SuggestionList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::new();
        for item in iter {
            list.push(item);
        }
        list
    }
}

/// A rename run over one directory. Immutable once the batch starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchJob {
    pub id: BatchId,
    pub target_dir: PathBuf,
    /// Source filenames (not paths), processed in this order.
    pub files: Vec<String>,
    pub document_type: DocumentType,
}

impl BatchJob {
    pub fn new(target_dir: impl Into<PathBuf>, files: Vec<String>, document_type: DocumentType) -> Self {
        Self {
            id: BatchId::new(),
            target_dir: target_dir.into(),
            files,
            document_type,
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Per-file state owned by the orchestrator for the duration of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTask {
    pub file_name: String,
    pub source: PathBuf,
    pub status: FileStatus,
    pub extracted_text: Option<String>,
    /// Identifier proposed by extraction or by the reviewer.
    pub candidate: Option<String>,
    pub suggestions: SuggestionList,
    /// New filename after a successful rename.
    pub new_name: Option<String>,
    /// Skip reason or error detail, in report form.
    pub reason: Option<String>,
}

impl FileTask {
    pub fn new(dir: &Path, file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        Self {
            source: dir.join(&file_name),
            file_name,
            status: FileStatus::Pending,
            extracted_text: None,
            candidate: None,
            suggestions: SuggestionList::new(),
            new_name: None,
            reason: None,
        }
    }

    /// Move to `next`. Backward or sideways transitions are refused and leave
    /// the task unchanged.
    pub fn advance(&mut self, next: FileStatus) -> bool {
        if self.status.precedes(next) {
            self.status = next;
            true
        } else {
            tracing::warn!(
                file = %self.file_name,
                from = ?self.status,
                to = ?next,
                "refusing non-forward status transition"
            );
            false
        }
    }
}

/// Identifier for one review round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewId(pub u64);

impl std::fmt::Display for ReviewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "review-{}", self.0)
    }
}

/// What the reviewer is shown while a file waits in `AwaitingReview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub id: ReviewId,
    pub document_type: DocumentType,
    pub file_name: String,
    pub source_path: PathBuf,
    /// PNG-encoded crop of page 1 (see [`DocumentType::preview_region`]).
    pub preview_png: Vec<u8>,
    pub suggestions: Vec<String>,
}

/// The reviewer's answer to a [`ReviewRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewResponse {
    /// Free text typed or picked by the reviewer; may be empty.
    Answer(String),
    /// The batch was canceled while the request was outstanding.
    Canceled,
    /// Nobody answered within the configured review timeout.
    TimedOut,
}

impl ReviewResponse {
    /// The accepted identifier, if the reviewer supplied a non-blank one.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Self::Answer(value) => {
                let trimmed = value.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            Self::Canceled | Self::TimedOut => None,
        }
    }
}

/// Batch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchState {
    Idle,
    Running,
    Completed,
    Canceled,
}

/// Terminal summary of a batch, produced exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub batch_id: BatchId,
    pub document_type: DocumentType,
    pub renamed: usize,
    /// One line per skipped file, in processing order.
    pub skipped: Vec<String>,
    /// One line per errored file, in processing order.
    pub errors: Vec<String>,
    /// `"<old> ➔ <new>"` per renamed file.
    pub summary: Vec<String>,
    /// Number of files in the batch, processed or not.
    pub total: usize,
    pub canceled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchResult {
    /// Files that reached a terminal state.
    pub fn processed(&self) -> usize {
        self.renamed + self.skipped.len() + self.errors.len()
    }

    /// Every non-renamed file's line (skips, then errors), for display.
    pub fn not_renamed(&self) -> impl Iterator<Item = &str> {
        self.skipped.iter().chain(self.errors.iter()).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_only_moves_forward() {
        assert!(FileStatus::Pending.precedes(FileStatus::Rendering));
        assert!(FileStatus::Extracting.precedes(FileStatus::Renamed));
        assert!(FileStatus::Rendering.precedes(FileStatus::Errored));
        assert!(!FileStatus::AwaitingReview.precedes(FileStatus::Extracting));
        assert!(!FileStatus::Renamed.precedes(FileStatus::Skipped));
        assert!(!FileStatus::Pending.precedes(FileStatus::Pending));
    }

    #[test]
    fn task_refuses_backward_transition() {
        let mut task = FileTask::new(Path::new("/tmp"), "a.pdf");
        assert!(task.advance(FileStatus::Extracting));
        assert!(!task.advance(FileStatus::Rendering));
        assert_eq!(task.status, FileStatus::Extracting);
        assert!(task.advance(FileStatus::Skipped));
        assert!(task.status.is_terminal());
        assert!(!task.advance(FileStatus::Renamed));
    }

    #[test]
    fn suggestions_dedup_and_cap() {
        let list: SuggestionList = ["b", " a ", "b", "", "c", "d"].into_iter().collect();
        assert_eq!(list.as_slice(), &["b", "a", "c"]);
        assert!(list.is_full());
    }

    #[test]
    fn saro_normalization_prefixes_bare_numbers() {
        let saro = DocumentType::Saro;
        assert_eq!(saro.normalize_identifier("01-05818"), "A-01-05818");
        assert_eq!(saro.normalize_identifier("A-01-05818"), "A-01-05818");
        assert_eq!(saro.normalize_identifier("saro-BMB-A-08-0016104"), "saro-BMB-A-08-0016104");
        assert_eq!(DocumentType::Obr.normalize_identifier(" PGF-1 "), "PGF-1");
    }

    #[test]
    fn document_type_parses_case_insensitively() {
        assert_eq!("Nca".parse::<DocumentType>().unwrap(), DocumentType::Nca);
        assert!("invoice".parse::<DocumentType>().is_err());
    }

    #[test]
    fn region_to_pixels_truncates() {
        let (x, y, w, h) = DocumentType::Obr.preview_region().to_pixels(1001, 1000);
        assert_eq!((x, y, w, h), (500, 0, 501, 300));
        let (_, y, _, h) = DocumentType::Saro.preview_region().to_pixels(100, 1000);
        assert_eq!((y, h), (700, 300));
    }

    #[test]
    fn review_identifier_trims_blank_answers() {
        assert_eq!(ReviewResponse::Answer("  x ".into()).identifier(), Some("x"));
        assert_eq!(ReviewResponse::Answer("   ".into()).identifier(), None);
        assert_eq!(ReviewResponse::Canceled.identifier(), None);
    }
}
