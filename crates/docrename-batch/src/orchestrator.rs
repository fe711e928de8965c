// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch orchestrator — drives every file of a batch through
// render → OCR → extract → (review) → rename, strictly in input order.
//
// The orchestrator is synchronous. Run it on a blocking worker
// (`tokio::task::spawn_blocking`) or a dedicated thread; its only suspension
// point is the review channel. Cancellation is cooperative and checked
// between stages, so an in-flight render or OCR call always finishes.
//
// One bad PDF never stops the batch: render, OCR and filesystem failures
// become that file's error line and processing moves on.

use std::sync::Arc;

use chrono::Utc;
use docrename_core::error::{DocrenameError, Result};
use docrename_core::{
    BatchJob, BatchResult, BatchState, DocumentType, FileStatus, FileTask, ReviewId,
    ReviewRequest, ReviewResponse,
};
use docrename_document::extract::{self, Extraction};
use docrename_document::{ImageProcessor, PageRenderer, TextRecognizer};
use image::DynamicImage;
use tracing::{info, instrument, warn};

use crate::events::{BatchEvent, BatchObserver};
use crate::fallback::{ReviewChannel, ReviewHandle};
use crate::resolver::{RenameOutcome, RenameResolver};

/// Runs one batch. Create a fresh orchestrator per batch.
pub struct Orchestrator {
    renderer: Arc<dyn PageRenderer>,
    ocr: Arc<dyn TextRecognizer>,
    channel: ReviewChannel,
    enhance_scans: bool,
    state: BatchState,
}

// -- Per-batch bookkeeping ---------------------------------------------------

#[derive(Default)]
struct Tally {
    renamed: usize,
    skipped: Vec<String>,
    errors: Vec<String>,
    summary: Vec<String>,
}

impl Tally {
    fn record(&mut self, task: &FileTask) {
        let line = task.reason.clone().unwrap_or_else(|| task.file_name.clone());
        match task.status {
            FileStatus::Renamed => {
                self.renamed += 1;
                let new_name = task.new_name.as_deref().unwrap_or_default();
                self.summary.push(format!("{} ➔ {}", task.file_name, new_name));
            }
            FileStatus::Skipped => self.skipped.push(line),
            FileStatus::Errored => self.errors.push(line),
            other => warn!(file = %task.file_name, status = ?other, "file left without a terminal status"),
        }
    }
}

impl Orchestrator {
    pub fn new(renderer: Arc<dyn PageRenderer>, ocr: Arc<dyn TextRecognizer>, channel: ReviewChannel) -> Self {
        Self {
            renderer,
            ocr,
            channel,
            enhance_scans: false,
            state: BatchState::Idle,
        }
    }

    /// Grayscale and histogram-equalise each page before the full-page OCR
    /// pass. Helps with faded or uneven scans.
    pub fn with_enhancement(mut self, enabled: bool) -> Self {
        self.enhance_scans = enabled;
        self
    }

    /// Reviewer-side handle for this batch: answers review requests and
    /// cancels the batch.
    pub fn review_handle(&self) -> ReviewHandle {
        self.channel.handle()
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Process every file of `job` and return the result, which is also
    /// emitted as the final [`BatchEvent::Finished`].
    ///
    /// Fails only if this orchestrator has already run a batch.
    #[instrument(skip_all, fields(batch_id = %job.id, document_type = %job.document_type, files = job.len()))]
    pub fn run(&mut self, job: &BatchJob, observer: &dyn BatchObserver) -> Result<BatchResult> {
        if self.state != BatchState::Idle {
            return Err(DocrenameError::BatchState(format!(
                "{:?}; start a new orchestrator for another batch",
                self.state
            )));
        }

        self.state = BatchState::Running;
        let started_at = Utc::now();
        let total = job.len();
        let resolver = RenameResolver::new(&job.target_dir);
        let mut tally = Tally::default();

        info!("batch started");
        observer.on_event(BatchEvent::Started {
            batch_id: job.id,
            total,
        });

        for (index, file_name) in job.files.iter().enumerate() {
            if self.channel.is_canceled() {
                info!(remaining = total - index, "batch canceled; remaining files left untouched");
                break;
            }

            observer.on_event(BatchEvent::Progress {
                index,
                total,
                label: format!("Processing {} ({}/{})", file_name, index + 1, total),
            });

            let mut task = FileTask::new(&job.target_dir, file_name.as_str());
            if let Err(err) = self.process(&mut task, job.document_type, &resolver, observer) {
                warn!(file = %task.file_name, error = %err, "file failed");
                task.reason = Some(format!("{} (error: {})", task.file_name, err));
                task.advance(FileStatus::Errored);
            }

            tally.record(&task);
            observer.on_event(BatchEvent::FileFinished {
                index,
                file_name: task.file_name.clone(),
                status: task.status,
                detail: task.new_name.clone().or(task.reason.clone()),
            });
        }

        let canceled = self.channel.is_canceled();
        self.state = if canceled {
            BatchState::Canceled
        } else {
            BatchState::Completed
        };

        let result = BatchResult {
            batch_id: job.id,
            document_type: job.document_type,
            renamed: tally.renamed,
            skipped: tally.skipped,
            errors: tally.errors,
            summary: tally.summary,
            total,
            canceled,
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            renamed = result.renamed,
            skipped = result.skipped.len(),
            errors = result.errors.len(),
            canceled,
            "batch finished"
        );
        observer.on_event(BatchEvent::Finished(result.clone()));
        Ok(result)
    }

    // -- Per-file pipeline ---------------------------------------------------

    /// Drive one file to a terminal status. An `Err` means the file errored;
    /// the caller records it.
    fn process(
        &mut self,
        task: &mut FileTask,
        document_type: DocumentType,
        resolver: &RenameResolver,
        observer: &dyn BatchObserver,
    ) -> Result<()> {
        task.advance(FileStatus::Rendering);
        let page = self.renderer.render_first_page(&task.source)?;
        if self.interrupted(task) {
            return Ok(());
        }

        task.advance(FileStatus::Extracting);
        let text = self.recognize_page(&page, document_type)?;
        if self.interrupted(task) {
            return Ok(());
        }

        let extraction = extract::extract(document_type, &text, &page, self.ocr.as_ref())?;
        task.extracted_text = Some(text);
        // SARO extraction runs a second OCR pass; nothing is renamed or
        // reviewed once a cancel has landed.
        if self.interrupted(task) {
            return Ok(());
        }

        let identifier = match extraction {
            Extraction::Confident(identifier) => identifier,
            Extraction::Inconclusive(suggestions) => {
                task.suggestions = suggestions;
                match self.review(task, document_type, &page, observer)? {
                    Some(identifier) => identifier,
                    None => {
                        task.reason = Some(format!(
                            "{} ({} number not found)",
                            task.file_name,
                            document_type.label()
                        ));
                        task.advance(FileStatus::Skipped);
                        return Ok(());
                    }
                }
            }
        };

        task.candidate = Some(identifier.clone());
        match resolver.rename(&task.source, document_type, &identifier) {
            Ok(RenameOutcome::Renamed(new_name)) => {
                task.new_name = Some(new_name);
                task.advance(FileStatus::Renamed);
            }
            Ok(RenameOutcome::Collision(existing)) => {
                task.reason = Some(format!("{} (already exists as {})", task.file_name, existing));
                task.advance(FileStatus::Skipped);
            }
            Err(DocrenameError::InvalidIdentifier { identifier, reason }) => {
                task.reason = Some(format!(
                    "{} (invalid {} number {:?}: {})",
                    task.file_name,
                    document_type.label(),
                    identifier,
                    reason
                ));
                task.advance(FileStatus::Skipped);
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    fn recognize_page(&self, page: &DynamicImage, document_type: DocumentType) -> Result<String> {
        let mode = document_type.page_segmentation();
        if self.enhance_scans {
            let enhanced = ImageProcessor::from_dynamic(page.clone()).equalize();
            self.ocr.recognize_text(enhanced.as_dynamic(), mode)
        } else {
            self.ocr.recognize_text(page, mode)
        }
    }

    /// Hand the file to the reviewer and block until they decide. `None`
    /// means no identifier: a blank answer, a timeout or cancellation.
    fn review(
        &mut self,
        task: &mut FileTask,
        document_type: DocumentType,
        page: &DynamicImage,
        observer: &dyn BatchObserver,
    ) -> Result<Option<String>> {
        let preview_png = ImageProcessor::from_dynamic(extract::preview(document_type, page)).to_png_bytes()?;
        let request = ReviewRequest {
            id: ReviewId(0),
            document_type,
            file_name: task.file_name.clone(),
            source_path: task.source.clone(),
            preview_png,
            suggestions: task.suggestions.as_slice().to_vec(),
        };

        task.advance(FileStatus::AwaitingReview);
        let response = self.channel.request(request, |request| {
            observer.on_event(BatchEvent::ReviewRequested(request.clone()));
        });

        match &response {
            ReviewResponse::TimedOut => warn!(file = %task.file_name, "review timed out"),
            ReviewResponse::Canceled => info!(file = %task.file_name, "review abandoned by cancellation"),
            ReviewResponse::Answer(_) => {}
        }
        Ok(response.identifier().map(str::to_string))
    }

    /// If the batch was canceled, mark `task` skipped and return `true`.
    fn interrupted(&self, task: &mut FileTask) -> bool {
        if !self.channel.is_canceled() {
            return false;
        }
        task.reason = Some(format!("{} (canceled)", task.file_name));
        task.advance(FileStatus::Skipped);
        true
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use docrename_core::PageSegMode;
    use image::RgbImage;

    use super::*;

    struct BlankRenderer;

    impl PageRenderer for BlankRenderer {
        fn render_first_page(&self, _pdf_path: &Path) -> Result<DynamicImage> {
            Ok(DynamicImage::ImageRgb8(RgbImage::new(40, 40)))
        }
    }

    struct FixedOcr(&'static str);

    impl TextRecognizer for FixedOcr {
        fn recognize_text(&self, _image: &DynamicImage, _mode: PageSegMode) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn orchestrator(text: &'static str) -> Orchestrator {
        Orchestrator::new(Arc::new(BlankRenderer), Arc::new(FixedOcr(text)), ReviewChannel::new())
    }

    #[test]
    fn runs_only_once() {
        let dir = tempfile::tempdir().unwrap();
        let job = BatchJob::new(dir.path(), Vec::new(), DocumentType::Obr);
        let mut orch = orchestrator("");

        let result = orch.run(&job, &()).unwrap();
        assert_eq!(result.total, 0);
        assert_eq!(orch.state(), BatchState::Completed);
        assert!(matches!(orch.run(&job, &()), Err(DocrenameError::BatchState(_))));
    }

    #[test]
    fn cancel_before_start_leaves_files_pending() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.pdf"), b"x").unwrap();
        let job = BatchJob::new(dir.path(), vec!["a.pdf".into()], DocumentType::Obr);
        let mut orch = orchestrator("MOOE-1");
        orch.review_handle().cancel();

        let result = orch.run(&job, &()).unwrap();
        assert!(result.canceled);
        assert_eq!(result.processed(), 0);
        assert_eq!(orch.state(), BatchState::Canceled);
        assert!(dir.path().join("a.pdf").exists());
    }

    #[test]
    fn enhancement_still_renames() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.pdf"), b"x").unwrap();
        let job = BatchJob::new(dir.path(), vec!["a.pdf".into()], DocumentType::Obr);
        let mut orch = orchestrator("PGF-77").with_enhancement(true);

        let result = orch.run(&job, &()).unwrap();
        assert_eq!(result.renamed, 1);
        assert_eq!(result.summary, vec!["a.pdf ➔ PGF-77.pdf"]);
        assert!(dir.path().join("PGF-77.pdf").exists());
    }

    #[test]
    fn invalid_identifier_is_a_skip() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.pdf"), b"x").unwrap();
        let job = BatchJob::new(dir.path(), vec!["a.pdf".into()], DocumentType::Obr);
        let mut orch = orchestrator("PS../../etc");

        let result = orch.run(&job, &()).unwrap();
        assert_eq!(result.renamed, 0);
        assert_eq!(result.skipped.len(), 1);
        assert!(result.skipped[0].starts_with("a.pdf (invalid OBR number"));
        assert!(dir.path().join("a.pdf").exists());
    }
}
