// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `docrename run` — one batch over one directory.
//
// The orchestrator runs on a blocking worker. This task owns the terminal: it
// prints progress, relays review prompts and typed answers, and turns Ctrl-C
// into a cancellation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use docrename_batch::{BatchEvent, Orchestrator, ReviewChannel, ReviewHandle, list_pdfs};
use docrename_core::error::{DocrenameError, Result};
use docrename_core::{BatchJob, DocumentType, ReviewRequest, ToolConfig};
use docrename_document::{PdftoppmRenderer, TesseractOcr, TextRecognizer};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::Engine;
use crate::report;
use crate::reviewer::{self, TerminalReviewer};

pub struct RunOptions {
    pub dir: PathBuf,
    pub document_type: DocumentType,
    pub enhance: bool,
    pub review_timeout: Option<u64>,
    pub engine: Engine,
}

fn build_recognizer(engine: Engine, config: &ToolConfig) -> Result<Arc<dyn TextRecognizer>> {
    match engine {
        Engine::Tesseract => {
            let tesseract = TesseractOcr::new(config);
            let version = tesseract.probe()?;
            info!(%version, "using tesseract");
            Ok(Arc::new(tesseract))
        }
        #[cfg(feature = "ocr")]
        Engine::Ocrs => {
            let ocrs = docrename_document::OcrsEngine::new(docrename_document::OcrsModels::default())?;
            Ok(Arc::new(ocrs))
        }
    }
}

/// Answer `request` with no identifier.
fn skip_review(handle: &ReviewHandle, request: &ReviewRequest) {
    if let Err(err) = handle.respond(request.id, "") {
        warn!(error = %err, file = %request.file_name, "skip not delivered");
    }
}

pub async fn cmd_run(options: RunOptions, config: ToolConfig) -> Result<()> {
    config.validate()?;
    let renderer = PdftoppmRenderer::new(&config);
    renderer.probe()?;
    let ocr = build_recognizer(options.engine, &config)?;

    let files = list_pdfs(&options.dir)?;
    if files.is_empty() {
        println!("No PDF files found in {}", options.dir.display());
        return Ok(());
    }

    let timeout = options
        .review_timeout
        .map(Duration::from_secs)
        .or_else(|| config.review_timeout());
    let job = BatchJob::new(&options.dir, files, options.document_type);
    let mut orchestrator = Orchestrator::new(Arc::new(renderer), ocr, ReviewChannel::with_timeout(timeout))
        .with_enhancement(options.enhance || config.enhance_scans);
    let handle = orchestrator.review_handle();

    let (tx, mut events) = mpsc::unbounded_channel();
    let worker = tokio::task::spawn_blocking(move || orchestrator.run(&job, &tx));

    let reviewer = TerminalReviewer::new()?;
    let mut answers = reviewer::spawn_stdin_reader();
    let mut pending: Option<ReviewRequest> = None;
    let mut stdin_open = true;
    let mut cancel_sent = false;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(BatchEvent::Started { total, .. }) => {
                    info!(total, dir = %options.dir.display(), "renaming");
                }
                Some(BatchEvent::Progress { label, .. }) => println!("{label}"),
                Some(BatchEvent::ReviewRequested(request)) => {
                    eprint!("{}", reviewer.present(&request));
                    if !stdin_open {
                        // Nobody can answer; treat as "no identifier".
                        skip_review(&handle, &request);
                    } else {
                        pending = Some(request);
                    }
                }
                Some(BatchEvent::FileFinished { file_name, status, detail, .. }) => {
                    debug!(file = %file_name, ?status, ?detail, "file finished");
                    pending = None;
                }
                Some(BatchEvent::Finished(result)) => {
                    debug!(renamed = result.renamed, canceled = result.canceled, "batch result received");
                }
                None => break,
            },

            line = answers.recv(), if stdin_open => match line {
                Some(line) => {
                    if let Some(request) = pending.take() {
                        let answer = reviewer::interpret(&request, &line);
                        if let Err(err) = handle.respond(request.id, answer) {
                            warn!(error = %err, "answer not delivered");
                        }
                    }
                }
                None => {
                    stdin_open = false;
                    if let Some(request) = pending.take() {
                        skip_review(&handle, &request);
                    }
                }
            },

            _ = tokio::signal::ctrl_c(), if !cancel_sent => {
                eprintln!("\nCanceling: the current step finishes, no further files start.");
                handle.cancel();
                cancel_sent = true;
            }
        }
    }

    let result = worker
        .await
        .map_err(|err| DocrenameError::BatchState(format!("batch worker stopped: {err}")))??;
    print!("{}", report::render(&result));
    Ok(())
}

#[cfg(test)]
mod tests {
    use docrename_core::{ReviewId, ReviewResponse};

    use super::*;

    fn request() -> ReviewRequest {
        ReviewRequest {
            id: ReviewId(0),
            document_type: DocumentType::Obr,
            file_name: "scan.pdf".into(),
            source_path: PathBuf::from("/scans/scan.pdf"),
            preview_png: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    #[test]
    fn skip_review_answers_blank_once() {
        let mut channel = ReviewChannel::new();
        let handle = channel.handle();
        let (tx, rx) = std::sync::mpsc::channel();
        let worker = std::thread::spawn(move || {
            channel.request(request(), |published| tx.send(published.clone()).unwrap())
        });

        let published = rx.recv().unwrap();
        skip_review(&handle, &published);
        let response = worker.join().unwrap();
        assert!(matches!(&response, ReviewResponse::Answer(value) if value.is_empty()));

        // Already answered: the rejection is logged, not raised.
        skip_review(&handle, &published);
        assert!(handle.outstanding().is_none());
    }
}
