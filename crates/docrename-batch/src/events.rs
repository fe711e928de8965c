// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Events the orchestrator reports while a batch runs.

use docrename_core::{BatchId, BatchResult, FileStatus, ReviewRequest};
use tracing::debug;

#[derive(Debug, Clone)]
pub enum BatchEvent {
    Started {
        batch_id: BatchId,
        total: usize,
    },
    /// A file is about to be processed. `label` is ready for display.
    Progress {
        index: usize,
        total: usize,
        label: String,
    },
    /// A file needs a human decision; answer it through a `ReviewHandle`.
    ReviewRequested(ReviewRequest),
    /// A file reached a terminal status. `detail` is the new filename for a
    /// rename, otherwise the skip or error line.
    FileFinished {
        index: usize,
        file_name: String,
        status: FileStatus,
        detail: Option<String>,
    },
    /// Sent exactly once, last.
    Finished(BatchResult),
}

/// Receives batch events on the orchestrator's thread. Implementations must
/// not block for long; the batch waits for them.
pub trait BatchObserver {
    fn on_event(&self, event: BatchEvent);
}

/// Forward into an async task (the CLI's event loop).
impl BatchObserver for tokio::sync::mpsc::UnboundedSender<BatchEvent> {
    fn on_event(&self, event: BatchEvent) {
        if self.send(event).is_err() {
            debug!("batch event receiver dropped");
        }
    }
}

/// Forward to another plain thread.
impl BatchObserver for std::sync::mpsc::Sender<BatchEvent> {
    fn on_event(&self, event: BatchEvent) {
        if self.send(event).is_err() {
            debug!("batch event receiver dropped");
        }
    }
}

/// Discard everything.
impl BatchObserver for () {
    fn on_event(&self, _event: BatchEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unbounded_sender_forwards() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        tx.on_event(BatchEvent::Progress {
            index: 0,
            total: 1,
            label: "Processing a.pdf (1/1)".into(),
        });
        match rx.recv().await {
            Some(BatchEvent::Progress { label, .. }) => assert_eq!(label, "Processing a.pdf (1/1)"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn dropped_receiver_is_not_an_error() {
        let (tx, rx) = std::sync::mpsc::channel();
        drop(rx);
        tx.on_event(BatchEvent::Started {
            batch_id: BatchId::new(),
            total: 0,
        });
    }
}
