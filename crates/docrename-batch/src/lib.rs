// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docrename-batch — Batch orchestration with a human in the loop.  This crate
// ties the document pipeline in `docrename-document` to the target directory:
// it scans for PDFs, runs each one through extraction, asks a reviewer when
// extraction is inconclusive, and renames without ever overwriting.

pub mod events;
pub mod fallback;
pub mod orchestrator;
pub mod resolver;
pub mod scan;

pub use events::{BatchEvent, BatchObserver};
pub use fallback::{ReviewChannel, ReviewHandle};
pub use orchestrator::Orchestrator;
pub use resolver::{RenameOutcome, RenameResolver, Resolution};
pub use scan::list_pdfs;
