// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Directory scanning for batch input.

use std::fs;
use std::path::Path;

use docrename_core::error::Result;
use tracing::{debug, instrument, warn};

/// Names of the regular files in `dir` with a `.pdf` extension (any case),
/// sorted so batches run in a stable order.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn list_pdfs(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf || !path.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!(name = ?raw, "skipping file with non-UTF-8 name"),
        }
    }
    names.sort();
    debug!(count = names.len(), "PDF files found");
    Ok(names)
}
