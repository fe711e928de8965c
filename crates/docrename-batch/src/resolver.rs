// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rename resolver — turns an accepted identifier into `<identifier>.pdf` in
// the batch directory and renames the source file there, unless that name is
// already taken.
//
// An existing file is never overwritten. The existence check and the rename
// happen back to back for one file at a time; nothing else is assumed to
// write into the directory while a batch runs.

use std::fs;
use std::path::{Path, PathBuf};

use docrename_core::DocumentType;
use docrename_core::error::{DocrenameError, Result};
use tracing::{debug, info, instrument};

/// Where an identifier would land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The target name is free.
    Commit(PathBuf),
    /// A file with this name already exists.
    Collision(String),
}

/// What [`RenameResolver::rename`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// Renamed; carries the new filename.
    Renamed(String),
    /// Left untouched; carries the filename that was already taken.
    Collision(String),
}

#[derive(Debug, Clone)]
pub struct RenameResolver {
    target_dir: PathBuf,
}

impl RenameResolver {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
        }
    }

    /// Decide where `identifier` would go without touching the filesystem
    /// beyond an existence check.
    pub fn resolve(&self, document_type: DocumentType, identifier: &str) -> Result<Resolution> {
        let stem = document_type.normalize_identifier(identifier);
        check_stem(&stem)?;

        let file_name = format!("{stem}.pdf");
        let target = self.target_dir.join(&file_name);
        if target.try_exists()? {
            debug!(%file_name, "target name already taken");
            Ok(Resolution::Collision(file_name))
        } else {
            Ok(Resolution::Commit(target))
        }
    }

    /// Resolve and, if the name is free, rename `source` in place.
    #[instrument(skip(self, source), fields(source = %source.display()))]
    pub fn rename(&self, source: &Path, document_type: DocumentType, identifier: &str) -> Result<RenameOutcome> {
        match self.resolve(document_type, identifier)? {
            Resolution::Collision(existing) => Ok(RenameOutcome::Collision(existing)),
            Resolution::Commit(target) => {
                fs::rename(source, &target)?;
                let new_name = target
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                info!(%new_name, "file renamed");
                Ok(RenameOutcome::Renamed(new_name))
            }
        }
    }
}

/// Reject stems that could escape the target directory or produce an
/// unusable filename.
fn check_stem(stem: &str) -> Result<()> {
    let reason = if stem.is_empty() {
        Some("identifier is empty")
    } else if stem.contains(['/', '\\']) {
        Some("identifier contains a path separator")
    } else if stem.contains("..") {
        Some("identifier contains `..`")
    } else if stem.chars().any(char::is_control) {
        Some("identifier contains a control character")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(DocrenameError::InvalidIdentifier {
            identifier: stem.to_string(),
            reason: reason.into(),
        }),
        None => Ok(()),
    }
}
