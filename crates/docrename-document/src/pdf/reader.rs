// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open existing PDF documents with `lopdf` to inspect their page
// tree. Used to explain rasteriser failures in terms the operator can act on.

use std::path::Path;

use docrename_core::error::DocrenameError;
use lopdf::Document;
use tracing::{debug, instrument};

/// Reads the structure of an existing PDF file.
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DocrenameError> {
        let path_ref = path.as_ref();

        let document = Document::load(path_ref).map_err(|err| {
            DocrenameError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Whether the document is encrypted (rasterisers refuse these without a
    /// password).
    pub fn is_encrypted(&self) -> bool {
        self.document.is_encrypted()
    }
}

/// Best-effort structural explanation of why a PDF could not be rasterised.
///
/// Returns `None` when the file looks structurally fine, in which case the
/// rasteriser's own message is the best available detail.
pub fn diagnose(path: &Path) -> Option<String> {
    match PdfReader::open(path) {
        Err(err) => Some(err.to_string()),
        Ok(reader) if reader.page_count() == 0 => Some("PDF has no pages".into()),
        Ok(reader) if reader.is_encrypted() => Some("PDF is encrypted".into()),
        Ok(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Object, dictionary};

    /// Build a minimal PDF with `pages` blank A4 pages.
    fn blank_pdf(pages: usize) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let kids: Vec<Object> = (0..pages)
            .map(|_| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                })
                .into()
            })
            .collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("serialise test PDF");
        bytes
    }

    #[test]
    fn counts_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("three.pdf");
        std::fs::write(&path, blank_pdf(3)).unwrap();
        let reader = PdfReader::open(&path).expect("load");
        assert_eq!(reader.page_count(), 3);
        assert!(!reader.is_encrypted());
    }

    #[test]
    fn diagnose_accepts_well_formed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.pdf");
        std::fs::write(&path, blank_pdf(1)).unwrap();
        assert_eq!(diagnose(&path), None);
    }

    #[test]
    fn diagnose_reports_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();
        let detail = diagnose(&path).expect("should explain failure");
        assert!(detail.contains("broken.pdf"));
    }

    #[test]
    fn diagnose_reports_empty_page_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pdf");
        std::fs::write(&path, blank_pdf(0)).unwrap();
        assert_eq!(diagnose(&path).as_deref(), Some("PDF has no pages"));
    }
}
