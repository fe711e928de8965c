// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Identifier extraction — per-document-type pattern rules over OCR text.
//
// Each document family has a fixed layout, so each rule set leans on a
// positional or contextual anchor (the "2067" line on NCA forms, the
// bottom-right corner on SARO) rather than a naive full-text search. A
// confident match always bypasses human review.

pub mod nca;
pub mod obr;
pub mod saro;

use docrename_core::error::DocrenameError;
use docrename_core::{DocumentType, SuggestionList};
use image::DynamicImage;
use tracing::debug;

use crate::image::ImageProcessor;
use crate::ocr::TextRecognizer;

/// Outcome of running a rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The primary pattern matched; rename without review.
    Confident(String),
    /// Nothing matched; a human decides, helped by up to three suggestions.
    Inconclusive(SuggestionList),
}

impl Extraction {
    pub fn is_confident(&self) -> bool {
        matches!(self, Self::Confident(_))
    }
}

/// Run the rule set for `document_type`.
///
/// `ocr_text` is the full-page OCR output. `page` is the rendered first page;
/// the SARO rules run a second, focused OCR pass over part of it through
/// `ocr`, which is why this call is fallible.
pub fn extract(
    document_type: DocumentType,
    ocr_text: &str,
    page: &DynamicImage,
    ocr: &dyn TextRecognizer,
) -> Result<Extraction, DocrenameError> {
    let extraction = match document_type {
        DocumentType::Obr => obr::extract(ocr_text),
        DocumentType::Nca => nca::extract(ocr_text),
        DocumentType::Saro => {
            let focused = saro::focused_text(page, ocr)?;
            saro::extract(&focused, ocr_text)
        }
    };
    debug!(
        document_type = %document_type,
        confident = extraction.is_confident(),
        "extraction finished"
    );
    Ok(extraction)
}

/// The part of `page` shown to the reviewer for this document type.
pub fn preview(document_type: DocumentType, page: &DynamicImage) -> DynamicImage {
    ImageProcessor::from_dynamic(page.clone())
        .crop_region(document_type.preview_region())
        .into_dynamic()
}
