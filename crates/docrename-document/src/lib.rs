// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docrename-document — Everything that happens to a single document before it
// is renamed.
//
// Provides first-page rasterisation (poppler's pdftoppm, with lopdf for
// diagnostics), image crops and contrast clean-up, OCR adapters (tesseract CLI,
// optionally pure-Rust ocrs) and the per-document-type identifier rules.

pub mod extract;
pub mod image;
pub mod ocr;
pub mod pdf;

// Re-export the primary items so callers can use `docrename_document::TesseractOcr` etc.
pub use extract::Extraction;
pub use image::processor::ImageProcessor;
pub use ocr::{TesseractOcr, TextRecognizer};
pub use pdf::reader::PdfReader;
pub use pdf::render::{PageRenderer, PdftoppmRenderer};

#[cfg(feature = "ocr")]
pub use ocr::ocrs_engine::{OcrsEngine, OcrsModels};
