// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Optical character recognition adapters.
//
// The pipeline only depends on the `TextRecognizer` trait. Tesseract (via its
// CLI) is always available; the pure-Rust `ocrs` engine is behind the `ocr`
// feature.

pub mod tesseract;

#[cfg(feature = "ocr")]
pub mod ocrs_engine;

use docrename_core::PageSegMode;
use docrename_core::error::DocrenameError;
use image::DynamicImage;

pub use tesseract::TesseractOcr;

#[cfg(feature = "ocr")]
pub use ocrs_engine::OcrsEngine;

/// Converts an image to text.
pub trait TextRecognizer: Send + Sync {
    /// Recognise all text in `image`. `mode` is a layout hint; engines without
    /// page segmentation modes ignore it.
    fn recognize_text(&self, image: &DynamicImage, mode: PageSegMode) -> Result<String, DocrenameError>;
}
