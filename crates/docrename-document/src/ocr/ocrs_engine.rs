// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pure-Rust OCR using the `ocrs` crate, for machines without tesseract.
//
// # Feature Gate
//
// Only compiled with the `ocr` feature:
//
// ```toml
// docrename-document = { path = "crates/docrename-document", features = ["ocr"] }
// ```
//
// # Model Setup
//
// The engine needs `text-detection.rten` and `text-recognition.rten`. Running
// `ocrs-cli` once downloads them to `$XDG_CACHE_HOME/ocrs` (typically
// `~/.cache/ocrs`), which is where [`OcrsModels::default`] looks.

use std::path::{Path, PathBuf};

use docrename_core::PageSegMode;
use docrename_core::error::DocrenameError;
use image::DynamicImage;
use ocrs::{ImageSource, OcrEngine as RawEngine, OcrEngineParams};
use rten::Model;
use tracing::{debug, info, instrument};

use super::TextRecognizer;

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// `$XDG_CACHE_HOME/ocrs`, falling back to `~/.cache/ocrs`.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Locations of the two model files.
#[derive(Debug, Clone)]
pub struct OcrsModels {
    pub detection_model_path: PathBuf,
    pub recognition_model_path: PathBuf,
}

impl Default for OcrsModels {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrsModels {
    /// Expects the directory to contain both well-known model filenames.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    pub fn validate(&self) -> Result<(), DocrenameError> {
        for path in [&self.detection_model_path, &self.recognition_model_path] {
            if !path.exists() {
                return Err(DocrenameError::ToolNotFound {
                    tool: format!("ocrs model {}", path.display()),
                    hint: "run `ocrs-cli` once to download the models".into(),
                });
            }
        }
        Ok(())
    }
}

/// [`TextRecognizer`] backed by `ocrs`. Load once, reuse for every page.
pub struct OcrsEngine {
    engine: RawEngine,
}

impl OcrsEngine {
    /// Load both models. This is the expensive step.
    ///
    /// `ocrs` and `rten` must be built in release mode; debug builds are
    /// 10-100x slower.
    #[instrument(skip_all, fields(
        detection = %models.detection_model_path.display(),
        recognition = %models.recognition_model_path.display(),
    ))]
    pub fn new(models: OcrsModels) -> Result<Self, DocrenameError> {
        models.validate()?;

        let load = |path: &Path| {
            Model::load_file(path).map_err(|err| {
                DocrenameError::Ocr(format!("failed to load model from {}: {}", path.display(), err))
            })
        };
        let detection_model = load(&models.detection_model_path)?;
        let recognition_model = load(&models.recognition_model_path)?;

        let engine = RawEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| DocrenameError::Ocr(format!("failed to initialise OCR engine: {}", err)))?;

        info!("ocrs engine initialised");
        Ok(Self { engine })
    }
}

impl TextRecognizer for OcrsEngine {
    // ocrs does its own layout analysis; the segmentation hint does not apply.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    fn recognize_text(&self, image: &DynamicImage, _mode: PageSegMode) -> Result<String, DocrenameError> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            DocrenameError::Ocr(format!(
                "failed to create image source ({}x{}): {}",
                width, height, err
            ))
        })?;

        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| DocrenameError::Ocr(format!("OCR preprocessing failed: {}", err)))?;

        let text = self
            .engine
            .get_text(&input)
            .map_err(|err| DocrenameError::Ocr(format!("OCR text recognition failed: {}", err)))?;

        debug!(line_count = text.lines().count(), "OCR recognition complete");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn models_from_dir() {
        let models = OcrsModels::from_dir("/tmp/my-models");
        assert_eq!(
            models.detection_model_path,
            PathBuf::from("/tmp/my-models/text-detection.rten")
        );
        assert_eq!(
            models.recognition_model_path,
            PathBuf::from("/tmp/my-models/text-recognition.rten")
        );
    }

    #[test]
    fn validate_missing_models() {
        let models = OcrsModels::from_dir("/nonexistent/path/ocr-models");
        assert!(matches!(
            models.validate(),
            Err(DocrenameError::ToolNotFound { .. })
        ));
    }
}
