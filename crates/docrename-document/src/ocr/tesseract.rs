// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tesseract OCR via its command-line interface.
//
// Each call writes the image to a scratch PNG and reads the recognised text
// from stdout. `TESSDATA_PREFIX` is set on the child process only.

use std::path::PathBuf;
use std::process::Command;

use docrename_core::error::DocrenameError;
use docrename_core::{PageSegMode, ToolConfig};
use image::DynamicImage;
use tempfile::TempDir;
use tracing::{debug, instrument, warn};

use super::TextRecognizer;

const INSTALL_HINT: &str =
    "install tesseract-ocr (apt install tesseract-ocr) or set its path with `docrename config set-tesseract`";

/// [`TextRecognizer`] backed by the `tesseract` executable.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    command: PathBuf,
    tessdata: Option<PathBuf>,
    language: String,
}

impl TesseractOcr {
    pub fn new(config: &ToolConfig) -> Self {
        Self {
            command: config.tesseract_command(),
            tessdata: config.tessdata_prefix(),
            language: config.language.clone(),
        }
    }

    /// Check that tesseract can be launched and answers `--version`.
    pub fn probe(&self) -> Result<String, DocrenameError> {
        let output = self
            .base_command()
            .arg("--version")
            .output()
            .map_err(|err| self.launch_error(err))?;
        if !output.status.success() {
            return Err(DocrenameError::Ocr(format!(
                "tesseract --version failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        // Older releases print the banner on stderr.
        let banner = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };
        Ok(String::from_utf8_lossy(&banner)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string())
    }

    fn base_command(&self) -> Command {
        let mut cmd = Command::new(&self.command);
        if let Some(ref tessdata) = self.tessdata {
            cmd.env("TESSDATA_PREFIX", tessdata);
        }
        cmd
    }

    fn launch_error(&self, err: std::io::Error) -> DocrenameError {
        if err.kind() == std::io::ErrorKind::NotFound {
            DocrenameError::ToolNotFound {
                tool: format!("tesseract ({})", self.command.display()),
                hint: INSTALL_HINT.into(),
            }
        } else {
            DocrenameError::Ocr(format!("failed to launch {}: {}", self.command.display(), err))
        }
    }
}

impl TextRecognizer for TesseractOcr {
    #[instrument(skip_all, fields(width = image.width(), height = image.height(), psm = mode.tesseract_value()))]
    fn recognize_text(&self, image: &DynamicImage, mode: PageSegMode) -> Result<String, DocrenameError> {
        let scratch = TempDir::new()?;
        let input = scratch.path().join("input.png");
        image.save(&input).map_err(|err| {
            DocrenameError::ImageError(format!("failed to write OCR input image: {}", err))
        })?;

        let output = self
            .base_command()
            .arg(&input)
            .arg("stdout")
            .args(["-l", &self.language])
            .args(["--psm", &mode.tesseract_value().to_string()])
            .output()
            .map_err(|err| self.launch_error(err))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, "tesseract failed");
            return Err(DocrenameError::Ocr(format!("tesseract failed: {}", stderr.trim())));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(line_count = text.lines().count(), "OCR recognition complete");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;

    #[test]
    fn missing_binary_is_tool_not_found() {
        let config = ToolConfig {
            tesseract_path: Some("/nonexistent/bin/tesseract".into()),
            ..Default::default()
        };
        let ocr = TesseractOcr::new(&config);
        assert!(matches!(ocr.probe(), Err(DocrenameError::ToolNotFound { .. })));

        let img = DynamicImage::ImageLuma8(GrayImage::new(4, 4));
        assert!(matches!(
            ocr.recognize_text(&img, PageSegMode::Auto),
            Err(DocrenameError::ToolNotFound { .. })
        ));
    }

    #[test]
    fn language_comes_from_config() {
        let config = ToolConfig {
            language: "eng+fil".into(),
            ..Default::default()
        };
        assert_eq!(TesseractOcr::new(&config).language, "eng+fil");
    }
}
