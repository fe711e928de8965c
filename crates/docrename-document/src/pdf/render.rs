// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// First-page rasterisation via poppler's `pdftoppm`.
//
// The renderer is a thin, fallible wrapper around an external process. Its
// location comes from `ToolConfig`, never from the process environment.

use std::path::{Path, PathBuf};
use std::process::Command;

use docrename_core::ToolConfig;
use docrename_core::error::DocrenameError;
use image::DynamicImage;
use tempfile::TempDir;
use tracing::{debug, instrument, warn};

use super::reader;
use crate::image::ImageProcessor;

const INSTALL_HINT: &str =
    "install poppler-utils (apt install poppler-utils) or set its bin directory with `docrename config set-poppler`";

/// Converts page 1 of a PDF into a raster image.
pub trait PageRenderer: Send + Sync {
    fn render_first_page(&self, pdf_path: &Path) -> Result<DynamicImage, DocrenameError>;
}

/// [`PageRenderer`] backed by the `pdftoppm` command-line tool.
#[derive(Debug, Clone)]
pub struct PdftoppmRenderer {
    command: PathBuf,
    dpi: u32,
}

impl PdftoppmRenderer {
    pub fn new(config: &ToolConfig) -> Self {
        Self {
            command: config.pdftoppm_command(),
            dpi: config.render_dpi,
        }
    }

    /// Check that `pdftoppm` can be launched at all.
    pub fn probe(&self) -> Result<(), DocrenameError> {
        // pdftoppm -v prints its version to stderr and exits 0 or 99 depending
        // on the poppler release, so only a launch failure counts.
        Command::new(&self.command)
            .arg("-v")
            .output()
            .map(|_| ())
            .map_err(|err| self.launch_error(err))
    }

    fn launch_error(&self, err: std::io::Error) -> DocrenameError {
        if err.kind() == std::io::ErrorKind::NotFound {
            DocrenameError::ToolNotFound {
                tool: format!("pdftoppm ({})", self.command.display()),
                hint: INSTALL_HINT.into(),
            }
        } else {
            DocrenameError::Render(format!("failed to launch {}: {}", self.command.display(), err))
        }
    }
}

impl PageRenderer for PdftoppmRenderer {
    #[instrument(skip(self), fields(dpi = self.dpi))]
    fn render_first_page(&self, pdf_path: &Path) -> Result<DynamicImage, DocrenameError> {
        let scratch = TempDir::new()?;
        let prefix = scratch.path().join("page");

        let output = Command::new(&self.command)
            .args(["-f", "1", "-l", "1", "-singlefile", "-png"])
            .args(["-r", &self.dpi.to_string()])
            .arg(pdf_path)
            .arg(&prefix)
            .output()
            .map_err(|err| self.launch_error(err))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = reader::diagnose(pdf_path).unwrap_or_else(|| stderr.trim().to_string());
            warn!(status = %output.status, %detail, "pdftoppm failed");
            return Err(DocrenameError::Render(detail));
        }

        let png = prefix.with_extension("png");
        let image = ImageProcessor::open(&png)
            .map_err(|err| DocrenameError::Render(format!("pdftoppm produced no readable page image: {}", err)))?
            .into_dynamic();
        debug!(width = image.width(), height = image.height(), "page rendered");
        Ok(image)
    }
}
