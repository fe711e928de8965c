// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tool configuration: where to find tesseract and poppler, and how the
// pipeline should drive them. Passed explicitly to the adapters; nothing here
// touches the process environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{DocrenameError, Result};

/// Filename used for the persisted configuration.
pub const CONFIG_FILE: &str = "docrename.json";

/// Persistent tool settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Path to the `tesseract` executable. `None` resolves it from `PATH`.
    pub tesseract_path: Option<PathBuf>,
    /// Directory holding `*.traineddata`. Handed to the tesseract child process
    /// as `TESSDATA_PREFIX`.
    pub tessdata_dir: Option<PathBuf>,
    /// Directory containing poppler's `pdftoppm`. `None` resolves from `PATH`.
    pub poppler_path: Option<PathBuf>,
    /// Tesseract language code.
    pub language: String,
    /// Rasterisation resolution for page 1.
    pub render_dpi: u32,
    /// Grayscale + histogram equalisation before the full-page OCR pass.
    pub enhance_scans: bool,
    /// Upper bound on a single human review. `None` waits until answered or
    /// canceled.
    pub review_timeout_secs: Option<u64>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            tesseract_path: None,
            tessdata_dir: None,
            poppler_path: None,
            language: "eng".into(),
            render_dpi: 200,
            enhance_scans: false,
            review_timeout_secs: None,
        }
    }
}

impl ToolConfig {
    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data).map_err(|err| {
            DocrenameError::Config(format!("failed to parse {}: {}", path.display(), err))
        })?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Write as pretty JSON, creating the parent directory if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Verify that every explicitly configured path exists.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref tesseract) = self.tesseract_path {
            if !tesseract.exists() {
                return Err(DocrenameError::Config(format!(
                    "tesseract path does not exist: {}",
                    tesseract.display()
                )));
            }
        }
        if let Some(ref tessdata) = self.tessdata_dir {
            if !tessdata.is_dir() {
                return Err(DocrenameError::Config(format!(
                    "tessdata directory does not exist: {}",
                    tessdata.display()
                )));
            }
        }
        if let Some(ref poppler) = self.poppler_path {
            if !poppler.is_dir() {
                return Err(DocrenameError::Config(format!(
                    "poppler path does not exist: {}",
                    poppler.display()
                )));
            }
        }
        if self.render_dpi == 0 {
            return Err(DocrenameError::Config("render_dpi must be positive".into()));
        }
        if self.language.trim().is_empty() {
            return Err(DocrenameError::Config("language must not be empty".into()));
        }
        Ok(())
    }

    /// Executable to invoke for OCR.
    pub fn tesseract_command(&self) -> PathBuf {
        self.tesseract_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("tesseract"))
    }

    /// `TESSDATA_PREFIX` for the tesseract child process.
    ///
    /// An explicit `tessdata_dir` wins; otherwise a `tessdata` directory next to
    /// a configured tesseract binary is used when present.
    pub fn tessdata_prefix(&self) -> Option<PathBuf> {
        if let Some(ref dir) = self.tessdata_dir {
            return Some(dir.clone());
        }
        let sibling = self.tesseract_path.as_ref()?.parent()?.join("tessdata");
        sibling.is_dir().then_some(sibling)
    }

    /// Executable to invoke for rasterising PDF pages.
    pub fn pdftoppm_command(&self) -> PathBuf {
        match self.poppler_path {
            Some(ref dir) => dir.join(if cfg!(windows) { "pdftoppm.exe" } else { "pdftoppm" }),
            None => PathBuf::from("pdftoppm"),
        }
    }

    pub fn review_timeout(&self) -> Option<Duration> {
        self.review_timeout_secs.map(Duration::from_secs)
    }
}
