// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `docrename config` and `docrename doctor` — inspect and change where the
// external tools live.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use docrename_core::ToolConfig;
use docrename_core::error::{DocrenameError, Result};
use docrename_core::human_errors::humanize_error;
use docrename_document::{PdftoppmRenderer, TesseractOcr};
use tracing::info;

pub fn cmd_show(config_path: &Path) -> Result<()> {
    let config = ToolConfig::load(config_path)?;
    println!("# {}", config_path.display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

pub fn cmd_set_tesseract(config_path: &Path, path: PathBuf) -> Result<()> {
    if !path.is_file() {
        return Err(DocrenameError::Config(format!(
            "{} is not a file",
            path.display()
        )));
    }
    let mut config = ToolConfig::load(config_path)?;
    config.tesseract_path = Some(path);
    config.save(config_path)?;
    info!("tesseract path updated");
    println!("tesseract set. Run `docrename doctor` to check it.");
    Ok(())
}

pub fn cmd_set_poppler(config_path: &Path, path: PathBuf) -> Result<()> {
    let dir = poppler_dir(path)?;
    let mut config = ToolConfig::load(config_path)?;
    config.poppler_path = Some(dir);
    config.save(config_path)?;
    info!("poppler path updated");
    println!("poppler set. Run `docrename doctor` to check it.");
    Ok(())
}

/// Accept either the bin directory or the pdftoppm executable inside it.
fn poppler_dir(path: PathBuf) -> Result<PathBuf> {
    let dir = if path.is_file() {
        path.parent().map(Path::to_path_buf).unwrap_or_default()
    } else {
        path
    };
    let probe = ToolConfig {
        poppler_path: Some(dir.clone()),
        ..Default::default()
    };
    if !probe.pdftoppm_command().is_file() {
        return Err(DocrenameError::Config(format!(
            "no pdftoppm in {}",
            dir.display()
        )));
    }
    Ok(dir)
}

/// Launch both tools once and report what happened.
pub fn cmd_doctor(config_path: &Path) -> Result<ExitCode> {
    let config = ToolConfig::load(config_path)?;
    println!("config: {}", config_path.display());

    let mut healthy = report_check("configuration", config.validate().map(|_| "ok".to_string()));
    healthy &= report_check("tesseract", TesseractOcr::new(&config).probe());
    healthy &= report_check(
        "pdftoppm",
        PdftoppmRenderer::new(&config)
            .probe()
            .map(|_| config.pdftoppm_command().display().to_string()),
    );

    Ok(if healthy {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn report_check(name: &str, outcome: Result<String>) -> bool {
    match outcome {
        Ok(detail) => {
            println!("  ok    {name}: {detail}");
            true
        }
        Err(err) => {
            let human = humanize_error(&err);
            println!("  FAIL  {name}: {}", human.message);
            println!("        {}", human.suggestion);
            false
        }
    }
}
