// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use docrename_core::DocumentType;

#[derive(Parser)]
#[command(name = "docrename")]
#[command(about = "Rename scanned OBR, NCA and SARO PDFs after the number printed on page 1")]
#[command(version)]
pub struct Cli {
    /// Config file path (defaults to docrename.json in the user data directory)
    #[arg(short, long, global = true, env = "DOCRENAME_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// OCR backend for the full-page and focused passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Engine {
    /// tesseract command-line tool
    #[default]
    Tesseract,
    /// Pure-Rust ocrs models (requires the `ocr` feature)
    #[cfg(feature = "ocr")]
    Ocrs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rename every PDF in a directory
    Run {
        /// Directory holding the scanned PDFs
        dir: PathBuf,
        /// Document type of every file in the directory: obr, nca or saro
        #[arg(short = 't', long = "type")]
        document_type: DocumentType,
        /// Equalise contrast before OCR (overrides the config file)
        #[arg(long)]
        enhance: bool,
        /// Give up on an unanswered review after this many seconds
        #[arg(long)]
        review_timeout: Option<u64>,
        /// OCR engine
        #[arg(long, value_enum, default_value_t = Engine::Tesseract)]
        engine: Engine,
    },

    /// Check that tesseract and pdftoppm can be launched
    Doctor,

    /// Show or change tool settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the current settings
    Show,
    /// Set the tesseract executable
    SetTesseract {
        /// Path to tesseract (tesseract.exe on Windows)
        path: PathBuf,
    },
    /// Set the poppler bin directory (the one containing pdftoppm)
    SetPoppler {
        /// Directory, or the pdftoppm executable itself
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run() {
        let cli = Cli::try_parse_from(["docrename", "run", "/scans", "--type", "SARO", "-v"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Run {
                dir,
                document_type,
                enhance,
                review_timeout,
                engine,
            } => {
                assert_eq!(dir, PathBuf::from("/scans"));
                assert_eq!(document_type, DocumentType::Saro);
                assert!(!enhance);
                assert_eq!(review_timeout, None);
                assert_eq!(engine, Engine::Tesseract);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn rejects_unknown_type() {
        assert!(Cli::try_parse_from(["docrename", "run", "/scans", "-t", "invoice"]).is_err());
    }

    #[test]
    fn parses_config_subcommands() {
        let cli = Cli::try_parse_from([
            "docrename",
            "--config",
            "/tmp/d.json",
            "config",
            "set-poppler",
            "/opt/poppler/bin",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/d.json")));
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::SetPoppler { .. }
            }
        ));
    }
}
