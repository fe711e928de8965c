// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docrename — Batch renamer for scanned OBR, NCA and SARO documents
//
// Entry point. Initialises logging, loads the tool configuration and
// dispatches to the requested command.

mod cli;
mod config_cmd;
mod data_dir;
mod report;
mod reviewer;
mod run;

use std::process::ExitCode;

use clap::Parser;
use docrename_core::ToolConfig;
use docrename_core::error::Result;
use docrename_core::human_errors::humanize_error;

use cli::{Cli, Commands, ConfigCommands};
use run::RunOptions;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("docrename starting");

    match dispatch(cli).await {
        Ok(code) => code,
        Err(err) => {
            let human = humanize_error(&err);
            tracing::debug!(error = %err, "command failed");
            eprintln!("error: {}", human.message);
            eprintln!("  {}", human.suggestion);
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli) -> Result<ExitCode> {
    let config_path = data_dir::config_path(cli.config);

    match cli.command {
        Commands::Run {
            dir,
            document_type,
            enhance,
            review_timeout,
            engine,
        } => {
            let config = ToolConfig::load(&config_path)?;
            let options = RunOptions {
                dir,
                document_type,
                enhance,
                review_timeout,
                engine,
            };
            run::cmd_run(options, config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Doctor => config_cmd::cmd_doctor(&config_path),
        Commands::Config { command } => {
            match command {
                ConfigCommands::Show => config_cmd::cmd_show(&config_path)?,
                ConfigCommands::SetTesseract { path } => config_cmd::cmd_set_tesseract(&config_path, path)?,
                ConfigCommands::SetPoppler { path } => config_cmd::cmd_set_poppler(&config_path, path)?,
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
