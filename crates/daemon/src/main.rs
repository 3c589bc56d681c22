// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! sitelined - the SiteLine issue and RFI daemon.
//!
//! Usage:
//!   sitelined [--config <path>] [--bind <addr>] [--db <path>]

use std::process::ExitCode;

use clap::Parser;
use sitelined::logging::setup_logging;
use sitelined::{serve, Args, Config};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match Config::resolve(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("sitelined: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = setup_logging(&config) {
        eprintln!("sitelined: {e}");
        return ExitCode::FAILURE;
    }

    tracing::info!(state_dir = %config.state_dir().display(), "sitelined starting");

    if let Err(e) = serve(config).await {
        tracing::error!(error = %e, "sitelined failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
