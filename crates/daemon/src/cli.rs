// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::Parser;
use sl_core::TransitionPolicy;

use crate::config::LogFormat;
use crate::env::names;

/// Command-line flags. Each one overrides the matching config file key.
#[derive(Debug, Default, Parser)]
#[command(name = "sitelined")]
#[command(version, about = "SiteLine issue and RFI tracking service")]
pub struct Args {
    /// Path to a TOML config file
    #[arg(long, env = names::SITELINE_CONFIG)]
    pub config: Option<PathBuf>,

    /// Socket address to listen on (e.g. 127.0.0.1:5080)
    #[arg(long, env = names::SITELINE_BIND)]
    pub bind: Option<String>,

    /// SQLite database file
    #[arg(long = "db", env = names::SITELINE_DB)]
    pub database: Option<PathBuf>,

    /// Directory holding the default database and log file
    #[arg(long)]
    pub state_dir: Option<PathBuf>,

    /// Require `Authorization: Bearer <token>` on every route except /health
    #[arg(long, env = names::SITELINE_API_TOKEN, hide_env_values = true)]
    pub api_token: Option<String>,

    /// Log level used when RUST_LOG is unset
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Status transition policy (permissive or strict)
    #[arg(long)]
    pub policy: Option<TransitionPolicy>,
}
