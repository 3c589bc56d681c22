// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs;
use std::path::Path;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogFormat};
use crate::env;
use crate::error::{Error, Result};

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over the configured level. When a log file is configured
/// but cannot be opened, output falls back to stderr.
pub fn setup_logging(config: &Config) -> Result<()> {
    let filter = build_filter(env::rust_log_set(), &config.log_level)?;

    let mut fallback = None;
    let (writer, ansi) = match &config.log_file {
        Some(path) => match open_log_file(path) {
            Ok(file) => (BoxMakeWriter::new(file), false),
            Err(e) => {
                fallback = Some((path.display().to_string(), e));
                (BoxMakeWriter::new(std::io::stderr), true)
            }
        },
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi);
    let installed = match config.log_format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| Error::Logging(e.to_string()))?;

    if let Some((path, e)) = fallback {
        tracing::warn!(path = %path, error = %e, "could not open log file, logging to stderr");
    }
    Ok(())
}

fn build_filter(from_env: bool, level: &str) -> Result<EnvFilter> {
    let filter = if from_env {
        EnvFilter::try_from_default_env().map_err(|e| e.to_string())
    } else {
        EnvFilter::try_new(level).map_err(|e| e.to_string())
    };
    filter.map_err(Error::Logging)
}

fn open_log_file(path: &Path) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
