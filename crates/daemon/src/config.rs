// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration.
//!
//! Values are layered: built-in defaults, then the optional TOML file, then
//! environment variables and command-line flags (both carried by [`Args`]).

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sl_core::TransitionPolicy;

use crate::cli::Args;
use crate::env;
use crate::error::{Error, Result};

const STATE_DIR_NAME: &str = "siteline";
const DB_FILE_NAME: &str = "siteline.db";
const DEFAULT_BIND: &str = "127.0.0.1:5080";
const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:5173"];

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind: String,
    /// Database file. Defaults to `siteline.db` inside the state directory.
    pub database: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
    pub log_level: String,
    pub log_format: LogFormat,
    pub log_file: Option<PathBuf>,
    pub transition_policy: TransitionPolicy,
    pub cors_origins: Vec<String>,
    pub api_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind: DEFAULT_BIND.to_string(),
            database: None,
            state_dir: None,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            log_file: None,
            transition_policy: TransitionPolicy::Permissive,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            api_token: None,
        }
    }
}

impl Config {
    /// Reads a config file. Keys absent from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds the effective configuration for a daemon run.
    pub fn resolve(args: &Args) -> Result<Config> {
        let mut config = match &args.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        config.apply_args(args);
        Ok(config)
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(bind) = &args.bind {
            self.bind = bind.clone();
        }
        if let Some(database) = &args.database {
            self.database = Some(database.clone());
        }
        if let Some(dir) = args.state_dir.clone().or_else(env::state_dir) {
            self.state_dir = Some(dir);
        }
        if let Some(token) = &args.api_token {
            self.api_token = Some(token.clone());
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
        if let Some(format) = args.log_format {
            self.log_format = format;
        }
        if let Some(file) = &args.log_file {
            self.log_file = Some(file.clone());
        }
        if let Some(policy) = args.policy {
            self.transition_policy = policy;
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .map_err(|_| Error::InvalidBind(self.bind.clone()))
    }

    pub fn state_dir(&self) -> PathBuf {
        match &self.state_dir {
            Some(dir) => dir.clone(),
            None => default_state_dir(env::xdg_state_home(), dirs::home_dir()),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        match &self.database {
            Some(path) => path.clone(),
            None => self.state_dir().join(DB_FILE_NAME),
        }
    }

    /// The configured token, with a blank value meaning "no guard".
    pub fn api_token(&self) -> Option<&str> {
        self.api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// `$XDG_STATE_HOME/siteline`, else `~/.local/state/siteline`.
pub fn default_state_dir(xdg_state_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = xdg_state_home {
        return dir.join(STATE_DIR_NAME);
    }
    home.map(|h| h.join(".local/state").join(STATE_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".local/state").join(STATE_DIR_NAME))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
