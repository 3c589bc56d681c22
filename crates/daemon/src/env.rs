// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! Variable name constants are generated by `build.rs` and live in the
//! [`names`] submodule. `SITELINE_CONFIG`, `SITELINE_BIND`, `SITELINE_DB`
//! and `SITELINE_API_TOKEN` are read by clap through [`crate::cli::Args`].

use std::path::PathBuf;

/// Generated environment variable name constants.
pub mod names {
    include!(concat!(env!("OUT_DIR"), "/env_names.rs"));
}

/// Returns the value of `SITELINE_STATE_DIR` if set and non-empty.
pub fn state_dir() -> Option<PathBuf> {
    non_empty(names::SITELINE_STATE_DIR).map(PathBuf::from)
}

/// Returns the value of `XDG_STATE_HOME` if set and non-empty.
pub fn xdg_state_home() -> Option<PathBuf> {
    non_empty(names::XDG_STATE_HOME).map(PathBuf::from)
}

/// Returns `true` if `RUST_LOG` carries a filter directive.
pub fn rust_log_set() -> bool {
    non_empty(names::RUST_LOG).is_some()
}

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
