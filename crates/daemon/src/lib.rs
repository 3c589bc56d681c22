// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! sitelined: HTTP service for SiteLine issue and RFI tracking.
//!
//! Wraps an [`sl_core::Tracker`] in an axum router. Configuration comes from
//! an optional TOML file layered under environment variables and flags.

pub mod api;
pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod handle;
pub mod logging;
pub mod server;

pub use cli::Args;
pub use config::{Config, LogFormat};
pub use error::{ApiError, Error, Result};
pub use server::{build_router, serve};
