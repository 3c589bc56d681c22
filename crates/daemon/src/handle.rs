// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::{Arc, Mutex};

use sl_core::Tracker;

use crate::error::{Error, Result};

/// Shared access to the tracker from async handlers.
///
/// SQLite work runs on the blocking pool behind a single mutex, so requests
/// are serialized against one connection.
#[derive(Clone)]
pub struct TrackerHandle {
    inner: Arc<Mutex<Tracker>>,
}

impl TrackerHandle {
    pub fn new(tracker: Tracker) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tracker)),
        }
    }

    /// Runs `f` against the tracker on a blocking thread.
    pub async fn call<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&Tracker) -> sl_core::Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let tracker = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let guard = tracker.lock().map_err(|_| Error::Poisoned)?;
            f(&guard).map_err(Error::from)
        })
        .await?
    }
}

#[cfg(test)]
#[path = "handle_tests.rs"]
mod tests;
