// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use sl_core::{Database, NewProject};

fn handle() -> TrackerHandle {
    TrackerHandle::new(Tracker::new(Database::open_in_memory().unwrap()))
}

#[tokio::test]
async fn call_returns_closure_result() {
    let handle = handle();
    let project = handle
        .call(|t| {
            t.create_project(&NewProject {
                name: "Tower A".to_string(),
            })
        })
        .await
        .unwrap();

    let id = project.id;
    let fetched = handle.call(move |t| t.get_project(id)).await.unwrap();
    assert_eq!(fetched.name, "Tower A");
}

#[tokio::test]
async fn core_errors_pass_through() {
    let handle = handle();
    let err = handle
        .call(|t| t.get_project(uuid::Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Core(sl_core::Error::ProjectNotFound(_))));
}
