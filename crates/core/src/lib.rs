// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! sl-core: Issue and RFI tracking for construction projects
//!
//! This crate provides the records, lifecycle engine, reference code
//! generator, projections and SQLite storage used by the sitelined daemon.

pub mod clock;
pub mod db;
pub mod error;
pub mod issue;
pub mod lifecycle;
pub mod link;
pub mod project;
pub mod projection;
pub mod reference;
pub mod thread;
pub mod tracker;
pub mod validate;

pub use clock::{Clock, ManualClock, SystemClock};
pub use db::Database;
pub use error::{Error, ErrorKind, Result};
pub use issue::{Issue, IssueType, IssueUpdate, NewIssue, Priority, Status};
pub use lifecycle::{StatusChange, TransitionPolicy};
pub use link::{Link, LinkType, NewLink};
pub use project::{NewProject, NewUser, NewWorkTask, Project, User, WorkTask};
pub use projection::{AttachmentView, CommentView, IssueDetail, IssueSummary, LinkView};
pub use thread::{Attachment, Comment, NewAttachment, NewComment};
pub use tracker::Tracker;
