// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for sl-core operations.

use thiserror::Error;

/// Coarse classification used by transport layers to pick a response code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The referenced record is absent or soft-deleted.
    NotFound,
    /// The request is malformed or references something unusable.
    Validation,
    /// A uniqueness constraint could not be satisfied.
    Conflict,
    /// Storage or serialization failure.
    Internal,
}

/// All possible errors that can occur in sl-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("issue not found: {0}")]
    IssueNotFound(String),

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("link not found: {0}")]
    LinkNotFound(String),

    #[error("comment not found: {0}")]
    CommentNotFound(String),

    #[error("project {0} not found or inactive")]
    ProjectInactive(String),

    #[error("invalid status transition: cannot go from {from} to {to}\n  hint: from '{from}' you can go to: {valid_targets}")]
    InvalidTransition {
        from: String,
        to: String,
        valid_targets: String,
    },

    #[error("invalid issue type: '{0}'\n  hint: valid types are: design, execution, safety, quality, supply, contract, other")]
    InvalidIssueType(String),

    #[error("invalid priority: '{0}'\n  hint: valid priorities are: p4_low, p3_medium, p2_high, p1_critical")]
    InvalidPriority(String),

    #[error("invalid status: '{0}'\n  hint: valid statuses are: open, in_analysis, awaiting_response, resolved, closed, cancelled")]
    InvalidStatus(String),

    #[error("invalid link type: '{0}'\n  hint: valid types are: work_task, model_element, document, contract, daily_log, other")]
    InvalidLinkType(String),

    #[error("invalid transition policy: '{0}'\n  hint: valid policies are: permissive, strict")]
    InvalidPolicy(String),

    #[error("{field} cannot be empty")]
    FieldEmpty { field: &'static str },

    #[error("{field} too long ({actual} chars, max {max})")]
    FieldTooLong {
        field: &'static str,
        actual: usize,
        max: usize,
    },

    #[error("{0}")]
    InvalidInput(String),

    #[error("could not allocate a unique reference code for project {project_id} after {attempts} attempts")]
    ReferenceCodeConflict { project_id: String, attempts: u32 },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl Error {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::IssueNotFound(_)
            | Error::ProjectNotFound(_)
            | Error::LinkNotFound(_)
            | Error::CommentNotFound(_) => ErrorKind::NotFound,
            Error::ProjectInactive(_)
            | Error::InvalidTransition { .. }
            | Error::InvalidIssueType(_)
            | Error::InvalidPriority(_)
            | Error::InvalidStatus(_)
            | Error::InvalidLinkType(_)
            | Error::InvalidPolicy(_)
            | Error::FieldEmpty { .. }
            | Error::FieldTooLong { .. }
            | Error::InvalidInput(_) => ErrorKind::Validation,
            Error::ReferenceCodeConflict { .. } => ErrorKind::Conflict,
            Error::Database(_) | Error::Io(_) | Error::CorruptedData(_) => ErrorKind::Internal,
        }
    }

    /// Returns true if this is a SQLite unique-constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Error::Database(rusqlite::Error::SqliteFailure(err, _)) => {
                err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            }
            _ => false,
        }
    }
}

/// A specialized Result type for sl-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
