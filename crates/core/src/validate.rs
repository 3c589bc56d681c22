// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Input validation for create and update payloads.
//!
//! Lengths are counted in characters, not bytes.

use crate::error::{Error, Result};
use crate::issue::{IssueUpdate, NewIssue};
use crate::link::NewLink;
use crate::project::{NewProject, NewUser, NewWorkTask};
use crate::thread::{NewAttachment, NewComment};

// Input length limits
pub const MAX_TITLE_LENGTH: usize = 300;
pub const MAX_REFERENCE_CODE_LENGTH: usize = 40;
pub const MAX_LOCATION_LENGTH: usize = 200;
pub const MAX_DISCIPLINE_LENGTH: usize = 120;
pub const MAX_RFI_TEXT_LENGTH: usize = 2000;
pub const MAX_EXTERNAL_REFERENCE_LENGTH: usize = 200;
pub const MAX_MESSAGE_LENGTH: usize = 4000;
pub const MAX_FILE_NAME_LENGTH: usize = 260;
pub const MAX_FILE_URL_LENGTH: usize = 500;
pub const MAX_CONTENT_TYPE_LENGTH: usize = 120;
pub const MAX_LINK_LABEL_LENGTH: usize = 200;
pub const MAX_LINK_METADATA_LENGTH: usize = 2000;
pub const MAX_PROJECT_NAME_LENGTH: usize = 200;
pub const MAX_PERSON_NAME_LENGTH: usize = 100;
pub const MAX_EMAIL_LENGTH: usize = 255;

fn check_len(field: &'static str, value: &str, max: usize) -> Result<()> {
    let actual = value.chars().count();
    if actual > max {
        return Err(Error::FieldTooLong { field, actual, max });
    }
    Ok(())
}

fn check_opt_len(field: &'static str, value: Option<&str>, max: usize) -> Result<()> {
    match value {
        Some(v) => check_len(field, v, max),
        None => Ok(()),
    }
}

/// Validate a required text field: non-blank and within limits.
pub fn validate_required(field: &'static str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::FieldEmpty { field });
    }
    check_len(field, value, max)
}

/// Validate an issue title.
pub fn validate_title(title: &str) -> Result<()> {
    validate_required("title", title, MAX_TITLE_LENGTH)
}

/// Validate a generated or stored reference code.
pub fn validate_reference_code(code: &str) -> Result<()> {
    check_len("reference code", code, MAX_REFERENCE_CODE_LENGTH)
}

/// Validate a create-issue request.
pub fn validate_new_issue(new: &NewIssue) -> Result<()> {
    validate_title(&new.title)?;
    check_opt_len("location", new.location.as_deref(), MAX_LOCATION_LENGTH)?;
    check_opt_len("discipline", new.discipline.as_deref(), MAX_DISCIPLINE_LENGTH)?;
    check_opt_len("rfi question", new.rfi_question.as_deref(), MAX_RFI_TEXT_LENGTH)?;
    check_opt_len(
        "external reference",
        new.external_reference.as_deref(),
        MAX_EXTERNAL_REFERENCE_LENGTH,
    )?;
    Ok(())
}

/// Validate a full-update request.
pub fn validate_update(update: &IssueUpdate) -> Result<()> {
    validate_title(&update.title)?;
    check_opt_len("location", update.location.as_deref(), MAX_LOCATION_LENGTH)?;
    check_opt_len("discipline", update.discipline.as_deref(), MAX_DISCIPLINE_LENGTH)?;
    check_opt_len("rfi question", update.rfi_question.as_deref(), MAX_RFI_TEXT_LENGTH)?;
    check_opt_len("rfi answer", update.rfi_answer.as_deref(), MAX_RFI_TEXT_LENGTH)?;
    check_opt_len(
        "external reference",
        update.external_reference.as_deref(),
        MAX_EXTERNAL_REFERENCE_LENGTH,
    )?;
    Ok(())
}

/// Validate an attachment descriptor.
pub fn validate_attachment(attachment: &NewAttachment) -> Result<()> {
    validate_required("file name", &attachment.file_name, MAX_FILE_NAME_LENGTH)?;
    validate_required("file url", &attachment.file_url, MAX_FILE_URL_LENGTH)?;
    check_opt_len(
        "content type",
        attachment.content_type.as_deref(),
        MAX_CONTENT_TYPE_LENGTH,
    )?;
    if attachment.file_size < 0 {
        return Err(Error::InvalidInput(format!(
            "file size must not be negative (got {})",
            attachment.file_size
        )));
    }
    Ok(())
}

/// Validate a comment and every attachment it carries.
pub fn validate_comment(comment: &NewComment) -> Result<()> {
    validate_required("message", &comment.message, MAX_MESSAGE_LENGTH)?;
    for attachment in comment.attachments.iter().flatten() {
        validate_attachment(attachment)?;
    }
    Ok(())
}

/// Validate a link request.
pub fn validate_link(link: &NewLink) -> Result<()> {
    check_opt_len("link label", link.label.as_deref(), MAX_LINK_LABEL_LENGTH)?;
    check_opt_len(
        "link external reference",
        link.external_reference.as_deref(),
        MAX_EXTERNAL_REFERENCE_LENGTH,
    )?;
    check_opt_len(
        "link metadata",
        link.metadata.as_deref(),
        MAX_LINK_METADATA_LENGTH,
    )?;
    Ok(())
}

/// Validate a project registration.
pub fn validate_project(project: &NewProject) -> Result<()> {
    validate_required("project name", &project.name, MAX_PROJECT_NAME_LENGTH)
}

/// Validate a user registration.
pub fn validate_user(user: &NewUser) -> Result<()> {
    validate_required("email", &user.email, MAX_EMAIL_LENGTH)?;
    validate_required("first name", &user.first_name, MAX_PERSON_NAME_LENGTH)?;
    check_len("last name", &user.last_name, MAX_PERSON_NAME_LENGTH)
}

/// Validate a work task registration.
pub fn validate_work_task(task: &NewWorkTask) -> Result<()> {
    validate_required("task title", &task.title, MAX_TITLE_LENGTH)
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
