// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Comment threads and file attachments.
//!
//! An attachment belongs either to the issue directly (`comment_id` is
//! `None`) or to one comment of that issue's thread.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default MIME type when the uploader did not supply one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A message in an issue or RFI thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub issue_id: Uuid,
    pub message: String,
    /// Hidden from external parties when true.
    pub is_internal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A reference to a stored file. The content itself lives elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Uuid,
    pub issue_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<Uuid>,
    pub file_name: String,
    pub file_url: String,
    pub content_type: String,
    /// Size in bytes.
    pub file_size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_by_user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Attachment {
    /// Materializes a descriptor into a row owned by `issue_id` and,
    /// optionally, a comment of that issue.
    pub fn from_new(
        id: Uuid,
        issue_id: Uuid,
        comment_id: Option<Uuid>,
        new: &NewAttachment,
        created_at: DateTime<Utc>,
    ) -> Self {
        Attachment {
            id,
            issue_id,
            comment_id,
            file_name: new.file_name.clone(),
            file_url: new.file_url.clone(),
            content_type: new
                .content_type
                .clone()
                .filter(|ct| !ct.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            file_size: new.file_size,
            uploaded_by_user_id: new.uploaded_by_user_id,
            created_at,
        }
    }
}

/// Descriptor for an attachment to create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttachment {
    pub file_name: String,
    pub file_url: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub file_size: i64,
    #[serde(default)]
    pub uploaded_by_user_id: Option<Uuid>,
}

impl NewAttachment {
    /// Creates a descriptor with the given name and URL.
    pub fn new(file_name: impl Into<String>, file_url: impl Into<String>) -> Self {
        NewAttachment {
            file_name: file_name.into(),
            file_url: file_url.into(),
            content_type: None,
            file_size: 0,
            uploaded_by_user_id: None,
        }
    }

    /// Sets the content type and size (builder pattern).
    pub fn with_content(mut self, content_type: impl Into<String>, file_size: i64) -> Self {
        self.content_type = Some(content_type.into());
        self.file_size = file_size;
        self
    }

    /// Sets the uploader (builder pattern).
    pub fn uploaded_by(mut self, user_id: Uuid) -> Self {
        self.uploaded_by_user_id = Some(user_id);
        self
    }
}

/// Payload for the add-comment operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub message: String,
    #[serde(default)]
    pub is_internal: bool,
    #[serde(default)]
    pub author_id: Option<Uuid>,
    #[serde(default)]
    pub attachments: Option<Vec<NewAttachment>>,
}

impl NewComment {
    /// Creates a public comment with no author and no attachments.
    pub fn new(message: impl Into<String>) -> Self {
        NewComment {
            message: message.into(),
            is_internal: false,
            author_id: None,
            attachments: None,
        }
    }

    /// Sets the author (builder pattern).
    pub fn by(mut self, author_id: Uuid) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// Marks the comment internal (builder pattern).
    pub fn internal(mut self) -> Self {
        self.is_internal = true;
        self
    }

    /// Adds an attachment descriptor (builder pattern).
    pub fn with_attachment(mut self, attachment: NewAttachment) -> Self {
        self.attachments.get_or_insert_with(Vec::new).push(attachment);
        self
    }
}
