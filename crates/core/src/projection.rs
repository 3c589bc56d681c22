// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only views of issues and their threads.
//!
//! Views carry display names next to the raw ids. Names are looked up
//! through [`Names`], which the caller fills from storage before building
//! the views; an id with no entry renders as an absent name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::issue::{Issue, IssueType, Priority, Status};
use crate::link::{Link, LinkType};
use crate::thread::{Attachment, Comment};

/// Display names for users and work tasks referenced by a set of views.
#[derive(Debug, Default, Clone)]
pub struct Names {
    users: HashMap<Uuid, String>,
    work_tasks: HashMap<Uuid, String>,
}

impl Names {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&mut self, id: Uuid, name: String) {
        self.users.insert(id, name);
    }

    pub fn insert_work_task(&mut self, id: Uuid, title: String) {
        self.work_tasks.insert(id, title);
    }

    pub fn user(&self, id: Option<Uuid>) -> Option<String> {
        id.and_then(|id| self.users.get(&id).cloned())
    }

    pub fn work_task(&self, id: Option<Uuid>) -> Option<String> {
        id.and_then(|id| self.work_tasks.get(&id).cloned())
    }
}

/// User ids an issue refers to.
pub fn issue_user_ids(issue: &Issue) -> impl Iterator<Item = Uuid> {
    [
        issue.assigned_to_user_id,
        issue.reported_by_user_id,
        issue.responded_by_user_id,
    ]
    .into_iter()
    .flatten()
}

/// List row for an issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSummary {
    pub id: Uuid,
    pub project_id: Uuid,
    pub reference_code: String,
    pub title: String,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub priority: Priority,
    pub status: Status,
    pub is_rfi: bool,
    pub is_blocking: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to_user_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to_user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_by_user_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_by_user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responded_by_user_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responded_by_user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_task_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_task_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discipline: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl IssueSummary {
    pub fn build(issue: &Issue, names: &Names) -> Self {
        IssueSummary {
            id: issue.id,
            project_id: issue.project_id,
            reference_code: issue.reference_code.clone(),
            title: issue.title.clone(),
            issue_type: issue.issue_type,
            priority: issue.priority,
            status: issue.status,
            is_rfi: issue.is_rfi,
            is_blocking: issue.is_blocking,
            due_date: issue.due_date,
            sla_minutes: issue.sla_minutes,
            response_due_date: issue.response_due_date,
            responded_at: issue.responded_at,
            resolved_at: issue.resolved_at,
            assigned_to_user_id: issue.assigned_to_user_id,
            assigned_to_user_name: names.user(issue.assigned_to_user_id),
            reported_by_user_id: issue.reported_by_user_id,
            reported_by_user_name: names.user(issue.reported_by_user_id),
            responded_by_user_id: issue.responded_by_user_id,
            responded_by_user_name: names.user(issue.responded_by_user_id),
            work_task_id: issue.work_task_id,
            work_task_title: names.work_task(issue.work_task_id),
            location: issue.location.clone(),
            discipline: issue.discipline.clone(),
            created_at: issue.created_at,
            updated_at: issue.updated_at,
        }
    }
}

/// Full view of one issue with its thread and links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueDetail {
    #[serde(flatten)]
    pub summary: IssueSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rfi_question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rfi_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_reference: Option<String>,
    /// Attachments on the issue itself, not on a comment.
    pub attachments: Vec<AttachmentView>,
    /// Oldest first.
    pub comments: Vec<CommentView>,
    pub links: Vec<LinkView>,
}

impl IssueDetail {
    pub fn build(
        issue: &Issue,
        attachments: Vec<AttachmentView>,
        comments: Vec<CommentView>,
        links: Vec<LinkView>,
        names: &Names,
    ) -> Self {
        IssueDetail {
            summary: IssueSummary::build(issue, names),
            description: issue.description.clone(),
            resolution: issue.resolution.clone(),
            rfi_question: issue.rfi_question.clone(),
            rfi_answer: issue.rfi_answer.clone(),
            external_reference: issue.external_reference.clone(),
            attachments,
            comments,
            links,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub issue_id: Uuid,
    pub message: String,
    pub is_internal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub attachments: Vec<AttachmentView>,
}

impl CommentView {
    pub fn build(comment: &Comment, attachments: Vec<AttachmentView>, names: &Names) -> Self {
        CommentView {
            id: comment.id,
            issue_id: comment.issue_id,
            message: comment.message.clone(),
            is_internal: comment.is_internal,
            author_id: comment.author_id,
            author_name: names.user(comment.author_id),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            attachments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentView {
    pub id: Uuid,
    pub issue_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<Uuid>,
    pub file_name: String,
    pub file_url: String,
    pub content_type: String,
    pub file_size: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_by_user_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_by_user_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AttachmentView {
    pub fn build(attachment: &Attachment, names: &Names) -> Self {
        AttachmentView {
            id: attachment.id,
            issue_id: attachment.issue_id,
            comment_id: attachment.comment_id,
            file_name: attachment.file_name.clone(),
            file_url: attachment.file_url.clone(),
            content_type: attachment.content_type.clone(),
            file_size: attachment.file_size,
            uploaded_by_user_id: attachment.uploaded_by_user_id,
            uploaded_by_user_name: names.user(attachment.uploaded_by_user_id),
            created_at: attachment.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkView {
    pub id: Uuid,
    pub issue_id: Uuid,
    pub link_type: LinkType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_entity_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Link> for LinkView {
    fn from(link: &Link) -> Self {
        LinkView {
            id: link.id,
            issue_id: link.issue_id,
            link_type: link.link_type,
            related_entity_id: link.related_entity_id,
            external_reference: link.external_reference.clone(),
            label: link.label.clone(),
            metadata: link.metadata.clone(),
            created_at: link.created_at,
        }
    }
}

#[cfg(test)]
#[path = "projection_tests.rs"]
mod tests;
