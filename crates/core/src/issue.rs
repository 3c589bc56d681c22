// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Core issue types for the SiteLine tracker.
//!
//! This module contains the fundamental data types: Issue, IssueType,
//! Priority, Status, and the create/update payloads that feed the
//! lifecycle engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Classification of issues by the discipline of the problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    /// Drawing or specification problem.
    Design,
    /// Problem found on site during construction.
    Execution,
    /// Hazard to workers or the public.
    Safety,
    /// Workmanship or material defect.
    Quality,
    /// Procurement or delivery issue.
    Supply,
    /// Contractual or commercial question.
    Contract,
    /// Anything else.
    Other,
}

impl IssueType {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Design => "design",
            IssueType::Execution => "execution",
            IssueType::Safety => "safety",
            IssueType::Quality => "quality",
            IssueType::Supply => "supply",
            IssueType::Contract => "contract",
            IssueType::Other => "other",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "design" => Ok(IssueType::Design),
            "execution" => Ok(IssueType::Execution),
            "safety" => Ok(IssueType::Safety),
            "quality" => Ok(IssueType::Quality),
            "supply" => Ok(IssueType::Supply),
            "contract" => Ok(IssueType::Contract),
            "other" => Ok(IssueType::Other),
            _ => Err(Error::InvalidIssueType(s.to_string())),
        }
    }
}

/// Severity of an issue. Ordering follows severity, so `P1Critical` is the
/// greatest value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    P4Low,
    P3Medium,
    P2High,
    P1Critical,
}

impl Priority {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::P4Low => "p4_low",
            Priority::P3Medium => "p3_medium",
            Priority::P2High => "p2_high",
            Priority::P1Critical => "p1_critical",
        }
    }

    /// Numeric ordinal, lowest severity first.
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "p4_low" | "low" => Ok(Priority::P4Low),
            "p3_medium" | "medium" => Ok(Priority::P3Medium),
            "p2_high" | "high" => Ok(Priority::P2High),
            "p1_critical" | "critical" => Ok(Priority::P1Critical),
            _ => Err(Error::InvalidPriority(s.to_string())),
        }
    }
}

/// Workflow status of an issue or RFI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Initial state for new issues.
    Open,
    /// Someone is looking into it.
    InAnalysis,
    /// Waiting on an answer from another party; SLA clock runs here.
    AwaitingResponse,
    /// A resolution has been provided.
    Resolved,
    /// Resolution accepted, no further work.
    Closed,
    /// Withdrawn without resolution.
    Cancelled,
}

impl Status {
    /// All statuses in conventional workflow order.
    pub const ALL: [Status; 6] = [
        Status::Open,
        Status::InAnalysis,
        Status::AwaitingResponse,
        Status::Resolved,
        Status::Closed,
        Status::Cancelled,
    ];

    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InAnalysis => "in_analysis",
            Status::AwaitingResponse => "awaiting_response",
            Status::Resolved => "resolved",
            Status::Closed => "closed",
            Status::Cancelled => "cancelled",
        }
    }

    /// Numeric ordinal in workflow order.
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// Returns true if no further work happens in this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Closed | Status::Cancelled)
    }

    /// Returns true if reaching this state stamps the resolution time.
    pub fn marks_resolution(&self) -> bool {
        matches!(self, Status::Resolved | Status::Closed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Status::Open),
            "in_analysis" => Ok(Status::InAnalysis),
            "awaiting_response" => Ok(Status::AwaitingResponse),
            "resolved" => Ok(Status::Resolved),
            "closed" => Ok(Status::Closed),
            "cancelled" => Ok(Status::Cancelled),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

/// A tracked problem or request for information on a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: Uuid,
    pub project_id: Uuid,
    /// Human-readable `ISS-yyyyMMdd-NNNN` code, unique within the project.
    pub reference_code: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub issue_type: IssueType,
    pub priority: Priority,
    pub status: Status,
    /// Distinguishes an RFI from a plain issue.
    pub is_rfi: bool,
    pub is_blocking: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sla_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_by_user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responded_by_user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_task_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discipline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rfi_question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rfi_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_reference: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Issue {
    /// Builds a fresh `Open` issue from a creation request.
    pub fn from_new(
        id: Uuid,
        reference_code: String,
        new: &NewIssue,
        created_at: DateTime<Utc>,
    ) -> Self {
        Issue {
            id,
            project_id: new.project_id,
            reference_code,
            title: new.title.clone(),
            description: new.description.clone(),
            issue_type: new.issue_type,
            priority: new.priority,
            status: Status::Open,
            is_rfi: new.is_rfi,
            is_blocking: new.is_blocking,
            due_date: new.due_date,
            sla_minutes: new.sla_minutes,
            response_due_date: new.response_due_date,
            responded_at: None,
            resolved_at: None,
            assigned_to_user_id: new.assigned_to_user_id,
            reported_by_user_id: new.reported_by_user_id,
            responded_by_user_id: None,
            work_task_id: new.work_task_id,
            location: new.location.clone(),
            discipline: new.discipline.clone(),
            resolution: None,
            rfi_question: new.rfi_question.clone(),
            rfi_answer: None,
            external_reference: new.external_reference.clone(),
            is_deleted: false,
            created_at,
            updated_at: None,
        }
    }
}

fn default_issue_type() -> IssueType {
    IssueType::Other
}

fn default_priority() -> Priority {
    Priority::P3Medium
}

/// Payload for creating an issue or RFI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIssue {
    pub project_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default = "default_issue_type")]
    pub issue_type: IssueType,
    #[serde(default = "default_priority")]
    pub priority: Priority,
    #[serde(default)]
    pub is_rfi: bool,
    #[serde(default)]
    pub is_blocking: bool,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sla_minutes: Option<u32>,
    #[serde(default)]
    pub response_due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assigned_to_user_id: Option<Uuid>,
    #[serde(default)]
    pub reported_by_user_id: Option<Uuid>,
    #[serde(default)]
    pub work_task_id: Option<Uuid>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub discipline: Option<String>,
    #[serde(default)]
    pub rfi_question: Option<String>,
    #[serde(default)]
    pub external_reference: Option<String>,
}

impl NewIssue {
    /// Creates a minimal request; everything else takes its default.
    pub fn new(project_id: Uuid, title: impl Into<String>) -> Self {
        NewIssue {
            project_id,
            title: title.into(),
            description: None,
            issue_type: default_issue_type(),
            priority: default_priority(),
            is_rfi: false,
            is_blocking: false,
            due_date: None,
            sla_minutes: None,
            response_due_date: None,
            assigned_to_user_id: None,
            reported_by_user_id: None,
            work_task_id: None,
            location: None,
            discipline: None,
            rfi_question: None,
            external_reference: None,
        }
    }

    /// Sets the issue type (builder pattern).
    pub fn with_type(mut self, issue_type: IssueType) -> Self {
        self.issue_type = issue_type;
        self
    }

    /// Sets the priority (builder pattern).
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Marks the request as an RFI carrying the given question.
    pub fn as_rfi(mut self, question: impl Into<String>) -> Self {
        self.is_rfi = true;
        self.rfi_question = Some(question.into());
        self
    }

    /// Sets the SLA duration in minutes (builder pattern).
    pub fn with_sla_minutes(mut self, minutes: u32) -> Self {
        self.sla_minutes = Some(minutes);
        self
    }
}

/// Payload for the full-update operation. Every mutable field is replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueUpdate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub priority: Priority,
    pub status: Status,
    #[serde(default)]
    pub is_blocking: bool,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sla_minutes: Option<u32>,
    #[serde(default)]
    pub response_due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assigned_to_user_id: Option<Uuid>,
    #[serde(default)]
    pub reported_by_user_id: Option<Uuid>,
    #[serde(default)]
    pub responded_by_user_id: Option<Uuid>,
    #[serde(default)]
    pub work_task_id: Option<Uuid>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub discipline: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub rfi_question: Option<String>,
    #[serde(default)]
    pub rfi_answer: Option<String>,
    #[serde(default)]
    pub external_reference: Option<String>,
}

impl IssueUpdate {
    /// Starts an update that keeps the issue's current values.
    pub fn from_issue(issue: &Issue) -> Self {
        IssueUpdate {
            title: issue.title.clone(),
            description: issue.description.clone(),
            issue_type: issue.issue_type,
            priority: issue.priority,
            status: issue.status,
            is_blocking: issue.is_blocking,
            due_date: issue.due_date,
            sla_minutes: issue.sla_minutes,
            response_due_date: issue.response_due_date,
            assigned_to_user_id: issue.assigned_to_user_id,
            reported_by_user_id: issue.reported_by_user_id,
            responded_by_user_id: issue.responded_by_user_id,
            work_task_id: issue.work_task_id,
            location: issue.location.clone(),
            discipline: issue.discipline.clone(),
            resolution: issue.resolution.clone(),
            rfi_question: issue.rfi_question.clone(),
            rfi_answer: issue.rfi_answer.clone(),
            external_reference: issue.external_reference.clone(),
        }
    }
}

#[cfg(test)]
#[path = "issue_tests.rs"]
mod tests;
