// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Issue lifecycle engine.
//!
//! Status changes and full updates are applied to an in-memory [`Issue`]
//! here, then persisted by the caller. The transition policy decides which
//! status moves are accepted at all; the side effects below run only for
//! accepted moves.
//!
//! Status patch side effects, in order:
//! 1. an SLA supplied with the patch replaces `sla_minutes`
//! 2. `updated_at` is stamped
//! 3. `resolved`/`closed` stamp `resolved_at` (every time), and for an RFI
//!    stamp `responded_at` once
//! 4. `awaiting_response` derives `response_due_date` from the SLA when no
//!    due date is set yet
//!
//! A full update replaces every mutable field and never runs these side
//! effects; the only derived value is `responded_at` when an answer is given.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::issue::{Issue, IssueUpdate, Status};

/// Which status transitions are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Any status may be set to any status, including itself.
    #[default]
    Permissive,
    /// Forward moves along the workflow, cancellation of open work, and
    /// reopening a resolved issue for analysis.
    Strict,
}

impl TransitionPolicy {
    /// Returns the string representation used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPolicy::Permissive => "permissive",
            TransitionPolicy::Strict => "strict",
        }
    }

    /// Check if moving from `from` to `to` is allowed under this policy.
    pub fn can_transition(&self, from: Status, to: Status) -> bool {
        match self {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::Strict => strict_allows(from, to),
        }
    }

    /// All statuses reachable from `from`, in workflow order.
    pub fn targets(&self, from: Status) -> Vec<Status> {
        Status::ALL
            .into_iter()
            .filter(|to| self.can_transition(from, *to))
            .collect()
    }

    /// Reachable statuses as a comma-separated list for error hints.
    pub fn valid_targets(&self, from: Status) -> String {
        let targets = self.targets(from);
        if targets.is_empty() {
            return "nothing (terminal status)".to_string();
        }
        targets
            .iter()
            .map(Status::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Returns an error naming the valid targets if the move is rejected.
    pub fn check(&self, from: Status, to: Status) -> Result<()> {
        if self.can_transition(from, to) {
            return Ok(());
        }
        Err(Error::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
            valid_targets: self.valid_targets(from),
        })
    }
}

fn strict_allows(from: Status, to: Status) -> bool {
    if from.is_terminal() || from == to {
        return false;
    }
    // Cancelled sorts last, so "any later state" already admits it.
    matches!((from, to), (Status::Resolved, Status::InAnalysis)) || to.ordinal() > from.ordinal()
}

impl fmt::Display for TransitionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransitionPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "permissive" => Ok(TransitionPolicy::Permissive),
            "strict" => Ok(TransitionPolicy::Strict),
            _ => Err(Error::InvalidPolicy(s.to_string())),
        }
    }
}

/// A status patch: target status plus an optional SLA to store with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla_minutes: Option<u32>,
}

impl StatusChange {
    /// A patch that only moves the status.
    pub fn to(status: Status) -> Self {
        StatusChange {
            status,
            sla_minutes: None,
        }
    }

    /// Sets the SLA stored alongside the move (builder pattern).
    pub fn with_sla_minutes(mut self, minutes: u32) -> Self {
        self.sla_minutes = Some(minutes);
        self
    }
}

/// Applies a status patch to `issue` after checking it against `policy`.
pub fn apply_status_change(
    issue: &mut Issue,
    change: StatusChange,
    policy: TransitionPolicy,
    now: DateTime<Utc>,
) -> Result<()> {
    policy.check(issue.status, change.status)?;

    if let Some(minutes) = change.sla_minutes {
        issue.sla_minutes = Some(minutes);
    }

    issue.status = change.status;
    issue.updated_at = Some(now);

    if change.status.marks_resolution() {
        issue.resolved_at = Some(now);
        if issue.is_rfi && issue.responded_at.is_none() {
            issue.responded_at = Some(now);
        }
    }

    if change.status == Status::AwaitingResponse && issue.response_due_date.is_none() {
        if let Some(minutes) = issue.sla_minutes {
            issue.response_due_date = Some(now + Duration::minutes(i64::from(minutes)));
        }
    }

    Ok(())
}

/// Replaces every mutable field of `issue` with the values in `update`.
///
/// The policy is only consulted when the status actually changes.
pub fn apply_full_update(
    issue: &mut Issue,
    update: &IssueUpdate,
    policy: TransitionPolicy,
    now: DateTime<Utc>,
) -> Result<()> {
    if update.status != issue.status {
        policy.check(issue.status, update.status)?;
    }

    issue.title = update.title.clone();
    issue.description = update.description.clone();
    issue.issue_type = update.issue_type;
    issue.priority = update.priority;
    issue.status = update.status;
    issue.is_blocking = update.is_blocking;
    issue.due_date = update.due_date;
    issue.sla_minutes = update.sla_minutes;
    issue.response_due_date = update.response_due_date;
    issue.assigned_to_user_id = update.assigned_to_user_id;
    issue.reported_by_user_id = update.reported_by_user_id;
    issue.responded_by_user_id = update.responded_by_user_id;
    issue.work_task_id = update.work_task_id;
    issue.location = update.location.clone();
    issue.discipline = update.discipline.clone();
    issue.resolution = update.resolution.clone();
    issue.rfi_question = update.rfi_question.clone();
    issue.rfi_answer = update.rfi_answer.clone();
    issue.external_reference = update.external_reference.clone();
    issue.updated_at = Some(now);

    if update
        .rfi_answer
        .as_deref()
        .is_some_and(|answer| !answer.trim().is_empty())
    {
        issue.responded_at = Some(now);
    }

    Ok(())
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
