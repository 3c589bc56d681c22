// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The issue tracker: lifecycle rules on top of [`Database`].
//!
//! Every public operation validates its input, checks that the records it
//! touches exist, applies the lifecycle engine, persists, and returns a
//! projection. Time comes from the injected [`Clock`].

use chrono::{DateTime, SubsecRound, Utc};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::issue::{Issue, IssueUpdate, NewIssue};
use crate::lifecycle::{apply_full_update, apply_status_change, StatusChange, TransitionPolicy};
use crate::link::{Link, NewLink};
use crate::project::{NewProject, NewUser, NewWorkTask, Project, User, WorkTask};
use crate::projection::{
    issue_user_ids, AttachmentView, CommentView, IssueDetail, IssueSummary, LinkView, Names,
};
use crate::reference::{
    format_reference_code, next_sequence, utc_day_bounds, MAX_REFERENCE_ATTEMPTS,
};
use crate::thread::{Attachment, Comment, NewAttachment, NewComment};
use crate::validate;

/// Issue and RFI tracker backed by one SQLite database.
pub struct Tracker {
    db: Database,
    clock: Arc<dyn Clock>,
    policy: TransitionPolicy,
}

impl Tracker {
    /// Creates a tracker using the system clock and the permissive policy.
    pub fn new(db: Database) -> Self {
        Self::with_clock(db, Arc::new(SystemClock))
    }

    /// Creates a tracker reading time from `clock`.
    pub fn with_clock(db: Database, clock: Arc<dyn Clock>) -> Self {
        Tracker {
            db,
            clock,
            policy: TransitionPolicy::default(),
        }
    }

    /// Sets the transition policy (builder pattern).
    pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Direct access to storage.
    pub fn db(&self) -> &Database {
        &self.db
    }

    // Storage keeps microseconds, so values handed back match what a reload reads.
    fn now(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(6)
    }

    // -- supporting records ---------------------------------------------

    pub fn create_project(&self, new: &NewProject) -> Result<Project> {
        validate::validate_project(new)?;
        let project = Project {
            id: Uuid::new_v4(),
            name: new.name.trim().to_string(),
            is_deleted: false,
            created_at: self.now(),
        };
        self.db.insert_project(&project)?;
        info!(project = %project.id, name = %project.name, "project created");
        Ok(project)
    }

    pub fn get_project(&self, id: Uuid) -> Result<Project> {
        self.db.get_project(id)
    }

    /// Marks a project deleted. Its issues stay, but no new ones can be filed.
    pub fn deactivate_project(&self, id: Uuid) -> Result<()> {
        self.db.set_project_deleted(id)?;
        info!(project = %id, "project deactivated");
        Ok(())
    }

    pub fn create_user(&self, new: &NewUser) -> Result<User> {
        validate::validate_user(new)?;
        let user = User {
            id: Uuid::new_v4(),
            email: new.email.trim().to_string(),
            first_name: new.first_name.trim().to_string(),
            last_name: new.last_name.trim().to_string(),
            created_at: self.now(),
        };
        self.db.insert_user(&user)?;
        debug!(user = %user.id, "user created");
        Ok(user)
    }

    pub fn create_work_task(&self, project_id: Uuid, new: &NewWorkTask) -> Result<WorkTask> {
        validate::validate_work_task(new)?;
        if self.db.get_project(project_id)?.is_deleted {
            return Err(Error::ProjectInactive(project_id.to_string()));
        }
        let task = WorkTask {
            id: Uuid::new_v4(),
            project_id,
            title: new.title.trim().to_string(),
            created_at: self.now(),
        };
        self.db.insert_work_task(&task)?;
        debug!(task = %task.id, project = %project_id, "work task created");
        Ok(task)
    }

    // -- issues ---------------------------------------------------------

    /// Live issues of a project, newest first.
    pub fn list_issues(&self, project_id: Uuid, is_rfi: Option<bool>) -> Result<Vec<IssueSummary>> {
        let issues = self.db.list_issues(project_id, is_rfi)?;
        let names = self.resolve_names(
            issues.iter().flat_map(issue_user_ids),
            issues.iter().filter_map(|i| i.work_task_id),
        )?;
        Ok(issues
            .iter()
            .map(|issue| IssueSummary::build(issue, &names))
            .collect())
    }

    /// Full view of a live issue.
    pub fn get_issue(&self, id: Uuid) -> Result<IssueDetail> {
        self.load_issue_graph(id, false)
    }

    /// Files a new issue and returns its detail view.
    ///
    /// The reference code sequence is computed and the row inserted in one
    /// immediate transaction. A unique-index collision is retried with the
    /// next sequence, up to [`MAX_REFERENCE_ATTEMPTS`] times.
    pub fn create_issue(&self, new: &NewIssue) -> Result<IssueDetail> {
        validate::validate_new_issue(new)?;
        if !self.db.project_is_active(new.project_id)? {
            return Err(Error::ProjectInactive(new.project_id.to_string()));
        }
        self.check_user_refs([new.assigned_to_user_id, new.reported_by_user_id])?;
        self.check_work_task_ref(new.project_id, new.work_task_id)?;

        let mut attempt = 1;
        let issue = loop {
            match self.insert_with_next_code(new, attempt) {
                Ok(issue) => break issue,
                Err(err) if err.is_unique_violation() && attempt < MAX_REFERENCE_ATTEMPTS => {
                    warn!(
                        project = %new.project_id,
                        attempt,
                        "reference code collision, retrying"
                    );
                    attempt += 1;
                }
                Err(err) if err.is_unique_violation() => {
                    return Err(Error::ReferenceCodeConflict {
                        project_id: new.project_id.to_string(),
                        attempts: attempt,
                    });
                }
                Err(err) => return Err(err),
            }
        };

        info!(
            issue = %issue.id,
            reference = %issue.reference_code,
            project = %issue.project_id,
            rfi = issue.is_rfi,
            "issue created"
        );
        self.load_issue_graph(issue.id, true)
    }

    fn insert_with_next_code(&self, new: &NewIssue, attempt: u32) -> Result<Issue> {
        let tx = self.db.begin_immediate()?;
        let now = self.now();
        let today = now.date_naive();
        let (start, end) = utc_day_bounds(now);
        let count = self
            .db
            .count_issues_created_between(new.project_id, start, end)?;
        let highest = self.db.highest_reference_sequence(new.project_id, today)?;
        let code = format_reference_code(today, next_sequence(count, highest, attempt));
        validate::validate_reference_code(&code)?;

        let issue = Issue::from_new(Uuid::new_v4(), code, new, now);
        self.db.insert_issue(&issue)?;
        tx.commit()?;
        Ok(issue)
    }

    /// Moves a live issue to a new status, running the status side effects.
    pub fn update_status(&self, id: Uuid, change: StatusChange) -> Result<Issue> {
        let mut issue = self.db.get_issue(id, false)?;
        let from = issue.status;
        apply_status_change(&mut issue, change, self.policy, self.now())?;
        self.db.update_issue(&issue)?;
        debug!(
            issue = %issue.reference_code,
            from = %from,
            to = %issue.status,
            "status changed"
        );
        Ok(issue)
    }

    /// Replaces every mutable field of a live issue.
    pub fn update_issue(&self, id: Uuid, update: &IssueUpdate) -> Result<Issue> {
        validate::validate_update(update)?;
        let mut issue = self.db.get_issue(id, false)?;
        self.check_user_refs([
            update.assigned_to_user_id,
            update.reported_by_user_id,
            update.responded_by_user_id,
        ])?;
        self.check_work_task_ref(issue.project_id, update.work_task_id)?;

        apply_full_update(&mut issue, update, self.policy, self.now())?;
        self.db.update_issue(&issue)?;
        debug!(issue = %issue.reference_code, "issue updated");
        Ok(issue)
    }

    /// Soft-deletes a live issue.
    pub fn delete_issue(&self, id: Uuid) -> Result<()> {
        let mut issue = self.db.get_issue(id, false)?;
        issue.is_deleted = true;
        issue.updated_at = Some(self.now());
        self.db.update_issue(&issue)?;
        info!(issue = %issue.reference_code, "issue deleted");
        Ok(())
    }

    /// Removes an issue row and everything it owns. Not reachable over HTTP.
    pub fn purge_issue(&self, id: Uuid) -> Result<()> {
        self.db.purge_issue(id)?;
        warn!(issue = %id, "issue purged");
        Ok(())
    }

    /// Loads the detail graph of an issue, optionally including a
    /// soft-deleted one.
    pub fn load_issue_graph(&self, id: Uuid, include_deleted: bool) -> Result<IssueDetail> {
        let issue = self.db.get_issue(id, include_deleted)?;
        let comments = self.db.list_comments(id)?;
        let attachments = self.db.list_attachments(id)?;
        let links = self.db.list_links(id)?;

        let names = self.resolve_names(
            issue_user_ids(&issue)
                .chain(comments.iter().filter_map(|c| c.author_id))
                .chain(attachments.iter().filter_map(|a| a.uploaded_by_user_id)),
            issue.work_task_id,
        )?;

        let (direct, by_comment) = group_attachments(&attachments, &names);
        let comments = build_comments(&comments, by_comment, &names);
        let links = links.iter().map(LinkView::from).collect();

        Ok(IssueDetail::build(&issue, direct, comments, links, &names))
    }

    // -- thread ---------------------------------------------------------

    /// Adds a comment, with any attachments, to a live issue.
    pub fn add_comment(&self, issue_id: Uuid, new: &NewComment) -> Result<CommentView> {
        validate::validate_comment(new)?;
        self.ensure_live(issue_id)?;
        let descriptors = new.attachments.as_deref().unwrap_or_default();
        self.check_user_refs(
            std::iter::once(new.author_id).chain(descriptors.iter().map(|a| a.uploaded_by_user_id)),
        )?;

        let now = self.now();
        let comment = Comment {
            id: Uuid::new_v4(),
            issue_id,
            message: new.message.clone(),
            is_internal: new.is_internal,
            author_id: new.author_id,
            created_at: now,
            updated_at: None,
        };
        let attachments: Vec<Attachment> = descriptors
            .iter()
            .map(|d| Attachment::from_new(Uuid::new_v4(), issue_id, Some(comment.id), d, now))
            .collect();

        let tx = self.db.begin_immediate()?;
        self.db.insert_comment(&comment)?;
        for attachment in &attachments {
            self.db.insert_attachment(attachment)?;
        }
        tx.commit()?;

        debug!(
            issue = %issue_id,
            comment = %comment.id,
            attachments = attachments.len(),
            "comment added"
        );

        let names = self.resolve_names(
            comment
                .author_id
                .into_iter()
                .chain(attachments.iter().filter_map(|a| a.uploaded_by_user_id)),
            None::<Uuid>,
        )?;
        let views = attachments
            .iter()
            .map(|a| AttachmentView::build(a, &names))
            .collect();
        Ok(CommentView::build(&comment, views, &names))
    }

    /// Comments of a live issue, oldest first, each with its attachments.
    pub fn get_comments(&self, issue_id: Uuid) -> Result<Vec<CommentView>> {
        self.ensure_live(issue_id)?;
        let comments = self.db.list_comments(issue_id)?;
        let attachments = self.db.list_attachments(issue_id)?;
        let names = self.resolve_names(
            comments
                .iter()
                .filter_map(|c| c.author_id)
                .chain(attachments.iter().filter_map(|a| a.uploaded_by_user_id)),
            None::<Uuid>,
        )?;
        let (_, by_comment) = group_attachments(&attachments, &names);
        Ok(build_comments(&comments, by_comment, &names))
    }

    /// Removes a comment and its attachments. Not reachable over HTTP.
    pub fn delete_comment(&self, comment_id: Uuid) -> Result<()> {
        self.db.delete_comment(comment_id)?;
        debug!(comment = %comment_id, "comment deleted");
        Ok(())
    }

    /// Attaches a file to a live issue directly, outside any comment.
    pub fn add_attachment(&self, issue_id: Uuid, new: &NewAttachment) -> Result<AttachmentView> {
        validate::validate_attachment(new)?;
        self.ensure_live(issue_id)?;
        self.check_user_refs([new.uploaded_by_user_id])?;

        let attachment = Attachment::from_new(Uuid::new_v4(), issue_id, None, new, self.now());
        self.db.insert_attachment(&attachment)?;
        debug!(issue = %issue_id, attachment = %attachment.id, "attachment added");

        let names = self.resolve_names(attachment.uploaded_by_user_id, None::<Uuid>)?;
        Ok(AttachmentView::build(&attachment, &names))
    }

    // -- links ----------------------------------------------------------

    /// Links a live issue to another record. The target is not checked.
    pub fn add_link(&self, issue_id: Uuid, new: &NewLink) -> Result<LinkView> {
        validate::validate_link(new)?;
        self.ensure_live(issue_id)?;
        let link = Link::from_new(Uuid::new_v4(), issue_id, new, self.now());
        self.db.insert_link(&link)?;
        debug!(issue = %issue_id, link = %link.id, kind = %link.link_type, "link added");
        Ok(LinkView::from(&link))
    }

    /// Removes a link, provided it belongs to `issue_id`.
    pub fn remove_link(&self, issue_id: Uuid, link_id: Uuid) -> Result<()> {
        self.db.delete_link(issue_id, link_id)?;
        debug!(issue = %issue_id, link = %link_id, "link removed");
        Ok(())
    }

    // -- helpers --------------------------------------------------------

    fn ensure_live(&self, issue_id: Uuid) -> Result<()> {
        if !self.db.issue_is_live(issue_id)? {
            return Err(Error::IssueNotFound(issue_id.to_string()));
        }
        Ok(())
    }

    fn check_user_refs(&self, ids: impl IntoIterator<Item = Option<Uuid>>) -> Result<()> {
        for id in ids.into_iter().flatten() {
            if self.db.find_user(id)?.is_none() {
                return Err(Error::InvalidInput(format!("user {id} does not exist")));
            }
        }
        Ok(())
    }

    fn check_work_task_ref(&self, project_id: Uuid, task_id: Option<Uuid>) -> Result<()> {
        let Some(task_id) = task_id else {
            return Ok(());
        };
        match self.db.find_work_task(task_id)? {
            Some(task) if task.project_id == project_id => Ok(()),
            Some(_) => Err(Error::InvalidInput(format!(
                "work task {task_id} belongs to another project"
            ))),
            None => Err(Error::InvalidInput(format!(
                "work task {task_id} does not exist"
            ))),
        }
    }

    fn resolve_names(
        &self,
        users: impl IntoIterator<Item = Uuid>,
        work_tasks: impl IntoIterator<Item = Uuid>,
    ) -> Result<Names> {
        let mut names = Names::new();
        for id in users.into_iter().collect::<BTreeSet<_>>() {
            if let Some(user) = self.db.find_user(id)? {
                names.insert_user(id, user.display_name());
            }
        }
        for id in work_tasks.into_iter().collect::<BTreeSet<_>>() {
            if let Some(task) = self.db.find_work_task(id)? {
                names.insert_work_task(id, task.title);
            }
        }
        Ok(names)
    }
}

/// Splits attachments into issue-direct ones and per-comment lists.
fn group_attachments(
    attachments: &[Attachment],
    names: &Names,
) -> (Vec<AttachmentView>, HashMap<Uuid, Vec<AttachmentView>>) {
    let mut direct = Vec::new();
    let mut by_comment: HashMap<Uuid, Vec<AttachmentView>> = HashMap::new();
    for attachment in attachments {
        let view = AttachmentView::build(attachment, names);
        match attachment.comment_id {
            Some(comment_id) => by_comment.entry(comment_id).or_default().push(view),
            None => direct.push(view),
        }
    }
    (direct, by_comment)
}

fn build_comments(
    comments: &[Comment],
    mut attachments: HashMap<Uuid, Vec<AttachmentView>>,
    names: &Names,
) -> Vec<CommentView> {
    comments
        .iter()
        .map(|comment| {
            let own = attachments.remove(&comment.id).unwrap_or_default();
            CommentView::build(comment, own, names)
        })
        .collect()
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
