// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed storage for projects, users, issues and their threads.
//!
//! The [`Database`] struct provides row-level data access. It knows nothing
//! about lifecycle rules; [`crate::tracker::Tracker`] layers those on top.
//!
//! Ids are stored as hyphenated UUID text and timestamps as fixed-width
//! RFC 3339 (microseconds, `Z`) so that text ordering matches time ordering.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::path::Path;
use uuid::Uuid;

use crate::clock::format_timestamp;
use crate::error::{Error, Result};
use crate::issue::Issue;
use crate::link::Link;
use crate::project::{Project, User, WorkTask};
use crate::reference::{parse_reference_code, reference_day_prefix};
use crate::thread::{Attachment, Comment};

/// SQL schema for the tracker database.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    is_deleted INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS work_tasks (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL,
    title TEXT NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS issues (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL,
    reference_code TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    type TEXT NOT NULL,
    priority TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'open',
    is_rfi INTEGER NOT NULL DEFAULT 0,
    is_blocking INTEGER NOT NULL DEFAULT 0,
    due_date TEXT,
    sla_minutes INTEGER,
    response_due_date TEXT,
    responded_at TEXT,
    resolved_at TEXT,
    assigned_to_user_id TEXT,
    reported_by_user_id TEXT,
    responded_by_user_id TEXT,
    work_task_id TEXT,
    location TEXT,
    discipline TEXT,
    resolution TEXT,
    rfi_question TEXT,
    rfi_answer TEXT,
    external_reference TEXT,
    is_deleted INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT,
    FOREIGN KEY (project_id) REFERENCES projects(id),
    FOREIGN KEY (assigned_to_user_id) REFERENCES users(id) ON DELETE SET NULL,
    FOREIGN KEY (reported_by_user_id) REFERENCES users(id) ON DELETE SET NULL,
    FOREIGN KEY (responded_by_user_id) REFERENCES users(id) ON DELETE SET NULL,
    FOREIGN KEY (work_task_id) REFERENCES work_tasks(id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS issue_comments (
    id TEXT PRIMARY KEY,
    issue_id TEXT NOT NULL,
    message TEXT NOT NULL,
    is_internal INTEGER NOT NULL DEFAULT 0,
    author_id TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT,
    FOREIGN KEY (issue_id) REFERENCES issues(id) ON DELETE CASCADE,
    FOREIGN KEY (author_id) REFERENCES users(id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS issue_attachments (
    id TEXT PRIMARY KEY,
    issue_id TEXT NOT NULL,
    comment_id TEXT,
    file_name TEXT NOT NULL,
    file_url TEXT NOT NULL,
    content_type TEXT NOT NULL DEFAULT 'application/octet-stream',
    file_size INTEGER NOT NULL DEFAULT 0,
    uploaded_by_user_id TEXT,
    created_at TEXT NOT NULL,
    FOREIGN KEY (issue_id) REFERENCES issues(id) ON DELETE CASCADE,
    FOREIGN KEY (comment_id) REFERENCES issue_comments(id) ON DELETE CASCADE,
    FOREIGN KEY (uploaded_by_user_id) REFERENCES users(id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS issue_links (
    id TEXT PRIMARY KEY,
    issue_id TEXT NOT NULL,
    link_type TEXT NOT NULL,
    related_entity_id TEXT,
    external_reference TEXT,
    label TEXT,
    metadata TEXT,
    created_at TEXT NOT NULL,
    FOREIGN KEY (issue_id) REFERENCES issues(id) ON DELETE CASCADE
);

-- Indexes
CREATE UNIQUE INDEX IF NOT EXISTS idx_issues_project_reference
    ON issues(project_id, reference_code);
CREATE INDEX IF NOT EXISTS idx_issues_project_created ON issues(project_id, created_at);
CREATE INDEX IF NOT EXISTS idx_issues_status ON issues(status);
CREATE INDEX IF NOT EXISTS idx_comments_issue ON issue_comments(issue_id, created_at);
CREATE INDEX IF NOT EXISTS idx_attachments_issue ON issue_attachments(issue_id);
CREATE INDEX IF NOT EXISTS idx_attachments_comment ON issue_attachments(comment_id);
CREATE INDEX IF NOT EXISTS idx_links_issue ON issue_links(issue_id);
CREATE INDEX IF NOT EXISTS idx_work_tasks_project ON work_tasks(project_id);
"#;

const ISSUE_COLUMNS: &str = "id, project_id, reference_code, title, description, type, priority,
    status, is_rfi, is_blocking, due_date, sla_minutes, response_due_date, responded_at,
    resolved_at, assigned_to_user_id, reported_by_user_id, responded_by_user_id, work_task_id,
    location, discipline, resolution, rfi_question, rfi_answer, external_reference, is_deleted,
    created_at, updated_at";

const ATTACHMENT_COLUMNS: &str = "id, issue_id, comment_id, file_name, file_url, content_type,
    file_size, uploaded_by_user_id, created_at";

fn corrupted(message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(Error::CorruptedData(message)),
    )
}

/// Parse a string value from the database, returning a rusqlite error on parse failure.
fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value
        .parse()
        .map_err(|_| corrupted(format!("invalid value '{value}' in column '{column}'")))
}

fn parse_id(value: &str, column: &str) -> std::result::Result<Uuid, rusqlite::Error> {
    Uuid::parse_str(value)
        .map_err(|_| corrupted(format!("invalid id '{value}' in column '{column}'")))
}

fn parse_id_opt(
    value: Option<String>,
    column: &str,
) -> std::result::Result<Option<Uuid>, rusqlite::Error> {
    value.map(|v| parse_id(&v, column)).transpose()
}

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| corrupted(format!("invalid timestamp '{value}' in column '{column}'")))
}

fn parse_timestamp_opt(
    value: Option<String>,
    column: &str,
) -> std::result::Result<Option<DateTime<Utc>>, rusqlite::Error> {
    value.map(|v| parse_timestamp(&v, column)).transpose()
}

fn ts_opt(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(format_timestamp)
}

fn id_opt(value: Option<Uuid>) -> Option<String> {
    value.map(|id| id.to_string())
}

fn issue_from_row(row: &Row<'_>) -> std::result::Result<Issue, rusqlite::Error> {
    let id: String = row.get(0)?;
    let project_id: String = row.get(1)?;
    let type_str: String = row.get(5)?;
    let priority_str: String = row.get(6)?;
    let status_str: String = row.get(7)?;
    let created_str: String = row.get(26)?;

    Ok(Issue {
        id: parse_id(&id, "id")?,
        project_id: parse_id(&project_id, "project_id")?,
        reference_code: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        issue_type: parse_db(&type_str, "type")?,
        priority: parse_db(&priority_str, "priority")?,
        status: parse_db(&status_str, "status")?,
        is_rfi: row.get(8)?,
        is_blocking: row.get(9)?,
        due_date: parse_timestamp_opt(row.get(10)?, "due_date")?,
        sla_minutes: row.get(11)?,
        response_due_date: parse_timestamp_opt(row.get(12)?, "response_due_date")?,
        responded_at: parse_timestamp_opt(row.get(13)?, "responded_at")?,
        resolved_at: parse_timestamp_opt(row.get(14)?, "resolved_at")?,
        assigned_to_user_id: parse_id_opt(row.get(15)?, "assigned_to_user_id")?,
        reported_by_user_id: parse_id_opt(row.get(16)?, "reported_by_user_id")?,
        responded_by_user_id: parse_id_opt(row.get(17)?, "responded_by_user_id")?,
        work_task_id: parse_id_opt(row.get(18)?, "work_task_id")?,
        location: row.get(19)?,
        discipline: row.get(20)?,
        resolution: row.get(21)?,
        rfi_question: row.get(22)?,
        rfi_answer: row.get(23)?,
        external_reference: row.get(24)?,
        is_deleted: row.get(25)?,
        created_at: parse_timestamp(&created_str, "created_at")?,
        updated_at: parse_timestamp_opt(row.get(27)?, "updated_at")?,
    })
}

fn attachment_from_row(row: &Row<'_>) -> std::result::Result<Attachment, rusqlite::Error> {
    let id: String = row.get(0)?;
    let issue_id: String = row.get(1)?;
    let created_str: String = row.get(8)?;
    Ok(Attachment {
        id: parse_id(&id, "id")?,
        issue_id: parse_id(&issue_id, "issue_id")?,
        comment_id: parse_id_opt(row.get(2)?, "comment_id")?,
        file_name: row.get(3)?,
        file_url: row.get(4)?,
        content_type: row.get(5)?,
        file_size: row.get(6)?,
        uploaded_by_user_id: parse_id_opt(row.get(7)?, "uploaded_by_user_id")?,
        created_at: parse_timestamp(&created_str, "created_at")?,
    })
}

/// Run schema creation and all migrations on a database connection.
///
/// The schema is idempotent, so this is safe on every open.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// SQLite database connection with tracker operations.
pub struct Database {
    /// The underlying SQLite connection.
    pub conn: Connection,
}

impl Database {
    /// Open a database connection at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // Cascades rely on foreign keys; WAL lets readers proceed during writes
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Begin a write transaction that takes the database write lock up front.
    ///
    /// Statements issued through `self` while the transaction is alive run
    /// inside it. Dropping the transaction without committing rolls back.
    pub fn begin_immediate(&self) -> Result<Transaction<'_>> {
        Ok(Transaction::new_unchecked(
            &self.conn,
            TransactionBehavior::Immediate,
        )?)
    }

    // -- projects -------------------------------------------------------

    pub fn insert_project(&self, project: &Project) -> Result<()> {
        self.conn.execute(
            "INSERT INTO projects (id, name, is_deleted, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                project.id.to_string(),
                project.name,
                project.is_deleted,
                format_timestamp(project.created_at),
            ],
        )?;
        Ok(())
    }

    /// Get a project by id, deleted or not.
    pub fn get_project(&self, id: Uuid) -> Result<Project> {
        let project = self
            .conn
            .query_row(
                "SELECT id, name, is_deleted, created_at FROM projects WHERE id = ?1",
                params![id.to_string()],
                |row| {
                    let id: String = row.get(0)?;
                    let created_str: String = row.get(3)?;
                    Ok(Project {
                        id: parse_id(&id, "id")?,
                        name: row.get(1)?,
                        is_deleted: row.get(2)?,
                        created_at: parse_timestamp(&created_str, "created_at")?,
                    })
                },
            )
            .optional()?;

        project.ok_or_else(|| Error::ProjectNotFound(id.to_string()))
    }

    /// Returns true if the project exists and has not been deleted.
    pub fn project_is_active(&self, id: Uuid) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM projects WHERE id = ?1 AND is_deleted = 0",
            params![id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn set_project_deleted(&self, id: Uuid) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE projects SET is_deleted = 1 WHERE id = ?1",
            params![id.to_string()],
        )?;
        if affected == 0 {
            return Err(Error::ProjectNotFound(id.to_string()));
        }
        Ok(())
    }

    // -- users and work tasks -------------------------------------------

    pub fn insert_user(&self, user: &User) -> Result<()> {
        self.conn.execute(
            "INSERT INTO users (id, email, first_name, last_name, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.id.to_string(),
                user.email,
                user.first_name,
                user.last_name,
                format_timestamp(user.created_at),
            ],
        )?;
        Ok(())
    }

    /// Get a user by id, or `None` if there is no such row.
    pub fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, email, first_name, last_name, created_at FROM users WHERE id = ?1",
                params![id.to_string()],
                |row| {
                    let id: String = row.get(0)?;
                    let created_str: String = row.get(4)?;
                    Ok(User {
                        id: parse_id(&id, "id")?,
                        email: row.get(1)?,
                        first_name: row.get(2)?,
                        last_name: row.get(3)?,
                        created_at: parse_timestamp(&created_str, "created_at")?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    pub fn insert_work_task(&self, task: &WorkTask) -> Result<()> {
        self.conn.execute(
            "INSERT INTO work_tasks (id, project_id, title, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                task.id.to_string(),
                task.project_id.to_string(),
                task.title,
                format_timestamp(task.created_at),
            ],
        )?;
        Ok(())
    }

    /// Get a work task by id, or `None` if there is no such row.
    pub fn find_work_task(&self, id: Uuid) -> Result<Option<WorkTask>> {
        let task = self
            .conn
            .query_row(
                "SELECT id, project_id, title, created_at FROM work_tasks WHERE id = ?1",
                params![id.to_string()],
                |row| {
                    let id: String = row.get(0)?;
                    let project_id: String = row.get(1)?;
                    let created_str: String = row.get(3)?;
                    Ok(WorkTask {
                        id: parse_id(&id, "id")?,
                        project_id: parse_id(&project_id, "project_id")?,
                        title: row.get(2)?,
                        created_at: parse_timestamp(&created_str, "created_at")?,
                    })
                },
            )
            .optional()?;
        Ok(task)
    }

    // -- issues ---------------------------------------------------------

    pub fn insert_issue(&self, issue: &Issue) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO issues ({ISSUE_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                         ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28)"
            ),
            params![
                issue.id.to_string(),
                issue.project_id.to_string(),
                issue.reference_code,
                issue.title,
                issue.description,
                issue.issue_type.as_str(),
                issue.priority.as_str(),
                issue.status.as_str(),
                issue.is_rfi,
                issue.is_blocking,
                ts_opt(issue.due_date),
                issue.sla_minutes,
                ts_opt(issue.response_due_date),
                ts_opt(issue.responded_at),
                ts_opt(issue.resolved_at),
                id_opt(issue.assigned_to_user_id),
                id_opt(issue.reported_by_user_id),
                id_opt(issue.responded_by_user_id),
                id_opt(issue.work_task_id),
                issue.location,
                issue.discipline,
                issue.resolution,
                issue.rfi_question,
                issue.rfi_answer,
                issue.external_reference,
                issue.is_deleted,
                format_timestamp(issue.created_at),
                ts_opt(issue.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Get an issue by id. Soft-deleted issues are only returned when
    /// `include_deleted` is set.
    pub fn get_issue(&self, id: Uuid, include_deleted: bool) -> Result<Issue> {
        let issue = self
            .conn
            .query_row(
                &format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE id = ?1"),
                params![id.to_string()],
                issue_from_row,
            )
            .optional()?;

        match issue {
            Some(issue) if include_deleted || !issue.is_deleted => Ok(issue),
            _ => Err(Error::IssueNotFound(id.to_string())),
        }
    }

    /// Returns true if the issue exists and is not soft-deleted.
    pub fn issue_is_live(&self, id: Uuid) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM issues WHERE id = ?1 AND is_deleted = 0",
            params![id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Live issues for a project, newest first, optionally filtered by the RFI flag.
    pub fn list_issues(&self, project_id: Uuid, is_rfi: Option<bool>) -> Result<Vec<Issue>> {
        let mut sql = format!(
            "SELECT {ISSUE_COLUMNS} FROM issues WHERE project_id = ?1 AND is_deleted = 0"
        );
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(project_id.to_string())];

        if let Some(flag) = is_rfi {
            sql.push_str(" AND is_rfi = ?2");
            params_vec.push(Box::new(flag));
        }

        sql.push_str(" ORDER BY created_at DESC, rowid DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let issues = stmt
            .query_map(params_refs.as_slice(), issue_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(issues)
    }

    /// Counts issues for a project created in `[start, end)`, deleted ones included.
    pub fn count_issues_created_between(
        &self,
        project_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM issues
             WHERE project_id = ?1 AND created_at >= ?2 AND created_at < ?3",
            params![
                project_id.to_string(),
                format_timestamp(start),
                format_timestamp(end)
            ],
            |row| row.get(0),
        )?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Highest sequence among the project's codes issued on `day`, or 0.
    ///
    /// Matches on the code itself rather than `created_at`, so rows whose
    /// code and timestamp disagree still block their sequence.
    pub fn highest_reference_sequence(&self, project_id: Uuid, day: NaiveDate) -> Result<u64> {
        let prefix = reference_day_prefix(day);
        let mut stmt = self.conn.prepare(
            "SELECT reference_code FROM issues
             WHERE project_id = ?1 AND reference_code LIKE ?2 || '%'",
        )?;
        let codes = stmt
            .query_map(params![project_id.to_string(), prefix], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(codes
            .iter()
            .filter_map(|code| parse_reference_code(code))
            .filter(|(issued, _)| *issued == day)
            .map(|(_, sequence)| sequence)
            .max()
            .unwrap_or(0))
    }

    /// Writes every mutable column of `issue`. The reference code and
    /// creation time are never rewritten.
    pub fn update_issue(&self, issue: &Issue) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE issues SET
                title = ?2, description = ?3, type = ?4, priority = ?5, status = ?6,
                is_blocking = ?7, due_date = ?8, sla_minutes = ?9, response_due_date = ?10,
                responded_at = ?11, resolved_at = ?12, assigned_to_user_id = ?13,
                reported_by_user_id = ?14, responded_by_user_id = ?15, work_task_id = ?16,
                location = ?17, discipline = ?18, resolution = ?19, rfi_question = ?20,
                rfi_answer = ?21, external_reference = ?22, is_deleted = ?23, updated_at = ?24
             WHERE id = ?1",
            params![
                issue.id.to_string(),
                issue.title,
                issue.description,
                issue.issue_type.as_str(),
                issue.priority.as_str(),
                issue.status.as_str(),
                issue.is_blocking,
                ts_opt(issue.due_date),
                issue.sla_minutes,
                ts_opt(issue.response_due_date),
                ts_opt(issue.responded_at),
                ts_opt(issue.resolved_at),
                id_opt(issue.assigned_to_user_id),
                id_opt(issue.reported_by_user_id),
                id_opt(issue.responded_by_user_id),
                id_opt(issue.work_task_id),
                issue.location,
                issue.discipline,
                issue.resolution,
                issue.rfi_question,
                issue.rfi_answer,
                issue.external_reference,
                issue.is_deleted,
                ts_opt(issue.updated_at),
            ],
        )?;

        if affected == 0 {
            return Err(Error::IssueNotFound(issue.id.to_string()));
        }
        Ok(())
    }

    /// Removes the issue row; comments, attachments and links go with it.
    pub fn purge_issue(&self, id: Uuid) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM issues WHERE id = ?1", params![id.to_string()])?;
        if affected == 0 {
            return Err(Error::IssueNotFound(id.to_string()));
        }
        Ok(())
    }

    // -- comments and attachments ---------------------------------------

    pub fn insert_comment(&self, comment: &Comment) -> Result<()> {
        self.conn.execute(
            "INSERT INTO issue_comments (id, issue_id, message, is_internal, author_id,
             created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                comment.id.to_string(),
                comment.issue_id.to_string(),
                comment.message,
                comment.is_internal,
                id_opt(comment.author_id),
                format_timestamp(comment.created_at),
                ts_opt(comment.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Comments on an issue, oldest first.
    pub fn list_comments(&self, issue_id: Uuid) -> Result<Vec<Comment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, issue_id, message, is_internal, author_id, created_at, updated_at
             FROM issue_comments WHERE issue_id = ?1 ORDER BY created_at, rowid",
        )?;

        let comments = stmt
            .query_map(params![issue_id.to_string()], |row| {
                let id: String = row.get(0)?;
                let issue_id: String = row.get(1)?;
                let created_str: String = row.get(5)?;
                Ok(Comment {
                    id: parse_id(&id, "id")?,
                    issue_id: parse_id(&issue_id, "issue_id")?,
                    message: row.get(2)?,
                    is_internal: row.get(3)?,
                    author_id: parse_id_opt(row.get(4)?, "author_id")?,
                    created_at: parse_timestamp(&created_str, "created_at")?,
                    updated_at: parse_timestamp_opt(row.get(6)?, "updated_at")?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(comments)
    }

    /// Removes a comment together with its attachments.
    pub fn delete_comment(&self, id: Uuid) -> Result<()> {
        let affected = self.conn.execute(
            "DELETE FROM issue_comments WHERE id = ?1",
            params![id.to_string()],
        )?;
        if affected == 0 {
            return Err(Error::CommentNotFound(id.to_string()));
        }
        Ok(())
    }

    pub fn insert_attachment(&self, attachment: &Attachment) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO issue_attachments ({ATTACHMENT_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
            ),
            params![
                attachment.id.to_string(),
                attachment.issue_id.to_string(),
                id_opt(attachment.comment_id),
                attachment.file_name,
                attachment.file_url,
                attachment.content_type,
                attachment.file_size,
                id_opt(attachment.uploaded_by_user_id),
                format_timestamp(attachment.created_at),
            ],
        )?;
        Ok(())
    }

    /// All attachments under an issue, both direct and on comments, oldest first.
    pub fn list_attachments(&self, issue_id: Uuid) -> Result<Vec<Attachment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ATTACHMENT_COLUMNS} FROM issue_attachments
             WHERE issue_id = ?1 ORDER BY created_at, rowid"
        ))?;

        let attachments = stmt
            .query_map(params![issue_id.to_string()], attachment_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(attachments)
    }

    // -- links ----------------------------------------------------------

    pub fn insert_link(&self, link: &Link) -> Result<()> {
        self.conn.execute(
            "INSERT INTO issue_links (id, issue_id, link_type, related_entity_id,
             external_reference, label, metadata, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                link.id.to_string(),
                link.issue_id.to_string(),
                link.link_type.as_str(),
                id_opt(link.related_entity_id),
                link.external_reference,
                link.label,
                link.metadata,
                format_timestamp(link.created_at),
            ],
        )?;
        Ok(())
    }

    /// Links of an issue, oldest first.
    pub fn list_links(&self, issue_id: Uuid) -> Result<Vec<Link>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, issue_id, link_type, related_entity_id, external_reference, label,
                    metadata, created_at
             FROM issue_links WHERE issue_id = ?1 ORDER BY created_at, rowid",
        )?;

        let links = stmt
            .query_map(params![issue_id.to_string()], |row| {
                let id: String = row.get(0)?;
                let issue_id: String = row.get(1)?;
                let type_str: String = row.get(2)?;
                let created_str: String = row.get(7)?;
                Ok(Link {
                    id: parse_id(&id, "id")?,
                    issue_id: parse_id(&issue_id, "issue_id")?,
                    link_type: parse_db(&type_str, "link_type")?,
                    related_entity_id: parse_id_opt(row.get(3)?, "related_entity_id")?,
                    external_reference: row.get(4)?,
                    label: row.get(5)?,
                    metadata: row.get(6)?,
                    created_at: parse_timestamp(&created_str, "created_at")?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(links)
    }

    /// Deletes a link only if it belongs to `issue_id`.
    pub fn delete_link(&self, issue_id: Uuid, link_id: Uuid) -> Result<()> {
        let affected = self.conn.execute(
            "DELETE FROM issue_links WHERE id = ?1 AND issue_id = ?2",
            params![link_id.to_string(), issue_id.to_string()],
        )?;
        if affected == 0 {
            return Err(Error::LinkNotFound(link_id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
