//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the storage collaborator the task services run against.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `update_task_dates` writes date columns only, in one statement, and
//!   never leaves an end date before its start date.
//! - Dates are stored as `YYYY-MM-DD` text; the end date is inclusive.

use crate::db::ensure_schema_current;
use crate::model::project::{Assignment, Project, ProjectId};
use crate::model::task::{check_date_range, Task, TaskId, TaskStatus, TaskValidationError};
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;

const STORAGE_DATE_FORMAT: &str = "%Y-%m-%d";

const TASK_COLUMNS: &str = "id, title, project_id, start_date, end_date, status, progress, is_all_day";

const TASK_WITH_PROJECT_SQL: &str = "SELECT
    t.id AS id,
    t.title AS title,
    t.project_id AS project_id,
    t.start_date AS start_date,
    t.end_date AS end_date,
    t.status AS status,
    t.progress AS progress,
    t.is_all_day AS is_all_day,
    p.name AS project_name
FROM tasks t
JOIN projects p ON p.id = t.project_id;";

/// New date columns for one task.
///
/// `end_date = None` leaves the stored end date untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateChange {
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Task row joined with its project and eagerly loaded assignments.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    pub task: Task,
    pub project: Project,
    pub assignments: Vec<Assignment>,
}

/// Storage collaborator for task use cases.
pub trait TaskRepository {
    fn find_task_by_id(&self, id: &TaskId) -> RepoResult<Option<Task>>;
    /// Returns the task as stored after the update.
    ///
    /// An end left unchanged is checked against the new start; an inverted
    /// range fails with `EndBeforeStart` and nothing is written.
    fn update_task_dates(&self, id: &TaskId, change: &DateChange) -> RepoResult<Task>;
    fn create_task(&self, task: &Task) -> RepoResult<Task>;
    /// Order is the storage engine's natural order.
    fn list_tasks_with_projects(&self) -> RepoResult<Vec<TaskRecord>>;
}

impl<T: TaskRepository + ?Sized> TaskRepository for &T {
    fn find_task_by_id(&self, id: &TaskId) -> RepoResult<Option<Task>> {
        (**self).find_task_by_id(id)
    }

    fn update_task_dates(&self, id: &TaskId, change: &DateChange) -> RepoResult<Task> {
        (**self).update_task_dates(id, change)
    }

    fn create_task(&self, task: &Task) -> RepoResult<Task> {
        (**self).create_task(task)
    }

    fn list_tasks_with_projects(&self) -> RepoResult<Vec<TaskRecord>> {
        (**self).list_tasks_with_projects()
    }
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - Returns `Db(SchemaNotReady)` when migrations have not been applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_current(conn)?;
        Ok(Self { conn })
    }

    fn project_exists(&self, id: ProjectId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn load_assignments(&self) -> RepoResult<HashMap<TaskId, Vec<Assignment>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, task_id, assignee FROM assignments ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut by_task: HashMap<TaskId, Vec<Assignment>> = HashMap::new();

        while let Some(row) = rows.next()? {
            let assignment = Assignment {
                id: row.get("id")?,
                task_id: TaskId::new(row.get::<_, String>("task_id")?),
                assignee: row.get("assignee")?,
            };
            by_task
                .entry(assignment.task_id.clone())
                .or_default()
                .push(assignment);
        }

        Ok(by_task)
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn find_task_by_id(&self, id: &TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.as_str()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_task_row(row)?)),
            None => Ok(None),
        }
    }

    fn update_task_dates(&self, id: &TaskId, change: &DateChange) -> RepoResult<Task> {
        if let Some(end_date) = change.end_date {
            check_date_range(change.start_date, end_date)?;
        }

        let start_text = date_to_db(change.start_date);
        let mut stmt = self.conn.prepare(&format!(
            "UPDATE tasks
             SET
                start_date = ?1,
                end_date = COALESCE(?2, end_date),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?3
               AND COALESCE(?2, end_date) >= ?1
             RETURNING {TASK_COLUMNS};"
        ))?;
        let mut rows = stmt.query(params![
            start_text,
            change.end_date.map(date_to_db),
            id.as_str(),
        ])?;
        if let Some(row) = rows.next()? {
            return parse_task_row(row);
        }
        drop(rows);

        // Nothing written: either the id is unknown or the kept end precedes
        // the new start.
        let stored_end: Option<String> = self
            .conn
            .query_row(
                "SELECT end_date FROM tasks WHERE id = ?1;",
                [id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        match stored_end {
            None => Err(RepoError::NotFound(id.clone())),
            Some(end_text) => {
                let end_date = NaiveDate::parse_from_str(&end_text, STORAGE_DATE_FORMAT)
                    .map_err(|_| {
                        RepoError::InvalidData(format!("invalid date `{end_text}` in tasks.end_date"))
                    })?;
                Err(TaskValidationError::EndBeforeStart {
                    start: change.start_date,
                    end: end_date,
                }
                .into())
            }
        }
    }

    fn create_task(&self, task: &Task) -> RepoResult<Task> {
        task.validate()?;

        if !self.project_exists(task.project_id)? {
            return Err(RepoError::UnknownProject(task.project_id));
        }

        self.conn.execute(
            "INSERT INTO tasks (
                id,
                title,
                project_id,
                start_date,
                end_date,
                status,
                progress,
                is_all_day
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                task.id.as_str(),
                task.title.as_str(),
                task.project_id,
                date_to_db(task.start_date),
                date_to_db(task.end_date),
                task.status.as_str(),
                task.progress,
                task.is_all_day,
            ],
        )?;

        Ok(task.clone())
    }

    fn list_tasks_with_projects(&self) -> RepoResult<Vec<TaskRecord>> {
        let mut assignments = self.load_assignments()?;
        let mut stmt = self.conn.prepare(TASK_WITH_PROJECT_SQL)?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            let task = parse_task_row(row)?;
            let project = Project {
                id: task.project_id,
                name: row.get("project_name")?,
            };
            let task_assignments = assignments.remove(&task.id).unwrap_or_default();
            records.push(TaskRecord {
                task,
                project,
                assignments: task_assignments,
            });
        }

        Ok(records)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let status_text: String = row.get("status")?;
    let status = TaskStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid task status `{status_text}` in tasks.status"))
    })?;

    let is_all_day = match row.get::<_, i64>("is_all_day")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_all_day value `{other}` in tasks.is_all_day"
            )));
        }
    };

    let task = Task {
        id: TaskId::new(row.get::<_, String>("id")?),
        title: row.get("title")?,
        project_id: row.get("project_id")?,
        start_date: parse_db_date(row, "start_date")?,
        end_date: parse_db_date(row, "end_date")?,
        status,
        progress: row.get("progress")?,
        is_all_day,
    };
    task.validate()?;
    Ok(task)
}

fn parse_db_date(row: &Row<'_>, column: &str) -> RepoResult<NaiveDate> {
    let text: String = row.get(column)?;
    NaiveDate::parse_from_str(&text, STORAGE_DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{text}` in tasks.{column}")))
}

fn date_to_db(date: NaiveDate) -> String {
    date.format(STORAGE_DATE_FORMAT).to_string()
}

