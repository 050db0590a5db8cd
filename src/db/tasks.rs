use super::db::Db;
use super::projects::{Project, SELECT_PROJECT_BY_ID};
use super::users::{User, SELECT_USER_BY_ID};
use crate::libs::auth::{Caller, ProjectId};
use crate::libs::clock::{Clock, SystemClock};
use crate::libs::messages::Message;
use crate::libs::predicate::DATE_FORMAT;
use crate::libs::scope::TaskQuery;
use crate::libs::task::{NewTask, Task, TaskId};
use crate::{msg_debug, msg_error_anyhow};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

const SELECT_TASKS: &str =
    "SELECT id, title, is_done, creator_id, project_id, scheduled_at, due_at, created_at, updated_at FROM tasks";
const COUNT_TASKS: &str = "SELECT COUNT(*) FROM tasks";
const INSERT_TASK: &str =
    "INSERT INTO tasks (title, is_done, creator_id, project_id, scheduled_at, due_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const UPDATE_TASK: &str =
    "UPDATE tasks SET title = ?, is_done = ?, project_id = ?, scheduled_at = ?, due_at = ?, updated_at = CURRENT_TIMESTAMP";
const UPDATE_DONE: &str = "UPDATE tasks SET is_done = ?, updated_at = CURRENT_TIMESTAMP";
const UPDATE_PROJECT: &str = "UPDATE tasks SET project_id = ?, updated_at = CURRENT_TIMESTAMP";
const DELETE_TASK: &str = "DELETE FROM tasks";
const DELETE_TASK_COMMENTS: &str = "DELETE FROM comments WHERE commentable_type = 'task' AND commentable_id = ?1";
const ORDER_BY: &str = "ORDER BY id";

/// Task repository. Every statement that touches an existing row is scoped
/// by a [`TaskQuery`], so it only ever sees the caller's visible tasks.
pub struct Tasks {
    conn: Connection,
    clock: Box<dyn Clock>,
}

impl Tasks {
    pub fn new() -> Result<Self> {
        Ok(Self::with_db(Db::new()?))
    }

    pub fn with_db(db: Db) -> Self {
        Self {
            conn: db.conn,
            clock: Box::new(SystemClock),
        }
    }

    /// Replaces the clock used for `today`/`past` filters.
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Creates a task owned by `caller`.
    pub fn insert(&mut self, caller: &Caller, task: &NewTask) -> Result<TaskId> {
        self.conn.execute(
            INSERT_TASK,
            params![task.title, task.is_done, caller.id, task.project_id, task.scheduled_at, task.due_at],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    pub fn fetch(&mut self, query: &TaskQuery) -> Result<Vec<Task>> {
        let (sql, params) = query.predicate(self.clock.as_ref()).to_sql();
        let mut stmt = self.conn.prepare(&format!("{} WHERE {} {}", SELECT_TASKS, sql, ORDER_BY))?;

        let task_iter = stmt.query_map(params_from_iter(params.iter()), |row| {
            Ok(Task {
                id: row.get(0)?,
                title: row.get(1)?,
                is_done: row.get(2)?,
                creator_id: row.get(3)?,
                project_id: row.get(4)?,
                scheduled_at: row.get(5)?,
                due_at: row.get(6)?,
                created_at: row.get(7)?,
                updated_at: row.get(8)?,
            })
        })?;
        let mut tasks = Vec::new();
        for task_result in task_iter {
            tasks.push(task_result?);
        }

        Ok(tasks)
    }

    pub fn count(&mut self, query: &TaskQuery) -> Result<usize> {
        let (sql, params) = query.predicate(self.clock.as_ref()).to_sql();
        let count: i64 = self.conn.query_row(
            &format!("{} WHERE {}", COUNT_TASKS, sql),
            params_from_iter(params.iter()),
            |row| row.get(0),
        )?;

        Ok(count as usize)
    }

    /// A single task, if it exists and `caller` can see it.
    pub fn find(&mut self, caller: &Caller, id: TaskId) -> Result<Option<Task>> {
        let query = TaskQuery::for_caller(caller.clone()).id(id);
        Ok(self.fetch(&query)?.into_iter().next())
    }

    /// Writes every mutable field of `task`. The creator is never written.
    pub fn update(&mut self, caller: &Caller, task: &Task) -> Result<()> {
        let values = vec![
            SqlValue::Text(task.title.clone()),
            SqlValue::Integer(i64::from(task.is_done)),
            optional_id(task.project_id),
            optional_date(task.scheduled_at),
            optional_date(task.due_at),
        ];
        self.execute_scoped(UPDATE_TASK, values, caller, task.id)?;

        msg_debug!(Message::TaskUpdated(task.id));
        Ok(())
    }

    pub fn set_done(&mut self, caller: &Caller, id: TaskId, done: bool) -> Result<()> {
        self.execute_scoped(UPDATE_DONE, vec![SqlValue::Integer(i64::from(done))], caller, id)
    }

    /// Attaches the task to `project_id`, or detaches it with `None`.
    pub fn attach_project(&mut self, caller: &Caller, id: TaskId, project_id: Option<ProjectId>) -> Result<()> {
        self.execute_scoped(UPDATE_PROJECT, vec![optional_id(project_id)], caller, id)
    }

    /// Deletes a visible task together with its comments.
    pub fn delete(&mut self, caller: &Caller, id: TaskId) -> Result<()> {
        let (sql, params) = TaskQuery::for_caller(caller.clone())
            .id(id)
            .predicate(self.clock.as_ref())
            .to_sql();

        let tx = self.conn.transaction()?;
        let affected = tx.execute(&format!("{} WHERE {}", DELETE_TASK, sql), params_from_iter(params.iter()))?;
        if affected == 0 {
            return Err(msg_error_anyhow!(Message::TaskNotFound(id)));
        }
        tx.execute(DELETE_TASK_COMMENTS, params![id])?;
        tx.commit()?;

        Ok(())
    }

    /// The user that created `task`.
    pub fn creator(&mut self, task: &Task) -> Result<Option<User>> {
        self.conn
            .query_row(SELECT_USER_BY_ID, params![task.creator_id], User::from_row)
            .optional()
            .map_err(Into::into)
    }

    /// The project `task` belongs to, if any.
    pub fn project(&mut self, task: &Task) -> Result<Option<Project>> {
        let Some(project_id) = task.project_id else {
            return Ok(None);
        };

        self.conn
            .query_row(SELECT_PROJECT_BY_ID, params![project_id], Project::from_row)
            .optional()
            .map_err(Into::into)
    }

    /// Runs `statement` against task `id` if `caller` can see it. `values`
    /// bind the statement's own placeholders, ahead of the scope's.
    fn execute_scoped(&mut self, statement: &str, values: Vec<SqlValue>, caller: &Caller, id: TaskId) -> Result<()> {
        let (sql, params) = TaskQuery::for_caller(caller.clone())
            .id(id)
            .predicate(self.clock.as_ref())
            .to_sql();

        let mut values = values;
        values.extend(params);
        let affected = self
            .conn
            .execute(&format!("{} WHERE {}", statement, sql), params_from_iter(values.iter()))?;
        if affected == 0 {
            return Err(msg_error_anyhow!(Message::TaskNotFound(id)));
        }

        Ok(())
    }
}

fn optional_id(id: Option<i64>) -> SqlValue {
    id.map(SqlValue::Integer).unwrap_or(SqlValue::Null)
}

fn optional_date(date: Option<NaiveDate>) -> SqlValue {
    date.map(|d| SqlValue::Text(d.format(DATE_FORMAT).to_string()))
        .unwrap_or(SqlValue::Null)
}
