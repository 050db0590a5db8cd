//! Comments attached to tasks or projects.
//!
//! A comment's owner is a `(kind, id)` pair rather than a foreign key, so one
//! table serves every commentable entity. The kind comes from the closed
//! [`CommentableKind`] enumeration and is stored as its lowercase tag, which
//! the schema restricts with a `CHECK` constraint.
//!
//! Reads and writes follow the owner's visibility: task comments through the
//! task visibility rule, project comments through project membership.

use super::db::Db;
use crate::libs::auth::{Caller, ProjectId, UserId};
use crate::libs::clock::SystemClock;
use crate::libs::error::ScopeError;
use crate::libs::messages::Message;
use crate::libs::scope::TaskQuery;
use crate::libs::task::TaskId;
use crate::msg_error_anyhow;
use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{params, params_from_iter, Connection, Row, ToSql};
use std::fmt;
use std::str::FromStr;

pub type CommentId = i64;

const INSERT_COMMENT: &str = "INSERT INTO comments (commentable_type, commentable_id, author_id, body) VALUES (?1, ?2, ?3, ?4)";
const SELECT_COMMENTS: &str = "SELECT id, commentable_type, commentable_id, author_id, body, created_at FROM comments";
const SELECT_VISIBLE_TASK_IDS: &str = "SELECT id FROM tasks";
const DELETE_COMMENT: &str = "DELETE FROM comments WHERE id = ?1 AND author_id = ?2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentableKind {
    Task,
    Project,
}

impl CommentableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentableKind::Task => "task",
            CommentableKind::Project => "project",
        }
    }
}

impl fmt::Display for CommentableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommentableKind {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task" => Ok(CommentableKind::Task),
            "project" => Ok(CommentableKind::Project),
            other => Err(ScopeError::InvalidArgument(format!("unknown commentable kind '{}'", other))),
        }
    }
}

impl ToSql for CommentableKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for CommentableKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|e: ScopeError| FromSqlError::Other(Box::new(e)))
    }
}

/// The entity a comment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Commentable {
    pub kind: CommentableKind,
    pub id: i64,
}

impl Commentable {
    pub fn task(id: TaskId) -> Self {
        Self {
            kind: CommentableKind::Task,
            id,
        }
    }

    pub fn project(id: ProjectId) -> Self {
        Self {
            kind: CommentableKind::Project,
            id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub owner: Commentable,
    pub author_id: UserId,
    pub body: String,
    pub created_at: Option<NaiveDateTime>,
}

impl Comment {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Comment {
            id: row.get(0)?,
            owner: Commentable {
                kind: row.get(1)?,
                id: row.get(2)?,
            },
            author_id: row.get(3)?,
            body: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

pub struct Comments {
    conn: Connection,
}

impl Comments {
    pub fn new() -> Result<Self> {
        Ok(Self::with_db(Db::new()?))
    }

    pub fn with_db(db: Db) -> Self {
        Self { conn: db.conn }
    }

    /// Adds a comment by `caller` to `owner`, which the caller must be able
    /// to see.
    pub fn add(&mut self, caller: &Caller, owner: Commentable, body: &str) -> Result<CommentId> {
        match owner.kind {
            CommentableKind::Task => {
                if self.visible_task_ids(caller, owner.id)?.is_empty() {
                    return Err(msg_error_anyhow!(Message::TaskNotFound(owner.id)));
                }
            }
            CommentableKind::Project => {
                if !caller.is_member_of(owner.id) {
                    return Err(msg_error_anyhow!(Message::ProjectNotFound(owner.id)));
                }
            }
        }

        self.conn
            .execute(INSERT_COMMENT, params![owner.kind, owner.id, caller.id, body])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Comments on `owner` in creation order. Owners the caller cannot see
    /// have no comments as far as the caller is concerned.
    pub fn list(&mut self, caller: &Caller, owner: Commentable) -> Result<Vec<Comment>> {
        match owner.kind {
            CommentableKind::Task => self.for_task(caller, owner.id),
            CommentableKind::Project => self.for_project(caller, owner.id),
        }
    }

    pub fn for_task(&mut self, caller: &Caller, task_id: TaskId) -> Result<Vec<Comment>> {
        let (scope, params) = TaskQuery::for_caller(caller.clone())
            .id(task_id)
            .predicate(&SystemClock)
            .to_sql();
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE commentable_type = 'task' AND commentable_id IN ({} WHERE {}) ORDER BY id",
            SELECT_COMMENTS, SELECT_VISIBLE_TASK_IDS, scope
        ))?;

        let comments = stmt
            .query_map(params_from_iter(params.iter()), Comment::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(comments)
    }

    pub fn for_project(&mut self, caller: &Caller, project_id: ProjectId) -> Result<Vec<Comment>> {
        if !caller.is_member_of(project_id) {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE commentable_type = ?1 AND commentable_id = ?2 ORDER BY id",
            SELECT_COMMENTS
        ))?;
        let comments = stmt
            .query_map(params![CommentableKind::Project, project_id], Comment::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(comments)
    }

    /// Deletes a comment written by `caller`.
    pub fn delete(&mut self, caller: &Caller, id: CommentId) -> Result<()> {
        let affected = self.conn.execute(DELETE_COMMENT, params![id, caller.id])?;
        if affected == 0 {
            return Err(msg_error_anyhow!(Message::CommentNotFound(id)));
        }

        Ok(())
    }

    fn visible_task_ids(&mut self, caller: &Caller, task_id: TaskId) -> Result<Vec<TaskId>> {
        let (scope, params) = TaskQuery::for_caller(caller.clone())
            .id(task_id)
            .predicate(&SystemClock)
            .to_sql();
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE {}", SELECT_VISIBLE_TASK_IDS, scope))?;

        let ids = stmt
            .query_map(params_from_iter(params.iter()), |row| row.get(0))?
            .collect::<Result<Vec<TaskId>, _>>()?;
        Ok(ids)
    }
}
