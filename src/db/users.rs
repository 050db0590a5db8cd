use super::db::Db;
use crate::libs::auth::{Caller, ProjectId, Session, UserId};
use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeSet;

const INSERT_USER: &str = "INSERT INTO users (name) VALUES (?1)";
pub(crate) const SELECT_USER_BY_ID: &str = "SELECT id, name, created_at FROM users WHERE id = ?1";
const INSERT_MEMBERSHIP: &str = "INSERT OR IGNORE INTO memberships (user_id, project_id) VALUES (?1, ?2)";
const DELETE_MEMBERSHIP: &str = "DELETE FROM memberships WHERE user_id = ?1 AND project_id = ?2";
const SELECT_MEMBERSHIPS: &str = "SELECT project_id FROM memberships WHERE user_id = ?1 ORDER BY project_id";

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub created_at: Option<NaiveDateTime>,
}

impl User {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: row.get(2)?,
        })
    }
}

pub struct Users {
    conn: Connection,
}

impl Users {
    pub fn new() -> Result<Self> {
        Ok(Self::with_db(Db::new()?))
    }

    pub fn with_db(db: Db) -> Self {
        Self { conn: db.conn }
    }

    pub fn create(&mut self, name: &str) -> Result<UserId> {
        self.conn.execute(INSERT_USER, params![name])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_by_id(&mut self, id: UserId) -> Result<Option<User>> {
        self.conn
            .query_row(SELECT_USER_BY_ID, params![id], User::from_row)
            .optional()
            .map_err(Into::into)
    }

    /// Adds `user_id` to `project_id`. Adding an existing membership is a no-op.
    pub fn add_membership(&mut self, user_id: UserId, project_id: ProjectId) -> Result<()> {
        self.conn.execute(INSERT_MEMBERSHIP, params![user_id, project_id])?;
        Ok(())
    }

    /// Returns whether a membership was actually removed.
    pub fn remove_membership(&mut self, user_id: UserId, project_id: ProjectId) -> Result<bool> {
        let affected = self.conn.execute(DELETE_MEMBERSHIP, params![user_id, project_id])?;
        Ok(affected > 0)
    }

    pub fn memberships(&mut self, user_id: UserId) -> Result<BTreeSet<ProjectId>> {
        let mut stmt = self.conn.prepare(SELECT_MEMBERSHIPS)?;
        let project_ids = stmt
            .query_map(params![user_id], |row| row.get(0))?
            .collect::<Result<BTreeSet<ProjectId>, _>>()?;

        Ok(project_ids)
    }

    /// Loads the caller identity for `user_id` with its current memberships,
    /// or `None` if the user does not exist.
    pub fn caller(&mut self, user_id: UserId) -> Result<Option<Caller>> {
        if self.get_by_id(user_id)?.is_none() {
            return Ok(None);
        }

        Ok(Some(Caller {
            id: user_id,
            project_ids: self.memberships(user_id)?,
        }))
    }

    /// Session for an optional signed-in user. No user id gives an anonymous
    /// session; an unknown user id is an error.
    pub fn session(&mut self, user_id: Option<UserId>) -> Result<Session> {
        let Some(user_id) = user_id else {
            return Ok(Session::anonymous());
        };

        let caller = self
            .caller(user_id)?
            .ok_or_else(|| msg_error_anyhow!(Message::UserNotFound(user_id)))?;
        Ok(Session::authenticated(caller))
    }
}
