use super::db::Db;
use crate::libs::auth::{ProjectId, UserId};
use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};

const INSERT_PROJECT: &str = "INSERT INTO projects (name) VALUES (?1)";
const SELECT_PROJECTS: &str = "SELECT id, name, created_at FROM projects ORDER BY name";
pub(crate) const SELECT_PROJECT_BY_ID: &str = "SELECT id, name, created_at FROM projects WHERE id = ?1";
const SELECT_MEMBERS: &str = "SELECT user_id FROM memberships WHERE project_id = ?1 ORDER BY user_id";

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub created_at: Option<NaiveDateTime>,
}

impl Project {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Project {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: row.get(2)?,
        })
    }
}

pub struct Projects {
    conn: Connection,
}

impl Projects {
    pub fn new() -> Result<Self> {
        Ok(Self::with_db(Db::new()?))
    }

    pub fn with_db(db: Db) -> Self {
        Self { conn: db.conn }
    }

    pub fn create(&mut self, name: &str) -> Result<ProjectId> {
        self.conn.execute(INSERT_PROJECT, params![name])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_by_id(&mut self, id: ProjectId) -> Result<Option<Project>> {
        self.conn
            .query_row(SELECT_PROJECT_BY_ID, params![id], Project::from_row)
            .optional()
            .map_err(Into::into)
    }

    pub fn list(&mut self) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare(SELECT_PROJECTS)?;
        let projects = stmt.query_map([], Project::from_row)?.collect::<Result<Vec<_>, _>>()?;

        Ok(projects)
    }

    /// Ids of the users that are members of `project_id`.
    pub fn members(&mut self, project_id: ProjectId) -> Result<Vec<UserId>> {
        let mut stmt = self.conn.prepare(SELECT_MEMBERS)?;
        let members = stmt
            .query_map(params![project_id], |row| row.get(0))?
            .collect::<Result<Vec<UserId>, _>>()?;

        Ok(members)
    }
}
