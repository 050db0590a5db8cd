//! Versioned schema migrations.
//!
//! Migrations are registered in version order, applied inside a single
//! transaction, and recorded in a `migrations` table so each one runs
//! exactly once per database.
//!
//! ## Schema History
//!
//! - **v1**: users, projects and the memberships that link them
//! - **v2**: tasks, their lookup indices and the creator immutability trigger
//! - **v3**: polymorphic comments
//!
//! ## Usage
//!
//! ```rust
//! use taskscope::db::migrations::{get_db_version, init_with_migrations};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open_in_memory()?;
//! init_with_migrations(&mut conn)?;
//! assert_eq!(get_db_version(&conn)?, 3);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_info};
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

const CREATE_MIGRATIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";
const SELECT_CURRENT_VERSION: &str = "SELECT MAX(version) FROM migrations";
const SELECT_HISTORY: &str = "SELECT version, name, applied_at FROM migrations ORDER BY version";
const RECORD_MIGRATION: &str = "INSERT INTO migrations (version, name) VALUES (?1, ?2)";

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    /// Schema change, run inside the shared migration transaction.
    up: fn(&Transaction) -> Result<()>,
}

/// A row of the `migrations` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    pub version: u32,
    pub name: String,
    pub applied_at: String,
}

/// Registry of every migration, in version order.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    /// Versions must be strictly increasing. An applied migration is never
    /// edited; schema changes always go into a new version.
    fn register_migrations(&mut self) {
        // Version 1: identities and project membership
        self.add_migration(1, "create_users_projects_memberships", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS users (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS projects (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )?;

            // Junction table for many-to-many user-project relationships
            tx.execute(
                "CREATE TABLE IF NOT EXISTS memberships (
                    user_id INTEGER NOT NULL,
                    project_id INTEGER NOT NULL,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    PRIMARY KEY (user_id, project_id),
                    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_memberships_project_id ON memberships(project_id)", [])?;
            Ok(())
        });

        // Version 2: tasks
        self.add_migration(2, "create_tasks", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS tasks (
                    id INTEGER PRIMARY KEY,
                    title TEXT NOT NULL,
                    is_done BOOLEAN NOT NULL DEFAULT 0,
                    creator_id INTEGER NOT NULL,
                    project_id INTEGER,
                    scheduled_at DATE,
                    due_at DATE,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (creator_id) REFERENCES users(id),
                    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE SET NULL
                )",
                [],
            )?;

            // Both halves of the visibility rule hit an index
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_creator_id ON tasks(creator_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_project_id ON tasks(project_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_scheduled_at ON tasks(scheduled_at)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_due_at ON tasks(due_at)", [])?;

            tx.execute_batch(
                "CREATE TRIGGER IF NOT EXISTS tasks_creator_immutable
                BEFORE UPDATE OF creator_id ON tasks
                WHEN NEW.creator_id IS NOT OLD.creator_id
                BEGIN
                    SELECT RAISE(ABORT, 'creator_id is immutable');
                END;",
            )?;
            Ok(())
        });

        // Version 3: comments attached to any commentable entity
        self.add_migration(3, "create_comments", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS comments (
                    id INTEGER PRIMARY KEY,
                    commentable_type TEXT NOT NULL CHECK (commentable_type IN ('task', 'project')),
                    commentable_id INTEGER NOT NULL,
                    author_id INTEGER NOT NULL,
                    body TEXT NOT NULL,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (author_id) REFERENCES users(id) ON DELETE CASCADE
                )",
                [],
            )?;
            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_comments_commentable ON comments(commentable_type, commentable_id)",
                [],
            )?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every migration newer than the database's current version.
    ///
    /// All pending migrations share one transaction: if any of them fails,
    /// none of them is recorded and the schema is left untouched.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(CREATE_MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!(Message::DatabaseUpToDate);
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;

        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(RECORD_MIGRATION, params![migration.version, migration.name])?;
                    msg_debug!(Message::MigrationCompleted(migration.version));
                }
                Err(e) => {
                    msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                    return Err(e);
                }
            }
        }

        tx.commit()?;
        msg_info!(Message::AllMigrationsCompleted);

        Ok(())
    }

    /// Highest applied version, 0 for a fresh database.
    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn
            .query_row(SELECT_CURRENT_VERSION, [], |row| row.get(0))
            .unwrap_or(Some(0));

        Ok(version.unwrap_or(0))
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        let count: i32 = conn.query_row(
            "SELECT COUNT(*) FROM migrations WHERE version = ?1",
            params![version],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    /// Applied migrations, oldest first.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<AppliedMigration>> {
        let mut stmt = conn.prepare(SELECT_HISTORY)?;
        let rows = stmt.query_map([], |row| {
            Ok(AppliedMigration {
                version: row.get(0)?,
                name: row.get(1)?,
                applied_at: row.get(2)?,
            })
        })?;

        let mut history = Vec::new();
        for applied in rows {
            history.push(applied?);
        }
        Ok(history)
    }
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies all pending migrations to `conn`.
pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    let manager = MigrationManager::new();
    manager.run_migrations(conn)?;
    Ok(())
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    let manager = MigrationManager::new();
    manager.get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    let current = manager.get_current_version(conn)?;
    Ok(current < manager.latest_version())
}
