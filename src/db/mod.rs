//! Database layer for taskscope.
//!
//! SQLite persistence for users, projects, memberships, tasks and comments.
//! Each repository owns one connection; open several repositories on the
//! same file when an operation spans entities.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taskscope::db::{tasks::Tasks, users::Users};
//! use taskscope::libs::scope::TaskQuery;
//! use taskscope::libs::task::NewTask;
//!
//! let mut users = Users::new()?;
//! let user_id = users.create("alice")?;
//! let caller = users.caller(user_id)?.expect("user just created");
//!
//! let mut tasks = Tasks::new()?;
//! tasks.insert(&caller, &NewTask::new("Review code"))?;
//! let visible = tasks.fetch(&TaskQuery::for_caller(caller))?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Access Scoping
//!
//! Task reads take a [`TaskQuery`](crate::libs::scope::TaskQuery), which
//! always carries the caller's visibility rule. Updates and deletes of an
//! existing task go through the same rule, so a caller that cannot see a task
//! gets "not found" rather than a silent write.

/// Connection management.
pub mod db;

/// Versioned schema migrations.
pub mod migrations;

/// Polymorphic comments on tasks and projects.
pub mod comments;

/// Projects and their member lists.
pub mod projects;

/// Caller-scoped task storage.
pub mod tasks;

/// Users, memberships and caller identity loading.
pub mod users;
