//! # Taskscope - caller-scoped task queries
//!
//! Builds queries over a task store that only ever return the tasks a user is
//! allowed to see: the ones they created, and the ones belonging to projects
//! they are a member of.
//!
//! ## Features
//!
//! - **Visibility Scoping**: the access rule is the first conjunct of every task read
//! - **Date Filters**: inclusive scheduled/due ranges and `today`/`past` keywords
//! - **Predicates**: rendered to parameterized SQL or evaluated in memory
//! - **SQLite Storage**: users, projects, memberships, tasks and comments
//! - **Command Line**: manage and query tasks as a given user
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taskscope::commands::Cli;
//!
//! fn main() -> anyhow::Result<()> {
//!     Cli::menu()
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
