//! Display implementation for taskscope messages.
//!
//! All user-facing text lives in this one match so wording stays consistent
//! between console output, log events and error values built with
//! `msg_error_anyhow!`.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === TASK MESSAGES ===
            Message::TaskCreated(id) => format!("Task #{} created", id),
            Message::TaskUpdated(id) => format!("Task #{} updated", id),
            Message::TaskDeleted(id) => format!("Task #{} deleted", id),
            Message::TaskMarkedDone(id) => format!("Task #{} marked as done", id),
            Message::TaskReopened(id) => format!("Task #{} reopened", id),
            Message::TaskProjectChanged(id, Some(project_id)) => format!("Task #{} attached to project #{}", id, project_id),
            Message::TaskProjectChanged(id, None) => format!("Task #{} detached from its project", id),
            Message::TaskNotFound(id) => format!("Task #{} not found", id),
            Message::TasksNotFound => "Tasks not found".to_string(),
            Message::TasksHeader(user_id) => format!("Tasks visible to user #{}", user_id),
            Message::TasksVisibleCount(count) => format!("{} task(s)", count),

            // === QUERY MESSAGES ===
            Message::TaskQueryBuilt(user_id, predicate) => format!("Task query for user #{}: {}", user_id, predicate),
            Message::UnknownDueFilter(keyword) => format!("Unknown due filter '{}', no due-date constraint applied", keyword),
            Message::InvalidDate(input, error) => format!("'{}' is not a valid date (expected YYYY-MM-DD): {}", input, error),
            Message::NoAuthenticatedUser => "No user given: pass --as <USER_ID> or set TASKSCOPE_USER".to_string(),

            // === USER MESSAGES ===
            Message::UserCreated(id, name) => format!("User #{} '{}' created", id, name),
            Message::UserNotFound(id) => format!("User #{} not found", id),
            Message::MembershipAdded(user_id, project_id) => format!("User #{} joined project #{}", user_id, project_id),
            Message::MembershipRemoved(user_id, project_id) => format!("User #{} left project #{}", user_id, project_id),

            // === PROJECT MESSAGES ===
            Message::ProjectCreated(id, name) => format!("Project #{} '{}' created", id, name),
            Message::ProjectNotFound(id) => format!("Project #{} not found", id),
            Message::ProjectsNotFound => "Projects not found".to_string(),

            // === COMMENT MESSAGES ===
            Message::CommentAdded(id) => format!("Comment #{} added", id),
            Message::CommentDeleted(id) => format!("Comment #{} deleted", id),
            Message::CommentNotFound(id) => format!("Comment #{} not found", id),
            Message::CommentsNotFound => "No comments yet".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved(path) => format!("Configuration saved to {}", path),
            Message::ConfigParseError(error) => format!("Failed to parse configuration: {}", error),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending database migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("✓ Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("✗ Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All database migrations completed successfully".to_string(),
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
        };

        write!(f, "{}", text)
    }
}
