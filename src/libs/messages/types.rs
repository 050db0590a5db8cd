#[derive(Debug, Clone)]
pub enum Message {
    // === TASK MESSAGES ===
    TaskCreated(i64),
    TaskUpdated(i64),
    TaskDeleted(i64),
    TaskMarkedDone(i64),
    TaskReopened(i64),
    TaskProjectChanged(i64, Option<i64>), // task id, project id
    TaskNotFound(i64),
    TasksNotFound,
    TasksHeader(i64), // caller id
    TasksVisibleCount(usize),

    // === QUERY MESSAGES ===
    TaskQueryBuilt(i64, String), // caller id, predicate
    UnknownDueFilter(String),
    InvalidDate(String, String), // input, parser error
    NoAuthenticatedUser,

    // === USER MESSAGES ===
    UserCreated(i64, String),
    UserNotFound(i64),
    MembershipAdded(i64, i64),   // user id, project id
    MembershipRemoved(i64, i64), // user id, project id

    // === PROJECT MESSAGES ===
    ProjectCreated(i64, String),
    ProjectNotFound(i64),
    ProjectsNotFound,

    // === COMMENT MESSAGES ===
    CommentAdded(i64),
    CommentDeleted(i64),
    CommentNotFound(i64),
    CommentsNotFound,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved(String), // path
    ConfigParseError(String),

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationCompleted(u32),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
    DatabaseUpToDate,
}
