use super::auth::{ProjectId, UserId};
use super::predicate::{Column, Row, Value};
use chrono::{NaiveDate, NaiveDateTime};

pub type TaskId = i64;

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub is_done: bool,
    /// Set once on insert from the creating caller; never written afterwards.
    pub creator_id: UserId,
    pub project_id: Option<ProjectId>,
    pub scheduled_at: Option<NaiveDate>,
    pub due_at: Option<NaiveDate>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Row for Task {
    fn value(&self, column: Column) -> Option<Value> {
        match column {
            Column::Id => Some(Value::Int(self.id)),
            Column::CreatorId => Some(Value::Int(self.creator_id)),
            Column::ProjectId => self.project_id.map(Value::Int),
            Column::IsDone => Some(Value::Bool(self.is_done)),
            Column::ScheduledAt => self.scheduled_at.map(Value::Date),
            Column::DueAt => self.due_at.map(Value::Date),
        }
    }
}

/// Fields a caller may supply when creating a task. The creator is always
/// the caller and is not part of this struct.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub is_done: bool,
    pub project_id: Option<ProjectId>,
    pub scheduled_at: Option<NaiveDate>,
    pub due_at: Option<NaiveDate>,
}

impl NewTask {
    pub fn new(title: &str) -> Self {
        NewTask {
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn in_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn scheduled(mut self, date: NaiveDate) -> Self {
        self.scheduled_at = Some(date);
        self
    }

    pub fn due(mut self, date: NaiveDate) -> Self {
        self.due_at = Some(date);
        self
    }
}
