use super::predicate::DATE_FORMAT;
use super::task::Task;
use crate::db::comments::Comment;
use crate::db::projects::Project;
use chrono::NaiveDate;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn tasks(tasks: &[Task]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "DONE", "CREATOR", "PROJECT", "SCHEDULED", "DUE"]);
        for task in tasks {
            table.add_row(row![
                task.id,
                task.title,
                if task.is_done { "yes" } else { "no" },
                task.creator_id,
                task.project_id.map(|id| id.to_string()).unwrap_or_default(),
                Self::date(task.scheduled_at),
                Self::date(task.due_at)
            ]);
        }
        table.printstd();
    }

    pub fn projects(projects: &[Project]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "CREATED"]);
        for project in projects {
            table.add_row(row![
                project.id,
                project.name,
                project.created_at.map(|at| at.to_string()).unwrap_or_default()
            ]);
        }
        table.printstd();
    }

    pub fn comments(comments: &[Comment]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "AUTHOR", "BODY", "CREATED"]);
        for comment in comments {
            table.add_row(row![
                comment.id,
                comment.author_id,
                comment.body,
                comment.created_at.map(|at| at.to_string()).unwrap_or_default()
            ]);
        }
        table.printstd();
    }

    fn date(date: Option<NaiveDate>) -> String {
        date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()
    }
}
