use super::require_caller;
use crate::{
    db::tasks::Tasks,
    libs::{
        auth::{ProjectId, UserId},
        config::Config,
        messages::Message,
        scope::{parse_date, TaskQuery},
        task::{NewTask, TaskId},
        view::View,
    },
    msg_bail_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    command: TaskCommand,
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    /// Create a task owned by the acting user
    Add {
        /// Task title
        title: String,
        /// Project the task belongs to
        #[arg(short, long)]
        project: Option<ProjectId>,
        /// Scheduled date (YYYY-MM-DD)
        #[arg(short, long)]
        scheduled: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,
    },
    /// List visible tasks
    List {
        /// Only tasks scheduled within this inclusive range
        #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
        scheduled_between: Option<Vec<String>>,
        /// Only tasks due within this inclusive range
        #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
        due_between: Option<Vec<String>>,
        /// Due-date keyword: today or past
        #[arg(long)]
        due: Option<String>,
        /// Only finished tasks
        #[arg(long, conflicts_with = "open")]
        done: bool,
        /// Only unfinished tasks
        #[arg(long)]
        open: bool,
    },
    /// Show one task with its creator and project
    Show {
        id: TaskId,
    },
    /// Change the title or dates of a task
    Edit {
        id: TaskId,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        scheduled: Option<String>,
        #[arg(short, long)]
        due: Option<String>,
    },
    /// Mark a task as done
    Done {
        id: TaskId,
        /// Reopen the task instead
        #[arg(long)]
        undo: bool,
    },
    /// Attach a task to a project, or detach it when no project is given
    Move {
        id: TaskId,
        #[arg(short, long)]
        project: Option<ProjectId>,
    },
    /// Delete a task and its comments
    Delete {
        id: TaskId,
    },
}

pub fn cmd(args: TaskArgs, acting_user: Option<UserId>) -> Result<()> {
    match args.command {
        TaskCommand::Add {
            title,
            project,
            scheduled,
            due,
        } => handle_add(acting_user, title, project, scheduled, due),
        TaskCommand::List {
            scheduled_between,
            due_between,
            due,
            done,
            open,
        } => {
            let done = match (done, open) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            handle_list(acting_user, scheduled_between, due_between, due, done)
        }
        TaskCommand::Show { id } => handle_show(acting_user, id),
        TaskCommand::Edit { id, title, scheduled, due } => handle_edit(acting_user, id, title, scheduled, due),
        TaskCommand::Done { id, undo } => handle_done(acting_user, id, !undo),
        TaskCommand::Move { id, project } => handle_move(acting_user, id, project),
        TaskCommand::Delete { id } => handle_delete(acting_user, id),
    }
}

fn handle_add(
    acting_user: Option<UserId>,
    title: String,
    project: Option<ProjectId>,
    scheduled: Option<String>,
    due: Option<String>,
) -> Result<()> {
    let caller = require_caller(acting_user)?;

    let task = NewTask {
        title,
        is_done: false,
        project_id: project,
        scheduled_at: scheduled.as_deref().map(parse_date).transpose()?,
        due_at: due.as_deref().map(parse_date).transpose()?,
    };
    let id = Tasks::new()?.insert(&caller, &task)?;

    msg_success!(Message::TaskCreated(id));
    Ok(())
}

fn handle_list(
    acting_user: Option<UserId>,
    scheduled_between: Option<Vec<String>>,
    due_between: Option<Vec<String>>,
    due: Option<String>,
    done: Option<bool>,
) -> Result<()> {
    let caller = require_caller(acting_user)?;
    let config = Config::read()?;
    let caller_id = caller.id;

    let mut query = TaskQuery::for_caller(caller);
    if let Some([from, to]) = scheduled_between.as_deref() {
        query = query.scheduled_between(from, to)?;
    }
    if let Some([from, to]) = due_between.as_deref() {
        query = query.due_between(from, to)?;
    }
    query = query.due(config.due_filter(due.as_deref())?);
    if let Some(done) = done {
        query = query.done(done);
    }

    let tasks = Tasks::new()?.fetch(&query)?;
    if tasks.is_empty() {
        msg_info!(Message::TasksNotFound);
        return Ok(());
    }

    msg_print!(Message::TasksHeader(caller_id), true);
    View::tasks(&tasks);
    msg_print!(Message::TasksVisibleCount(tasks.len()));
    Ok(())
}

fn handle_show(acting_user: Option<UserId>, id: TaskId) -> Result<()> {
    let caller = require_caller(acting_user)?;
    let mut tasks = Tasks::new()?;

    let Some(task) = tasks.find(&caller, id)? else {
        msg_bail_anyhow!(Message::TaskNotFound(id));
    };

    View::tasks(std::slice::from_ref(&task));
    if let Some(creator) = tasks.creator(&task)? {
        msg_print!(format!("Creator: #{} {}", creator.id, creator.name));
    }
    if let Some(project) = tasks.project(&task)? {
        msg_print!(format!("Project: #{} {}", project.id, project.name));
    }
    Ok(())
}

fn handle_edit(
    acting_user: Option<UserId>,
    id: TaskId,
    title: Option<String>,
    scheduled: Option<String>,
    due: Option<String>,
) -> Result<()> {
    let caller = require_caller(acting_user)?;
    let mut tasks = Tasks::new()?;

    let Some(mut task) = tasks.find(&caller, id)? else {
        msg_bail_anyhow!(Message::TaskNotFound(id));
    };

    if let Some(title) = title {
        task.title = title;
    }
    if let Some(scheduled) = scheduled {
        task.scheduled_at = Some(parse_date(&scheduled)?);
    }
    if let Some(due) = due {
        task.due_at = Some(parse_date(&due)?);
    }

    tasks.update(&caller, &task)?;
    msg_success!(Message::TaskUpdated(id));
    Ok(())
}

fn handle_done(acting_user: Option<UserId>, id: TaskId, done: bool) -> Result<()> {
    let caller = require_caller(acting_user)?;
    Tasks::new()?.set_done(&caller, id, done)?;

    if done {
        msg_success!(Message::TaskMarkedDone(id));
    } else {
        msg_success!(Message::TaskReopened(id));
    }
    Ok(())
}

fn handle_move(acting_user: Option<UserId>, id: TaskId, project: Option<ProjectId>) -> Result<()> {
    let caller = require_caller(acting_user)?;
    Tasks::new()?.attach_project(&caller, id, project)?;

    msg_success!(Message::TaskProjectChanged(id, project));
    Ok(())
}

fn handle_delete(acting_user: Option<UserId>, id: TaskId) -> Result<()> {
    let caller = require_caller(acting_user)?;
    Tasks::new()?.delete(&caller, id)?;

    msg_success!(Message::TaskDeleted(id));
    Ok(())
}
