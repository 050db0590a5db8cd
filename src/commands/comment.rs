use super::require_caller;
use crate::{
    db::comments::{CommentId, Commentable, Comments},
    libs::{
        auth::{ProjectId, UserId},
        error::ScopeError,
        messages::Message,
        task::TaskId,
        view::View,
    },
    msg_info, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct CommentArgs {
    #[command(subcommand)]
    command: CommentCommand,
}

/// Exactly one owner: a task or a project.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct OwnerArgs {
    #[arg(short, long)]
    task: Option<TaskId>,
    #[arg(short, long)]
    project: Option<ProjectId>,
}

impl OwnerArgs {
    fn commentable(&self) -> Result<Commentable, ScopeError> {
        match (self.task, self.project) {
            (Some(task_id), _) => Ok(Commentable::task(task_id)),
            (None, Some(project_id)) => Ok(Commentable::project(project_id)),
            (None, None) => Err(ScopeError::InvalidArgument("either --task or --project is required".to_string())),
        }
    }
}

#[derive(Debug, Subcommand)]
enum CommentCommand {
    /// Comment on a task or project
    Add {
        #[command(flatten)]
        owner: OwnerArgs,
        /// Comment text
        body: String,
    },
    /// List comments on a task or project
    List {
        #[command(flatten)]
        owner: OwnerArgs,
    },
    /// Delete one of your own comments
    Delete {
        id: CommentId,
    },
}

pub fn cmd(args: CommentArgs, acting_user: Option<UserId>) -> Result<()> {
    let caller = require_caller(acting_user)?;
    let mut comments = Comments::new()?;

    match args.command {
        CommentCommand::Add { owner, body } => {
            let id = comments.add(&caller, owner.commentable()?, &body)?;
            msg_success!(Message::CommentAdded(id));
        }
        CommentCommand::List { owner } => {
            let list = comments.list(&caller, owner.commentable()?)?;
            if list.is_empty() {
                msg_info!(Message::CommentsNotFound);
            } else {
                View::comments(&list);
            }
        }
        CommentCommand::Delete { id } => {
            comments.delete(&caller, id)?;
            msg_success!(Message::CommentDeleted(id));
        }
    }

    Ok(())
}
