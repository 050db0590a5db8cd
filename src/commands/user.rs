use crate::{
    db::{projects::Projects, users::Users},
    libs::{auth::UserId, messages::Message},
    msg_bail_anyhow, msg_error, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    /// Create a new user
    Add {
        /// Display name
        name: String,
    },
    /// Make a user a member of a project
    Join {
        user_id: UserId,
        project_id: i64,
    },
    /// Remove a user from a project
    Leave {
        user_id: UserId,
        project_id: i64,
    },
    /// Show a user and the projects they belong to
    Show {
        user_id: UserId,
    },
}

pub fn cmd(args: UserArgs) -> Result<()> {
    match args.command {
        UserCommand::Add { name } => handle_add(name),
        UserCommand::Join { user_id, project_id } => handle_join(user_id, project_id),
        UserCommand::Leave { user_id, project_id } => handle_leave(user_id, project_id),
        UserCommand::Show { user_id } => handle_show(user_id),
    }
}

fn handle_add(name: String) -> Result<()> {
    let id = Users::new()?.create(&name)?;
    msg_success!(Message::UserCreated(id, name));
    Ok(())
}

fn handle_join(user_id: UserId, project_id: i64) -> Result<()> {
    let mut users = Users::new()?;
    if users.get_by_id(user_id)?.is_none() {
        msg_bail_anyhow!(Message::UserNotFound(user_id));
    }
    if Projects::new()?.get_by_id(project_id)?.is_none() {
        msg_bail_anyhow!(Message::ProjectNotFound(project_id));
    }

    users.add_membership(user_id, project_id)?;
    msg_success!(Message::MembershipAdded(user_id, project_id));
    Ok(())
}

fn handle_leave(user_id: UserId, project_id: i64) -> Result<()> {
    if Users::new()?.remove_membership(user_id, project_id)? {
        msg_success!(Message::MembershipRemoved(user_id, project_id));
    } else {
        msg_error!(Message::ProjectNotFound(project_id));
    }
    Ok(())
}

fn handle_show(user_id: UserId) -> Result<()> {
    let mut users = Users::new()?;
    let Some(user) = users.get_by_id(user_id)? else {
        msg_bail_anyhow!(Message::UserNotFound(user_id));
    };

    let memberships: Vec<String> = users.memberships(user_id)?.iter().map(ToString::to_string).collect();
    msg_print!(format!("#{} {}", user.id, user.name));
    msg_print!(format!("Projects: {}", memberships.join(", ")));
    Ok(())
}
