pub mod comment;
pub mod init;
pub mod project;
pub mod task;
pub mod user;

use crate::db::users::Users;
use crate::libs::auth::{AuthContext, Caller, UserId};
use crate::libs::error::ScopeError;
use crate::libs::messages::Message;
use crate::msg_error;
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Write the default configuration and create the database")]
    Init(init::InitArgs),
    #[command(about = "Manage users and their project memberships")]
    User(user::UserArgs),
    #[command(about = "Manage projects")]
    Project(project::ProjectArgs),
    #[command(about = "Create, list and change tasks visible to the acting user")]
    Task(task::TaskArgs),
    #[command(about = "Comment on tasks and projects")]
    Comment(comment::CommentArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    /// User the command acts on behalf of
    #[arg(long = "as", value_name = "USER_ID", global = true, env = "TASKSCOPE_USER")]
    acting_user: Option<UserId>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::User(args) => user::cmd(args),
            Commands::Project(args) => project::cmd(args),
            Commands::Task(args) => task::cmd(args, cli.acting_user),
            Commands::Comment(args) => comment::cmd(args, cli.acting_user),
        }
    }
}

/// Resolves the acting user into a caller with fresh memberships.
///
/// Without an acting user this fails with `Unauthorized`; there is no
/// fallback identity.
pub(crate) fn require_caller(acting_user: Option<UserId>) -> Result<Caller> {
    let session = Users::new()?.session(acting_user)?;
    match session.caller() {
        Some(caller) => Ok(caller),
        None => {
            msg_error!(Message::NoAuthenticatedUser);
            Err(ScopeError::Unauthorized.into())
        }
    }
}
