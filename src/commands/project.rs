use crate::{
    db::projects::Projects,
    libs::{messages::Message, view::View},
    msg_bail_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ProjectArgs {
    #[command(subcommand)]
    command: ProjectCommand,
}

#[derive(Debug, Subcommand)]
enum ProjectCommand {
    /// Create a new project
    Add {
        /// Project name
        name: String,
    },
    /// List all projects
    List,
    /// Show the members of a project
    Members {
        project_id: i64,
    },
}

pub fn cmd(args: ProjectArgs) -> Result<()> {
    match args.command {
        ProjectCommand::Add { name } => handle_add(name),
        ProjectCommand::List => handle_list(),
        ProjectCommand::Members { project_id } => handle_members(project_id),
    }
}

fn handle_add(name: String) -> Result<()> {
    let id = Projects::new()?.create(&name)?;
    msg_success!(Message::ProjectCreated(id, name));
    Ok(())
}

fn handle_list() -> Result<()> {
    let projects = Projects::new()?.list()?;
    if projects.is_empty() {
        msg_info!(Message::ProjectsNotFound);
        return Ok(());
    }

    View::projects(&projects);
    Ok(())
}

fn handle_members(project_id: i64) -> Result<()> {
    let mut projects = Projects::new()?;
    if projects.get_by_id(project_id)?.is_none() {
        msg_bail_anyhow!(Message::ProjectNotFound(project_id));
    }

    let members: Vec<String> = projects.members(project_id)?.iter().map(ToString::to_string).collect();
    msg_print!(format!("Members: {}", members.join(", ")));
    Ok(())
}
