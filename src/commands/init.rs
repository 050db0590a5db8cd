//! Configuration initialization command.
//!
//! Writes a configuration file with the chosen options and opens the
//! database once so the schema is created up front.

use crate::{
    db::db::Db,
    libs::{config::Config, messages::Message},
    msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Store the database at this path instead of the data directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// Reject unknown due-date keywords instead of ignoring them
    #[arg(long, conflicts_with = "lenient")]
    strict: bool,

    /// Ignore unknown due-date keywords (the default)
    #[arg(long)]
    lenient: bool,
}

impl InitArgs {
    /// `None` keeps whatever the existing configuration says.
    fn strict_due_filter(&self) -> Option<bool> {
        match (self.strict, self.lenient) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    let mut config = Config::read()?;
    let strict_due_filter = init_args.strict_due_filter();
    config.update(init_args.database, strict_due_filter);

    let config_path = config.save()?;
    msg_success!(Message::ConfigSaved(config_path.display().to_string()));

    Db::open(&config.database_path()?)?;
    Ok(())
}
