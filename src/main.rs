mod cli;
mod commands;
mod config;
mod echo;
mod error;
mod keys;
mod menu;
mod store;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command, MakeTarget};
use store::Store;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let store = Store::open(config::data_dir()?);

    match cli.command {
        Command::Set { target } => commands::set::run(&store, target)?,
        Command::User(args) => commands::user::run(&store, args)?,
        Command::Change { target } => commands::change::run(&store, target)?,
        Command::Reset(args) => commands::reset::run(&store, args)?,
        Command::Export { path, indent } => commands::export::run(&store, path, indent)?,
        Command::Import { path } => commands::import::run(&store, &path)?,
        Command::Make { target } => match target {
            MakeTarget::Dotenv { path } => commands::make::run(&store, &path)?,
        },
    }

    Ok(())
}
