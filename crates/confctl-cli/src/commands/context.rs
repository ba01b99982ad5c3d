//! Context command: manage named registries in the config file.

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::{CliConfig, Server};

/// Arguments for the context command.
#[derive(Args)]
pub struct ContextArgs {
    #[command(subcommand)]
    pub action: ContextAction,
}

/// Context subcommands.
#[derive(Subcommand)]
pub enum ContextAction {
    /// Print the whole config file
    View,

    /// List context names, marking the selected one
    List,

    /// Select the named context
    Use {
        /// Context name
        name: String,
    },

    /// Add or replace a named registry
    Add {
        /// Context name
        name: String,

        /// Registry base URL, e.g. http://localhost:8848/nacos
        #[arg(long)]
        url: String,

        /// Login username
        #[arg(long)]
        user: String,

        /// Login password
        #[arg(long)]
        password: String,
    },

    /// Remove a named registry
    Delete {
        /// Context name
        name: String,
    },
}

/// Executes the context command.
pub fn run(args: &ContextArgs, config_path: &Path) -> Result<()> {
    let mut config = CliConfig::load(config_path)?;

    match &args.action {
        ContextAction::View => {
            print!("{}", serde_yaml::to_string(&config)?);
        }
        ContextAction::List => {
            for name in config.servers.keys() {
                let marker = if *name == config.context { "*" } else { " " };
                println!("{marker} {name}");
            }
        }
        ContextAction::Use { name } => {
            config.set_context(name)?;
            config.save(config_path)?;
            println!("switched to context {name}");
        }
        ContextAction::Add {
            name,
            url,
            user,
            password,
        } => {
            config.add_server(
                name,
                Server {
                    url: url.clone(),
                    user: user.clone(),
                    password: password.clone(),
                },
            );
            // the first context added becomes the selection
            if config.context.is_empty() {
                config.set_context(name)?;
            }
            config.save(config_path)?;
            println!("context {name} added");
        }
        ContextAction::Delete { name } => {
            config.delete_server(name);
            config.save(config_path)?;
            println!("context {name} deleted");
        }
    }
    Ok(())
}
